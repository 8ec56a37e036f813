//! Engine error types.

use thiserror::Error;

use qloom_hal::HalError;

/// Errors surfaced by the shot-execution engine.
///
/// At most one is reported per engine call: the first failure observed. The
/// histogram accumulated before the failure is still returned alongside it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// A backend error wrapped with the 1-based shot ordinal.
    #[error("shot {shot} failed: {source}")]
    ShotFailed {
        /// 1-based ordinal of the failing shot.
        shot: usize,
        /// The backend error.
        #[source]
        source: HalError,
    },

    /// A backend error attributed to a job-channel worker.
    #[error("worker {worker} failed: {source}")]
    WorkerFailed {
        /// Index of the failing worker.
        worker: usize,
        /// The backend error.
        #[source]
        source: HalError,
    },
}

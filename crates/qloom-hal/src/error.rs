//! HAL error types.

use thiserror::Error;

/// Errors raised by backends and the runner registry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Registration with an empty name.
    #[error("runner name cannot be empty")]
    EmptyRunnerName,

    /// Registration under a name that is already taken.
    #[error("runner '{0}' is already registered")]
    DuplicateRunner(String),

    /// Creation of a runner that was never registered.
    #[error("unknown runner '{0}'")]
    UnknownRunner(String),

    /// The circuit uses a gate outside the backend's supported set.
    #[error("unsupported gate '{0}'")]
    UnsupportedGate(String),

    /// The circuit references wires or classical bits the backend rejects.
    #[error("invalid circuit: {0}")]
    InvalidCircuit(String),

    /// The circuit exceeds a backend capacity limit.
    #[error("circuit exceeds backend capabilities: {0}")]
    CircuitTooLarge(String),

    /// A recognized configuration key received a value of the wrong type.
    #[error("invalid value for configuration key '{key}': expected {expected}")]
    Configuration {
        /// The offending key.
        key: String,
        /// The expected value type.
        expected: &'static str,
    },

    /// External cancellation observed during a run.
    #[error("run cancelled")]
    Cancelled,

    /// Backend-specific execution failure.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;

//! The one-shot runner contract.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use qloom_ir::Circuit;

use crate::capability::{
    BackendProvider, BatchRunner, CancellableRunner, ConfigurableRunner, MetricsCollector,
    ResettableRunner, ValidatingRunner,
};
use crate::error::HalResult;

/// A quantum backend that can execute a laid-out circuit for one shot.
///
/// `run_once` is the whole required surface: it must accept any circuit
/// whose gates lie in the backend's supported set and return the outcome
/// bit-string (classical bit 0 rightmost, `"0"` when the circuit has no
/// classical bits). Everything else is an optional capability, discovered
/// through the `as_*` probe methods, the trait-object rendition of an
/// interface downcast. Implementations override the probes they support to
/// return `Some(self)`.
pub trait Runner: Send + Sync {
    /// Execute the circuit once and return the outcome string.
    fn run_once(&self, circuit: &Circuit) -> HalResult<String>;

    /// Probe for cancellation support.
    fn as_cancellable(&self) -> Option<&dyn CancellableRunner> {
        None
    }

    /// Probe for batch execution support.
    fn as_batch(&self) -> Option<&dyn BatchRunner> {
        None
    }

    /// Probe for runtime configuration support.
    fn as_configurable(&self) -> Option<&dyn ConfigurableRunner> {
        None
    }

    /// Probe for pre-flight circuit validation support.
    fn as_validating(&self) -> Option<&dyn ValidatingRunner> {
        None
    }

    /// Probe for execution metrics support.
    fn as_metrics(&self) -> Option<&dyn MetricsCollector> {
        None
    }

    /// Probe for backend metadata support.
    fn as_provider(&self) -> Option<&dyn BackendProvider> {
        None
    }

    /// Probe for internal-state reset support.
    fn as_resettable(&self) -> Option<&dyn ResettableRunner> {
        None
    }
}

/// Shared cancellation flag handed to [`CancellableRunner`] backends.
///
/// Cloning is cheap; all clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

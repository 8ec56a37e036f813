//! Optional backend capabilities.
//!
//! Rather than one fat trait, each extension lives in its own trait probed
//! at use-sites via the `as_*` accessors on [`Runner`]. A minimal backend
//! implements `run_once` and nothing else.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use qloom_ir::Circuit;

use crate::error::HalResult;
use crate::metrics::ExecutionMetrics;
use crate::runner::{CancelToken, Runner};

/// Execution that honors an external cancellation signal.
///
/// Implementations must check the token before the first operation and
/// between operations, returning [`crate::HalError::Cancelled`] once set.
pub trait CancellableRunner {
    /// Execute the circuit once, aborting early if `cancel` fires.
    fn run_once_with_cancel(&self, circuit: &Circuit, cancel: &CancelToken) -> HalResult<String>;
}

/// Batch execution shortcut for backends that can amortize per-shot cost.
pub trait BatchRunner {
    /// Execute `shots` shots and return one outcome string per shot.
    fn run_batch(&self, circuit: &Circuit, shots: usize) -> HalResult<Vec<String>>;
}

/// Runtime configuration knobs.
///
/// Unknown keys are accepted and stored; recognized keys are type-checked
/// and reject wrong-typed values with
/// [`crate::HalError::Configuration`].
pub trait ConfigurableRunner {
    /// Toggle verbose logging.
    fn set_verbose(&self, verbose: bool);

    /// Apply configuration options.
    fn configure(&self, options: &Map<String, Value>) -> HalResult<()>;

    /// Current configuration.
    fn configuration(&self) -> Map<String, Value>;
}

/// Pre-flight circuit validation.
pub trait ValidatingRunner {
    /// Reject circuits with unsupported gates or out-of-range wires.
    fn validate(&self, circuit: &Circuit) -> HalResult<()>;

    /// The closed set of gate names this backend executes.
    fn supported_gates(&self) -> Vec<&'static str>;
}

/// Execution statistics.
pub trait MetricsCollector {
    /// Snapshot of the execution counters.
    fn metrics(&self) -> ExecutionMetrics;

    /// Zero out the counters.
    fn reset_metrics(&self);
}

/// Backend metadata.
pub trait BackendProvider {
    /// Descriptive metadata about this backend implementation.
    fn backend_info(&self) -> BackendInfo;
}

/// Internal-state reset.
pub trait ResettableRunner {
    /// Clear internal counters and cached state.
    fn reset(&self);
}

/// Metadata describing a backend implementation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendInfo {
    /// Human-readable name.
    pub name: String,
    /// Backend version.
    pub version: String,
    /// Description of the backend.
    pub description: String,
    /// Vendor or author.
    pub vendor: String,
    /// Supported feature flags.
    #[serde(default)]
    pub capabilities: FxHashMap<String, bool>,
    /// Free-form additional metadata.
    #[serde(default)]
    pub metadata: FxHashMap<String, String>,
}

impl BackendInfo {
    /// Create metadata with empty capability and metadata tables.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: String::new(),
            vendor: String::new(),
            capabilities: FxHashMap::default(),
            metadata: FxHashMap::default(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the vendor.
    #[must_use]
    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    /// Flag a capability.
    #[must_use]
    pub fn with_capability(mut self, name: impl Into<String>, supported: bool) -> Self {
        self.capabilities.insert(name.into(), supported);
        self
    }

    /// Attach a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Whether a runner supports cancellation.
pub fn supports_cancellation(runner: &dyn Runner) -> bool {
    runner.as_cancellable().is_some()
}

/// Whether a runner supports batch execution.
pub fn supports_batch(runner: &dyn Runner) -> bool {
    runner.as_batch().is_some()
}

/// Whether a runner supports runtime configuration.
pub fn supports_configuration(runner: &dyn Runner) -> bool {
    runner.as_configurable().is_some()
}

/// Whether a runner supports pre-flight validation.
pub fn supports_validation(runner: &dyn Runner) -> bool {
    runner.as_validating().is_some()
}

/// Whether a runner reports execution metrics.
pub fn supports_metrics(runner: &dyn Runner) -> bool {
    runner.as_metrics().is_some()
}

/// Backend metadata, if the runner provides any.
pub fn backend_info(runner: &dyn Runner) -> Option<BackendInfo> {
    runner.as_provider().map(|provider| provider.backend_info())
}

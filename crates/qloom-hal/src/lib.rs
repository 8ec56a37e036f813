//! qloom hardware abstraction layer.
//!
//! This crate defines the contract between the shot-execution engine and
//! quantum backends:
//!
//! - [`Runner`]: the one required operation, `run_once`, executing a
//!   laid-out circuit for a single shot
//! - optional capability traits ([`CancellableRunner`], [`BatchRunner`],
//!   [`ConfigurableRunner`], [`ValidatingRunner`], [`MetricsCollector`],
//!   [`BackendProvider`], [`ResettableRunner`]) probed through `as_*`
//!   accessors
//! - [`RunnerRegistry`]: name to factory discovery, safe under concurrent
//!   readers and writers
//! - [`RunnerMetrics`]/[`ExecutionMetrics`]: atomic execution counters
//! - [`Counts`]: the outcome histogram type
//!
//! # Example: a minimal backend
//!
//! ```
//! use qloom_hal::{HalResult, Runner, RunnerRegistry};
//! use qloom_ir::Circuit;
//!
//! struct ZeroRunner;
//!
//! impl Runner for ZeroRunner {
//!     fn run_once(&self, circuit: &Circuit) -> HalResult<String> {
//!         Ok("0".repeat(circuit.clbits().max(1)))
//!     }
//! }
//!
//! let registry = RunnerRegistry::new();
//! registry.register("zero", || Box::new(ZeroRunner))?;
//! let runner = registry.create("zero")?;
//! # Ok::<(), qloom_hal::HalError>(())
//! ```

pub mod capability;
pub mod counts;
pub mod error;
pub mod metrics;
pub mod registry;
pub mod runner;

pub use capability::{
    BackendInfo, BackendProvider, BatchRunner, CancellableRunner, ConfigurableRunner,
    MetricsCollector, ResettableRunner, ValidatingRunner, backend_info, supports_batch,
    supports_cancellation, supports_configuration, supports_metrics, supports_validation,
};
pub use counts::Counts;
pub use error::{HalError, HalResult};
pub use metrics::{ExecutionMetrics, RunnerMetrics};
pub use registry::{
    RunnerFactory, RunnerRegistry, create_runner, list_runners, must_register_runner,
    register_runner,
};
pub use runner::{CancelToken, Runner};

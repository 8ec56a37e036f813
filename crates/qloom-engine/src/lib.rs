//! qloom shot-execution engine.
//!
//! Runs a laid-out circuit for N shots against a [`Runner`](qloom_hal::Runner)
//! backend and aggregates the outcome histogram. Three strategies share one
//! return contract:
//!
//! - [`ShotEngine::run_serial`]: a single loop; deterministic with a
//!   seeded backend
//! - [`ShotEngine::run_parallel_chan`]: workers drain a pre-filled job
//!   channel; suited to backends with highly variable per-shot cost
//! - [`ShotEngine::run_parallel_static`]: contiguous per-worker shot
//!   ranges, the default under [`ShotEngine::run`]
//!
//! Every strategy returns the histogram of successful shots plus at most
//! the first error observed; a failure never discards the partial counts.
//!
//! # Example
//!
//! ```
//! use qloom_engine::{EngineOptions, ShotEngine};
//! use qloom_hal::RunnerRegistry;
//! use qloom_ir::CircuitBuilder;
//!
//! let registry = RunnerRegistry::new();
//! qloom_sim::register_runners(&registry)?;
//!
//! let circuit = CircuitBuilder::bell()?;
//! let engine = ShotEngine::from_registry(
//!     &registry,
//!     "qsim",
//!     EngineOptions { shots: 256, workers: 0 },
//! )?;
//!
//! let outcome = engine.run(&circuit);
//! assert!(outcome.is_ok());
//! assert_eq!(outcome.histogram.total(), 256);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod engine;
mod error;
mod parchan;
mod parstat;
mod serial;

pub use engine::{DEFAULT_SHOTS, EngineOptions, RunOutcome, ShotEngine};
pub use error::EngineError;

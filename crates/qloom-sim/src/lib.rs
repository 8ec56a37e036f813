//! qloom statevector simulation.
//!
//! The kernel ([`Statevector`]) evolves a dense vector of `2^Q` complex
//! amplitudes in place, one gate at a time, and implements projective
//! measurement with renormalization. [`QsimRunner`] wraps the kernel into a
//! backend implementing the full HAL capability surface and registers under
//! the names `qsim` and `default`.
//!
//! # Example
//!
//! ```
//! use qloom_ir::CircuitBuilder;
//! use qloom_sim::register_runners;
//! use qloom_hal::{Runner, RunnerRegistry};
//!
//! let registry = RunnerRegistry::new();
//! register_runners(&registry)?;
//!
//! let circuit = CircuitBuilder::bell()?;
//! let runner = registry.create("qsim")?;
//! let outcome = runner.run_once(&circuit)?;
//! assert!(outcome == "00" || outcome == "11");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod runner;
pub mod statevector;

pub use error::{SimError, SimResult};
pub use runner::{MAX_DEPTH, MAX_QUBITS, QsimRunner, register_runners};
pub use statevector::Statevector;

//! qloom circuit intermediate representation.
//!
//! This crate holds the data model the rest of the workspace builds on: a
//! closed gate catalog, a dependency-DAG over gate applications, the
//! deterministic (time-step × wire) layout, and a fluent builder.
//!
//! # Overview
//!
//! Programs are written against [`CircuitBuilder`], which forwards each gate
//! to a [`Dag`] tracking the last operation on every wire. `build_circuit`
//! validates the DAG (cycle check, topological order, depth) and produces
//! the immutable [`Circuit`] façade whose operations carry their layout
//! assignment, the form consumed by renderers and simulation backends.
//!
//! # Example
//!
//! ```
//! use qloom_ir::CircuitBuilder;
//!
//! let mut builder = CircuitBuilder::with_size(2, 2);
//! builder.h(0).cnot(0, 1).measure(0, 0).measure(1, 1);
//!
//! let circuit = builder.build_circuit()?;
//! assert_eq!(circuit.qubits(), 2);
//! assert_eq!(circuit.depth(), 3); // H, CNOT, parallel measures
//! # Ok::<(), qloom_ir::IrError>(())
//! ```

pub mod builder;
pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;

pub use builder::{BuilderOptions, CircuitBuilder};
pub use circuit::{Circuit, Operation};
pub use dag::{Dag, NodeIndex, OpNode};
pub use error::{IrError, IrResult};
pub use gate::Gate;

//! Fluent circuit builder.
//!
//! The builder latches the first error and lets every later call chain
//! through unchanged, so a whole program can be written without
//! interleaved `?`s; `build_circuit`/`build_dag` surface the latched error,
//! then validation errors, and are single-use.

use crate::circuit::Circuit;
use crate::dag::Dag;
use crate::error::{IrError, IrResult};
use crate::gate::Gate;

/// Configuration accepted by [`CircuitBuilder::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderOptions {
    /// Number of qubits; values below 1 are raised to 1.
    pub qubits: usize,
    /// Number of classical bits.
    pub clbits: usize,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            qubits: 1,
            clbits: 0,
        }
    }
}

/// Stateful fluent builder over a [`Dag`].
///
/// ```
/// use qloom_ir::CircuitBuilder;
///
/// let mut builder = CircuitBuilder::with_size(2, 2);
/// builder.h(0).cnot(0, 1).measure(0, 0).measure(1, 1);
/// let circuit = builder.build_circuit()?;
/// assert_eq!(circuit.depth(), 3);
/// # Ok::<(), qloom_ir::IrError>(())
/// ```
#[derive(Debug)]
pub struct CircuitBuilder {
    dag: Option<Dag>,
    err: Option<IrError>,
}

impl CircuitBuilder {
    /// Create a builder from configuration.
    pub fn new(options: BuilderOptions) -> Self {
        Self {
            dag: Some(Dag::new(options.qubits.max(1), options.clbits)),
            err: None,
        }
    }

    /// Create a builder with the given register sizes.
    pub fn with_size(qubits: usize, clbits: usize) -> Self {
        Self::new(BuilderOptions { qubits, clbits })
    }

    /// Apply Hadamard.
    pub fn h(&mut self, qubit: usize) -> &mut Self {
        self.gate(Gate::H, &[qubit])
    }

    /// Apply Pauli-X.
    pub fn x(&mut self, qubit: usize) -> &mut Self {
        self.gate(Gate::X, &[qubit])
    }

    /// Apply Pauli-Y.
    pub fn y(&mut self, qubit: usize) -> &mut Self {
        self.gate(Gate::Y, &[qubit])
    }

    /// Apply Pauli-Z.
    pub fn z(&mut self, qubit: usize) -> &mut Self {
        self.gate(Gate::Z, &[qubit])
    }

    /// Apply the S phase gate.
    pub fn s(&mut self, qubit: usize) -> &mut Self {
        self.gate(Gate::S, &[qubit])
    }

    /// Apply CNOT.
    pub fn cnot(&mut self, control: usize, target: usize) -> &mut Self {
        self.gate(Gate::Cnot, &[control, target])
    }

    /// Apply controlled-Z.
    pub fn cz(&mut self, control: usize, target: usize) -> &mut Self {
        self.gate(Gate::Cz, &[control, target])
    }

    /// Apply SWAP.
    pub fn swap(&mut self, q1: usize, q2: usize) -> &mut Self {
        self.gate(Gate::Swap, &[q1, q2])
    }

    /// Apply Toffoli.
    pub fn toffoli(&mut self, c1: usize, c2: usize, target: usize) -> &mut Self {
        self.gate(Gate::Toffoli, &[c1, c2, target])
    }

    /// Apply Fredkin.
    pub fn fredkin(&mut self, control: usize, t1: usize, t2: usize) -> &mut Self {
        self.gate(Gate::Fredkin, &[control, t1, t2])
    }

    /// Measure `qubit` into classical bit `clbit`.
    pub fn measure(&mut self, qubit: usize, clbit: usize) -> &mut Self {
        if self.err.is_some() {
            return self;
        }
        if let Some(dag) = self.dag.as_mut() {
            if let Err(e) = dag.add_measure(qubit, clbit) {
                self.err = Some(e);
            }
        }
        self
    }

    /// Apply an arbitrary catalog gate to absolute qubits.
    pub fn gate(&mut self, gate: Gate, qubits: &[usize]) -> &mut Self {
        if self.err.is_some() {
            return self;
        }
        if let Some(dag) = self.dag.as_mut() {
            if let Err(e) = dag.add_gate(gate, qubits) {
                self.err = Some(e);
            }
        }
        self
    }

    /// The latched error, if any.
    pub fn error(&self) -> Option<&IrError> {
        self.err.as_ref()
    }

    /// Validate and return the frozen DAG.
    ///
    /// Returns the latched error if one occurred, [`IrError::AlreadyBuilt`]
    /// after a previous successful build.
    pub fn build_dag(&mut self) -> IrResult<Dag> {
        let Some(mut dag) = self.dag.take() else {
            return Err(IrError::AlreadyBuilt);
        };
        if let Some(err) = self.err.clone() {
            self.dag = Some(dag);
            return Err(err);
        }
        if let Err(e) = dag.validate() {
            self.dag = Some(dag);
            return Err(e);
        }
        Ok(dag)
    }

    /// Validate and return the laid-out circuit.
    pub fn build_circuit(&mut self) -> IrResult<Circuit> {
        let mut dag = self.build_dag()?;
        Circuit::from_dag(&mut dag)
    }

    /// A two-qubit Bell pair with terminal measurements.
    pub fn bell() -> IrResult<Circuit> {
        let mut builder = Self::with_size(2, 2);
        builder.h(0).cnot(0, 1).measure(0, 0).measure(1, 1);
        builder.build_circuit()
    }

    /// An `n`-qubit GHZ state with terminal measurements.
    pub fn ghz(n: usize) -> IrResult<Circuit> {
        let mut builder = Self::with_size(n, n);
        builder.h(0);
        for q in 0..n.saturating_sub(1) {
            builder.cnot(q, q + 1);
        }
        for q in 0..n {
            builder.measure(q, q);
        }
        builder.build_circuit()
    }
}

impl Default for CircuitBuilder {
    fn default() -> Self {
        Self::new(BuilderOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = BuilderOptions::default();
        assert_eq!(options.qubits, 1);
        assert_eq!(options.clbits, 0);

        // Zero qubits is raised to the one-qubit minimum.
        let mut builder = CircuitBuilder::with_size(0, 0);
        let circuit = builder.build_circuit().unwrap();
        assert_eq!(circuit.qubits(), 1);
    }

    #[test]
    fn test_first_error_latches() {
        let mut builder = CircuitBuilder::with_size(2, 0);
        builder
            .h(0)
            .h(5) // out of range: latched
            .cnot(0, 0) // would be DuplicateQubit, but short-circuits
            .x(1);

        assert_eq!(
            builder.error(),
            Some(&IrError::BadQubit {
                qubit: 5,
                qubits: 2
            })
        );
        assert_eq!(
            builder.build_circuit(),
            Err(IrError::BadQubit {
                qubit: 5,
                qubits: 2
            })
        );
        // The latched error keeps coming back, not AlreadyBuilt.
        assert!(matches!(
            builder.build_circuit(),
            Err(IrError::BadQubit { .. })
        ));
    }

    #[test]
    fn test_single_use() {
        let mut builder = CircuitBuilder::with_size(1, 1);
        builder.h(0).measure(0, 0);

        assert!(builder.build_circuit().is_ok());
        assert_eq!(builder.build_circuit(), Err(IrError::AlreadyBuilt));
        assert!(matches!(builder.build_dag(), Err(IrError::AlreadyBuilt)));
    }

    #[test]
    fn test_additions_after_build_are_silent() {
        let mut builder = CircuitBuilder::with_size(1, 0);
        builder.h(0);
        builder.build_circuit().unwrap();

        builder.x(0).h(99);
        assert!(builder.error().is_none());
        assert_eq!(builder.build_circuit(), Err(IrError::AlreadyBuilt));
    }

    #[test]
    fn test_build_dag_then_layout() {
        let mut builder = CircuitBuilder::with_size(2, 0);
        builder.h(0).cnot(0, 1);
        let mut dag = builder.build_dag().unwrap();
        assert!(dag.is_frozen());

        let circuit = Circuit::from_dag(&mut dag).unwrap();
        assert_eq!(circuit.num_ops(), 2);
        assert_eq!(circuit.depth(), 2);
    }

    #[test]
    fn test_measure_error_latches() {
        let mut builder = CircuitBuilder::with_size(1, 1);
        builder.h(0).measure(0, 3);
        assert_eq!(
            builder.build_circuit(),
            Err(IrError::BadClbit {
                clbit: 3,
                clbits: 1
            })
        );
    }

    #[test]
    fn test_bell_preset() {
        let circuit = CircuitBuilder::bell().unwrap();
        assert_eq!(circuit.qubits(), 2);
        assert_eq!(circuit.clbits(), 2);
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_ghz_preset() {
        let circuit = CircuitBuilder::ghz(4).unwrap();
        assert_eq!(circuit.qubits(), 4);
        assert_eq!(circuit.num_ops(), 1 + 3 + 4);
    }
}

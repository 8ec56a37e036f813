//! Error types for the IR crate.

use thiserror::Error;

/// Errors that can occur while constructing or validating a circuit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit index outside the circuit's register.
    #[error("qubit index {qubit} out of range for {qubits}-qubit circuit")]
    BadQubit {
        /// The offending qubit index.
        qubit: usize,
        /// Number of qubits in the circuit.
        qubits: usize,
    },

    /// Classical bit index outside the circuit's register.
    #[error("classical bit index {clbit} out of range for {clbits}-bit register")]
    BadClbit {
        /// The offending classical bit index.
        clbit: usize,
        /// Number of classical bits in the circuit.
        clbits: usize,
    },

    /// Number of qubits handed to a gate does not match its span.
    #[error("gate '{gate}' spans {expected} qubits, got {got}")]
    SpanMismatch {
        /// Name of the gate.
        gate: &'static str,
        /// Qubit span required by the gate.
        expected: usize,
        /// Number of qubits actually provided.
        got: usize,
    },

    /// A gate application names the same wire twice.
    #[error("duplicate qubit {qubit} in application of gate '{gate}'")]
    DuplicateQubit {
        /// The duplicated qubit index.
        qubit: usize,
        /// Name of the gate.
        gate: &'static str,
    },

    /// Mutation attempted on a validated (frozen) DAG.
    #[error("circuit graph is frozen, no further mutation")]
    Frozen,

    /// The builder already produced its circuit.
    #[error("builder already consumed by a successful build")]
    AlreadyBuilt,

    /// Cycle detected during validation. The per-wire construction rules
    /// cannot produce one, so this indicates an internal bug.
    #[error("cycle detected involving node {node}")]
    Cycle {
        /// Index of a node on the cycle.
        node: usize,
    },

    /// Gate name or alias not recognized.
    #[error("unknown gate '{0}'")]
    UnknownGate(String),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;

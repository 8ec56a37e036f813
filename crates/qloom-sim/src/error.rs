//! Simulation kernel errors.

use thiserror::Error;

/// Errors raised by the statevector kernel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SimError {
    /// The kernel has no implementation for this gate.
    #[error("unsupported gate '{0}'")]
    UnsupportedGate(&'static str),

    /// A qubit index does not fit the allocated state.
    #[error("qubit {qubit} out of range for {qubits}-qubit state")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: usize,
        /// Number of qubits in the state.
        qubits: usize,
    },

    /// A classical bit index does not fit the allocated register.
    #[error("classical bit {clbit} out of range for {clbits}-bit register")]
    ClbitOutOfRange {
        /// The offending classical bit index.
        clbit: usize,
        /// Number of classical bits in the register.
        clbits: usize,
    },
}

/// Result type for kernel operations.
pub type SimResult<T> = Result<T, SimError>;

//! The closed gate catalog.
//!
//! Each gate is a small immutable descriptor: a canonical name, a qubit
//! span, and the *relative* target/control indices within that span.
//! Measurement is part of the catalog as a distinguished one-qubit gate
//! whose semantics include a classical-bit write.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};

/// A gate from the closed catalog.
///
/// Gates carry no parameters, so a `Copy` enum is all that is needed;
/// equality is identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gate {
    /// Hadamard gate.
    H,
    /// Pauli-X (bit flip) gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z (phase flip) gate.
    Z,
    /// S gate (sqrt(Z)).
    S,
    /// Controlled-NOT gate.
    Cnot,
    /// Controlled-Z gate.
    Cz,
    /// SWAP gate.
    Swap,
    /// Toffoli (CCX) gate.
    Toffoli,
    /// Fredkin (CSWAP) gate.
    Fredkin,
    /// Projective measurement into a classical bit.
    Measure,
}

impl Gate {
    /// Every gate in the catalog, in table order.
    pub const ALL: [Gate; 11] = [
        Gate::H,
        Gate::X,
        Gate::Y,
        Gate::Z,
        Gate::S,
        Gate::Cnot,
        Gate::Cz,
        Gate::Swap,
        Gate::Toffoli,
        Gate::Fredkin,
        Gate::Measure,
    ];

    /// Canonical name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Gate::H => "H",
            Gate::X => "X",
            Gate::Y => "Y",
            Gate::Z => "Z",
            Gate::S => "S",
            Gate::Cnot => "CNOT",
            Gate::Cz => "CZ",
            Gate::Swap => "SWAP",
            Gate::Toffoli => "TOFFOLI",
            Gate::Fredkin => "FREDKIN",
            Gate::Measure => "MEASURE",
        }
    }

    /// Number of qubits this gate acts on.
    #[inline]
    pub fn span(&self) -> usize {
        match self {
            Gate::H | Gate::X | Gate::Y | Gate::Z | Gate::S | Gate::Measure => 1,
            Gate::Cnot | Gate::Cz | Gate::Swap => 2,
            Gate::Toffoli | Gate::Fredkin => 3,
        }
    }

    /// Relative indices of the target qubits within the span.
    #[inline]
    pub fn targets(&self) -> &'static [usize] {
        match self {
            Gate::H | Gate::X | Gate::Y | Gate::Z | Gate::S | Gate::Measure => &[0],
            Gate::Cnot | Gate::Cz => &[1],
            Gate::Swap => &[0, 1],
            Gate::Toffoli => &[2],
            Gate::Fredkin => &[1, 2],
        }
    }

    /// Relative indices of the control qubits within the span.
    #[inline]
    pub fn controls(&self) -> &'static [usize] {
        match self {
            Gate::H | Gate::X | Gate::Y | Gate::Z | Gate::S | Gate::Measure | Gate::Swap => &[],
            Gate::Cnot | Gate::Cz | Gate::Fredkin => &[0],
            Gate::Toffoli => &[0, 1],
        }
    }

    /// Symbol used by diagram renderers.
    #[inline]
    pub fn draw_symbol(&self) -> &'static str {
        match self {
            Gate::H => "H",
            Gate::X => "X",
            Gate::Y => "Y",
            Gate::Z => "Z",
            Gate::S => "S",
            Gate::Cnot => "⊕",
            Gate::Cz => "●",
            Gate::Swap => "×",
            Gate::Toffoli => "T",
            Gate::Fredkin => "F",
            Gate::Measure => "M",
        }
    }

    /// Check whether this is the measurement pseudo-gate.
    #[inline]
    pub fn is_measure(&self) -> bool {
        matches!(self, Gate::Measure)
    }

    /// Look up a gate by name or common alias.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace:
    /// `cx` is CNOT, `ccx` and `t` are Toffoli, `cswap` is Fredkin, and
    /// `m`/`meas` are measurement.
    pub fn from_name(name: &str) -> IrResult<Gate> {
        match name.trim().to_ascii_lowercase().as_str() {
            "h" => Ok(Gate::H),
            "x" => Ok(Gate::X),
            "y" => Ok(Gate::Y),
            "z" => Ok(Gate::Z),
            "s" => Ok(Gate::S),
            "cnot" | "cx" => Ok(Gate::Cnot),
            "cz" => Ok(Gate::Cz),
            "swap" => Ok(Gate::Swap),
            "toffoli" | "ccx" | "t" => Ok(Gate::Toffoli),
            "fredkin" | "cswap" => Ok(Gate::Fredkin),
            "measure" | "meas" | "m" => Ok(Gate::Measure),
            _ => Err(IrError::UnknownGate(name.to_string())),
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        assert_eq!(Gate::H.span(), 1);
        assert_eq!(Gate::Cnot.span(), 2);
        assert_eq!(Gate::Toffoli.span(), 3);

        assert_eq!(Gate::Cnot.targets(), &[1]);
        assert_eq!(Gate::Cnot.controls(), &[0]);
        assert_eq!(Gate::Swap.targets(), &[0, 1]);
        assert!(Gate::Swap.controls().is_empty());
        assert_eq!(Gate::Toffoli.controls(), &[0, 1]);
        assert_eq!(Gate::Fredkin.targets(), &[1, 2]);
    }

    #[test]
    fn test_targets_and_controls_disjoint() {
        for gate in Gate::ALL {
            for t in gate.targets() {
                assert!(
                    !gate.controls().contains(t),
                    "{gate}: index {t} is both target and control"
                );
                assert!(*t < gate.span());
            }
            for c in gate.controls() {
                assert!(*c < gate.span());
            }
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!(Gate::from_name("cx").unwrap(), Gate::Cnot);
        assert_eq!(Gate::from_name("CX").unwrap(), Gate::Cnot);
        assert_eq!(Gate::from_name("  cnot ").unwrap(), Gate::Cnot);
        assert_eq!(Gate::from_name("ccx").unwrap(), Gate::Toffoli);
        assert_eq!(Gate::from_name("t").unwrap(), Gate::Toffoli);
        assert_eq!(Gate::from_name("cswap").unwrap(), Gate::Fredkin);
        assert_eq!(Gate::from_name("m").unwrap(), Gate::Measure);
        assert_eq!(Gate::from_name("meas").unwrap(), Gate::Measure);

        assert!(matches!(
            Gate::from_name("rx"),
            Err(IrError::UnknownGate(name)) if name == "rx"
        ));
    }

    #[test]
    fn test_round_trip_canonical_names() {
        for gate in Gate::ALL {
            assert_eq!(Gate::from_name(gate.name()).unwrap(), gate);
        }
    }

    #[test]
    fn test_measure_is_distinguished() {
        assert!(Gate::Measure.is_measure());
        assert!(!Gate::H.is_measure());
        assert_eq!(Gate::Measure.span(), 1);
    }
}

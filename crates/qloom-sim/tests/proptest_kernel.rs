//! Property-based tests for the statevector kernel.
//!
//! Checks that random gate sequences preserve the norm at every step and
//! that gate-inverse pairs restore the state they were applied to.

use num_complex::Complex64;
use proptest::prelude::*;

use qloom_ir::Gate;
use qloom_sim::Statevector;

/// A gate application that is valid for a circuit of `num_qubits`.
#[derive(Debug, Clone)]
enum GateOp {
    H(usize),
    X(usize),
    Y(usize),
    Z(usize),
    S(usize),
    Cnot(usize, usize),
    Cz(usize, usize),
    Swap(usize, usize),
}

impl GateOp {
    fn apply(&self, state: &mut Statevector) {
        let (gate, qubits) = self.parts();
        state.apply(gate, &qubits).unwrap();
    }

    fn parts(&self) -> (Gate, Vec<usize>) {
        match *self {
            GateOp::H(q) => (Gate::H, vec![q]),
            GateOp::X(q) => (Gate::X, vec![q]),
            GateOp::Y(q) => (Gate::Y, vec![q]),
            GateOp::Z(q) => (Gate::Z, vec![q]),
            GateOp::S(q) => (Gate::S, vec![q]),
            GateOp::Cnot(c, t) => (Gate::Cnot, vec![c, t]),
            GateOp::Cz(c, t) => (Gate::Cz, vec![c, t]),
            GateOp::Swap(a, b) => (Gate::Swap, vec![a, b]),
        }
    }
}

/// Two distinct qubit indices below `num_qubits`.
fn arb_pair(num_qubits: usize) -> impl Strategy<Value = (usize, usize)> {
    (0..num_qubits, 0..num_qubits - 1).prop_map(move |(a, b)| {
        let b = if b >= a { b + 1 } else { b };
        (a, b)
    })
}

fn arb_gate_op(num_qubits: usize) -> BoxedStrategy<GateOp> {
    let single = prop_oneof![
        (0..num_qubits).prop_map(GateOp::H),
        (0..num_qubits).prop_map(GateOp::X),
        (0..num_qubits).prop_map(GateOp::Y),
        (0..num_qubits).prop_map(GateOp::Z),
        (0..num_qubits).prop_map(GateOp::S),
    ];
    if num_qubits < 2 {
        single.boxed()
    } else {
        prop_oneof![
            single,
            arb_pair(num_qubits).prop_map(|(c, t)| GateOp::Cnot(c, t)),
            arb_pair(num_qubits).prop_map(|(c, t)| GateOp::Cz(c, t)),
            arb_pair(num_qubits).prop_map(|(a, b)| GateOp::Swap(a, b)),
        ]
        .boxed()
    }
}

/// A qubit count in 1..=5 together with a valid gate sequence.
fn arb_program() -> impl Strategy<Value = (usize, Vec<GateOp>)> {
    (1usize..=5).prop_flat_map(|num_qubits| {
        (
            Just(num_qubits),
            prop::collection::vec(arb_gate_op(num_qubits), 0..20),
        )
    })
}

fn distance_sqr(a: &[Complex64], b: &[Complex64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).norm_sqr()).sum()
}

proptest! {
    #[test]
    fn norm_is_preserved_at_every_step((num_qubits, ops) in arb_program()) {
        let mut state = Statevector::new(num_qubits, 0);
        prop_assert!((state.norm_sqr() - 1.0).abs() < 1e-10);
        for op in &ops {
            op.apply(&mut state);
            prop_assert!((state.norm_sqr() - 1.0).abs() < 1e-10);

            let total: f64 = state.probabilities().iter().sum();
            prop_assert!((total - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn inverse_pairs_restore_the_state((num_qubits, prefix) in arb_program()) {
        let mut state = Statevector::new(num_qubits, 0);
        for op in &prefix {
            op.apply(&mut state);
        }
        let before = state.amplitudes().to_vec();

        // Self-inverse single-qubit gates.
        for gate in [Gate::X, Gate::H, Gate::Z] {
            state.apply(gate, &[0]).unwrap();
            state.apply(gate, &[0]).unwrap();
            prop_assert!(distance_sqr(state.amplitudes(), &before) < 1e-18);
        }

        // S has order four.
        for _ in 0..4 {
            state.apply(Gate::S, &[0]).unwrap();
        }
        prop_assert!(distance_sqr(state.amplitudes(), &before) < 1e-18);

        if num_qubits >= 2 {
            for gate in [Gate::Cnot, Gate::Cz, Gate::Swap] {
                state.apply(gate, &[0, 1]).unwrap();
                state.apply(gate, &[0, 1]).unwrap();
                prop_assert!(distance_sqr(state.amplitudes(), &before) < 1e-18);
            }
        }
    }
}

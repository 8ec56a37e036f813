//! Dense statevector evolution.
//!
//! Amplitudes are indexed by computational basis state, bit `q` of the
//! index holding the value of qubit `q`. Every gate kernel works in place:
//! pairs are visited through the index with the relevant bit clear, so each
//! pair is read and written exactly once and no per-gate allocation occurs.

use num_complex::Complex64;
use rand::Rng;
use std::f64::consts::FRAC_1_SQRT_2;

use qloom_ir::Gate;

use crate::error::{SimError, SimResult};

/// Threshold below which a post-measurement norm is considered degenerate.
const NORM_EPSILON: f64 = 1e-10;

/// The quantum state of a `Q`-qubit, `K`-classical-bit system.
#[derive(Debug, Clone)]
pub struct Statevector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
    classical: Vec<bool>,
}

impl Statevector {
    /// Allocate the state `|0…0⟩` with `num_clbits` cleared classical bits.
    pub fn new(num_qubits: usize, num_clbits: usize) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
            classical: vec![false; num_clbits],
        }
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.classical.len()
    }

    /// The raw amplitude vector.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// The classical register.
    pub fn classical_bits(&self) -> &[bool] {
        &self.classical
    }

    /// Write a classical bit.
    pub fn set_classical(&mut self, clbit: usize, value: bool) -> SimResult<()> {
        let clbits = self.classical.len();
        let slot = self
            .classical
            .get_mut(clbit)
            .ok_or(SimError::ClbitOutOfRange { clbit, clbits })?;
        *slot = value;
        Ok(())
    }

    /// Per-basis-state probabilities, without collapsing the state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes
            .iter()
            .map(|a| a.re * a.re + a.im * a.im)
            .collect()
    }

    /// Squared norm of the whole state; 1 ± 1e-10 for any valid history.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes
            .iter()
            .map(|a| a.re * a.re + a.im * a.im)
            .sum()
    }

    /// Apply a unitary gate from the catalog to absolute qubits.
    ///
    /// Measurement is not a unitary and is rejected here; use
    /// [`Statevector::measure`].
    pub fn apply(&mut self, gate: Gate, qubits: &[usize]) -> SimResult<()> {
        for &q in qubits {
            if q >= self.num_qubits {
                return Err(SimError::QubitOutOfRange {
                    qubit: q,
                    qubits: self.num_qubits,
                });
            }
        }
        match gate {
            Gate::H => self.hadamard(qubits[0]),
            Gate::X => self.pauli_x(qubits[0]),
            Gate::Y => self.pauli_y(qubits[0]),
            Gate::Z => self.pauli_z(qubits[0]),
            Gate::S => self.phase_s(qubits[0]),
            Gate::Cnot => self.cnot(qubits[0], qubits[1]),
            Gate::Cz => self.cz(qubits[0], qubits[1]),
            Gate::Swap => self.swap(qubits[0], qubits[1]),
            Gate::Toffoli => self.toffoli(qubits[0], qubits[1], qubits[2]),
            Gate::Fredkin => self.fredkin(qubits[0], qubits[1], qubits[2]),
            Gate::Measure => return Err(SimError::UnsupportedGate("MEASURE")),
        }
        Ok(())
    }

    /// Projectively measure `qubit`, collapsing and renormalizing the state.
    ///
    /// Renormalization divides by the square root of the surviving weight,
    /// so a later measurement of another wire still sees the correct
    /// marginal distribution. A surviving weight at or below 1e-10 means
    /// the sampled outcome had zero probability (caller error); the state
    /// is left as projected.
    pub fn measure(&mut self, qubit: usize, rng: &mut impl Rng) -> SimResult<bool> {
        if qubit >= self.num_qubits {
            return Err(SimError::QubitOutOfRange {
                qubit,
                qubits: self.num_qubits,
            });
        }
        let mask = 1usize << qubit;

        let mut prob_one = 0.0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            if i & mask != 0 {
                prob_one += amp.re * amp.re + amp.im * amp.im;
            }
        }

        let outcome = rng.gen::<f64>() < prob_one;

        let mut norm = 0.0;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if ((i & mask) != 0) == outcome {
                norm += amp.re * amp.re + amp.im * amp.im;
            } else {
                *amp = Complex64::new(0.0, 0.0);
            }
        }

        if norm > NORM_EPSILON {
            let inv_norm = 1.0 / norm.sqrt();
            for (i, amp) in self.amplitudes.iter_mut().enumerate() {
                if ((i & mask) != 0) == outcome {
                    *amp *= inv_norm;
                }
            }
        }

        Ok(outcome)
    }

    /// Render the classical register, bit 0 rightmost; `"0"` when empty.
    pub fn outcome_string(&self) -> String {
        if self.classical.is_empty() {
            return "0".to_string();
        }
        self.classical
            .iter()
            .rev()
            .map(|&b| if b { '1' } else { '0' })
            .collect()
    }

    // One-qubit kernels ----------------------------------------------------

    fn hadamard(&mut self, target: usize) {
        let mask = 1usize << target;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = (a + b) * FRAC_1_SQRT_2;
                self.amplitudes[j] = (a - b) * FRAC_1_SQRT_2;
            }
        }
    }

    fn pauli_x(&mut self, target: usize) {
        let mask = 1usize << target;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn pauli_y(&mut self, target: usize) {
        let mask = 1usize << target;
        let im = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                self.amplitudes[i] = -im * self.amplitudes[j];
                self.amplitudes[j] = im * a;
            }
        }
    }

    fn pauli_z(&mut self, target: usize) {
        let mask = 1usize << target;
        for i in 0..self.amplitudes.len() {
            if i & mask != 0 {
                self.amplitudes[i] = -self.amplitudes[i];
            }
        }
    }

    fn phase_s(&mut self, target: usize) {
        let mask = 1usize << target;
        let im = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if i & mask != 0 {
                self.amplitudes[i] *= im;
            }
        }
    }

    // Two-qubit kernels ----------------------------------------------------

    fn cnot(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1usize << control;
        let tgt_mask = 1usize << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    fn cz(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1usize << control;
        let tgt_mask = 1usize << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask != 0) {
                self.amplitudes[i] = -self.amplitudes[i];
            }
        }
    }

    fn swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1usize << q1;
        let mask2 = 1usize << q2;
        // Visiting only (q1=1, q2=0) states touches each pair once.
        for i in 0..self.amplitudes.len() {
            if (i & mask1 != 0) && (i & mask2 == 0) {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    // Three-qubit kernels --------------------------------------------------

    fn toffoli(&mut self, c1: usize, c2: usize, target: usize) {
        let ctrl_mask = (1usize << c1) | (1usize << c2);
        let tgt_mask = 1usize << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask == ctrl_mask) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    fn fredkin(&mut self, control: usize, t1: usize, t2: usize) {
        let ctrl_mask = 1usize << control;
        let mask1 = 1usize << t1;
        let mask2 = 1usize << t2;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & mask1 != 0) && (i & mask2 == 0) {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }
}

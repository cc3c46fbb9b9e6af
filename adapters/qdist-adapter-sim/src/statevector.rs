//! Statevector simulation engine.

use num_complex::Complex64;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

use qdist_hal::{HalError, HalResult};
use qdist_ir::{Instruction, InstructionKind, StandardGate};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// A pure quantum state over `num_qubits` qubits.
///
/// Bit `q` of an amplitude index is the value of qubit `q`.
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let mut amplitudes = vec![ZERO; 1 << num_qubits];
        amplitudes[0] = ONE;
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Apply an instruction. Measurements and barriers leave the state alone;
    /// sampling happens once the whole circuit has been applied.
    pub fn apply(&mut self, instruction: &Instruction) {
        let qubits: Vec<usize> = instruction.qubits.iter().map(|q| q.0 as usize).collect();
        match &instruction.kind {
            InstructionKind::Gate { gate } => self.apply_standard_gate(*gate, &qubits),
            InstructionKind::Initialize { amplitudes } => self.initialize(&qubits, amplitudes),
            InstructionKind::Measure | InstructionKind::Barrier => {}
        }
    }

    fn apply_standard_gate(&mut self, gate: StandardGate, qubits: &[usize]) {
        match gate {
            StandardGate::X => self.apply_x(qubits[0]),
            StandardGate::Z => self.apply_z(qubits[0]),
            StandardGate::H => self.apply_h(qubits[0]),
            StandardGate::CX => self.apply_cx(qubits[0], qubits[1]),
            StandardGate::Swap => self.apply_swap(qubits[0], qubits[1]),
            StandardGate::CSwap => self.apply_cswap(qubits[0], qubits[1], qubits[2]),
        }
    }

    // =========================================================================
    // State preparation
    // =========================================================================

    /// Reset `qubits` and load `amplitudes` into them.
    ///
    /// Exact when the target qubits are not entangled with the rest of the
    /// register, which holds for initialization at the start of a circuit.
    fn initialize(&mut self, qubits: &[usize], amplitudes: &[f64]) {
        for &q in qubits {
            self.reset(q);
        }

        let mask = qubits.iter().fold(0usize, |m, &q| m | (1 << q));
        let mut next = vec![ZERO; self.amplitudes.len()];

        for (i, &base) in self.amplitudes.iter().enumerate() {
            if i & mask != 0 || base == ZERO {
                continue;
            }
            for (j, &amp) in amplitudes.iter().enumerate() {
                let target = qubits
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| (j >> k) & 1 == 1)
                    .fold(i, |t, (_, &q)| t | (1 << q));
                next[target] += base * amp;
            }
        }

        self.amplitudes = next;
    }

    /// Bring `qubit` to |0⟩: project onto the |0⟩ branch and renormalize, or
    /// flip when that branch is empty.
    fn reset(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let p0: f64 = self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask == 0)
            .map(|(_, a)| a.norm_sqr())
            .sum();

        if p0 == 0.0 {
            self.apply_x(qubit);
            return;
        }

        let scale = 1.0 / p0.sqrt();
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == 0 {
                *amp *= scale;
            } else {
                *amp = ZERO;
            }
        }
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_z(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp = -*amp;
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = std::f64::consts::FRAC_1_SQRT_2;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        self.swap_where(0, q1, q2);
    }

    fn apply_cswap(&mut self, control: usize, t1: usize, t2: usize) {
        self.swap_where(1 << control, t1, t2);
    }

    /// Exchange the values of `q1` and `q2` on every basis state whose bits in
    /// `ctrl_mask` are all set.
    fn swap_where(&mut self, ctrl_mask: usize, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..self.amplitudes.len() {
            if i & ctrl_mask == ctrl_mask && i & mask1 != 0 && i & mask2 == 0 {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    // =========================================================================
    // Readout
    // =========================================================================

    /// Probability of each computational basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Probability that `qubit` reads 0.
    #[cfg(test)]
    pub fn probability_zero(&self, qubit: usize) -> f64 {
        let mask = 1 << qubit;
        self.probabilities()
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask == 0)
            .map(|(_, p)| p)
            .sum()
    }

    /// Draw `shots` basis-state indices from the Born distribution.
    ///
    /// Fails when the probabilities are not a distribution, e.g. all zero or
    /// not finite.
    pub fn sample_many<R: Rng + ?Sized>(
        &self,
        shots: u32,
        rng: &mut R,
    ) -> HalResult<Vec<usize>> {
        let dist = WeightedIndex::new(self.probabilities())
            .map_err(|e| HalError::Backend(format!("cannot sample statevector: {e}")))?;
        Ok((0..shots).map(|_| dist.sample(rng)).collect())
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }
}

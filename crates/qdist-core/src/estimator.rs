//! The swap-test estimator.
//!
//! Circuit layout (5 qubits, 1 classical bit):
//!
//! ```text
//!   q0 (ancilla) ──────────── H ──●── H ── M ─→ c0
//!   q1 (φ)       ─ init(φ) ───────×───────────
//!   q2 (ψ, lsb)  ┐                │
//!   q3 (ψ)       ├ init(ψ) ───────×───────────
//!   q4 (ψ, msb)  ┘
//! ```
//!
//! For a noiseless backend P(c0 = 0) = 3/4 − A·B / (2Z), so
//! `2Z · |2·P(0) − 1|` recovers ‖A − B‖².

use serde::Serialize;
use tracing::{debug, info, instrument};

use qdist_hal::{Backend, Counts, HalError, ValidationResult};
use qdist_ir::{Circuit, ClbitId, QubitId};

use crate::classical::classical_distance;
use crate::error::{EstimateError, EstimateResult};
use crate::state::{AmplitudeStates, prepare_states};

/// Name given to every swap-test circuit.
pub const CIRCUIT_NAME: &str = "qed_phi_psi";

/// Qubits in the swap-test circuit.
pub const NUM_QUBITS: u32 = 5;

/// Classical bits in the swap-test circuit.
pub const NUM_CLBITS: u32 = 1;

const ANCILLA: QubitId = QubitId(0);
const PHI_QUBIT: QubitId = QubitId(1);
const PSI_QUBITS: [QubitId; 3] = [QubitId(2), QubitId(3), QubitId(4)];

/// Statistics extracted from one swap-test run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SwapTestOutcome {
    /// Fraction of shots in which the ancilla read 0.
    pub p0: f64,
    /// |p0 − 0.5| / 0.5.
    pub overlap: f64,
    /// √(overlap · 2 · Z).
    pub quantum: f64,
}

/// The full result of a distance estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceEstimate {
    /// Exact Euclidean distance.
    pub classical: f64,
    /// Swap-test estimate of the same distance.
    pub quantum: f64,
    /// Fraction of shots in which the ancilla read 0.
    pub p0: f64,
    /// Overlap statistic derived from `p0`.
    pub overlap: f64,
    /// Number of shots requested.
    pub shots: u32,
}

impl DistanceEstimate {
    /// Absolute difference between the two distances.
    pub fn error(&self) -> f64 {
        (self.quantum - self.classical).abs()
    }
}

/// Runs swap tests with a fixed shot count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapTestEstimator {
    shots: u32,
}

impl SwapTestEstimator {
    /// Create an estimator sampling `shots` times per estimate.
    ///
    /// The shot count is checked against the backend when an estimate runs.
    pub fn new(shots: u32) -> Self {
        Self { shots }
    }

    /// Shots per estimate.
    pub fn shots(&self) -> u32 {
        self.shots
    }

    /// Build the swap-test circuit for prepared states.
    pub fn build_circuit(states: &AmplitudeStates) -> EstimateResult<Circuit> {
        let mut circuit = Circuit::with_size(CIRCUIT_NAME, NUM_QUBITS, NUM_CLBITS);
        circuit
            .initialize(&states.phi, [PHI_QUBIT])?
            .initialize(&states.psi, PSI_QUBITS)?
            .h(ANCILLA)?
            .cswap(ANCILLA, PHI_QUBIT, PSI_QUBITS[0])?
            .h(ANCILLA)?
            .measure(ANCILLA, ClbitId(0))?;
        Ok(circuit)
    }

    /// Extract `(p0, overlap)` from ancilla counts.
    ///
    /// Counts must use only the keys "0" and "1" and sum to `shots`. A
    /// missing "0" key means p0 = 0.
    pub fn overlap_from_counts(counts: &Counts, shots: u32) -> EstimateResult<(f64, f64)> {
        if shots == 0 {
            return Err(EstimateError::InvalidConfiguration(
                "shots must be at least 1".into(),
            ));
        }

        let unexpected = counts
            .sorted()
            .into_iter()
            .find(|(k, _)| *k != "0" && *k != "1");
        if let Some((key, _)) = unexpected {
            return Err(EstimateError::MalformedCounts(format!(
                "unexpected outcome {key:?}; expected \"0\" or \"1\""
            )));
        }

        let total = counts.total();
        if total != u64::from(shots) {
            return Err(EstimateError::MalformedCounts(format!(
                "counts sum to {total} but {shots} shots were requested"
            )));
        }

        let p0 = counts.get("0") as f64 / f64::from(shots);
        let overlap = (p0 - 0.5).abs() / 0.5;
        Ok((p0, overlap))
    }

    /// Invert the swap-test statistic into a distance.
    pub fn distance_from_overlap(overlap: f64, z: f64) -> f64 {
        (overlap * 2.0 * z).sqrt()
    }

    /// Sample the swap test for prepared states on `backend`.
    #[instrument(skip(self, states, backend), fields(backend = backend.name(), shots = self.shots))]
    pub async fn estimate(
        &self,
        states: &AmplitudeStates,
        z: f64,
        backend: &dyn Backend,
    ) -> EstimateResult<SwapTestOutcome> {
        self.check_shots(backend)?;

        let circuit = Self::build_circuit(states)?;
        debug!(
            ops = circuit.num_ops(),
            depth = circuit.depth(),
            "built swap-test circuit"
        );

        if let ValidationResult::Invalid { reasons } = backend.validate(&circuit).await? {
            return Err(HalError::InvalidCircuit(reasons.join("; ")).into());
        }

        let job_id = backend.submit(&circuit, self.shots).await?;
        debug!(job = %job_id, "submitted swap test");

        let result = backend.wait(&job_id).await?;
        let (p0, overlap) = Self::overlap_from_counts(&result.counts, self.shots)?;
        let quantum = Self::distance_from_overlap(overlap, z);
        debug!(p0, overlap, quantum, "processed counts");

        Ok(SwapTestOutcome {
            p0,
            overlap,
            quantum,
        })
    }

    /// Run the whole pipeline: classical distance, state preparation and the
    /// swap test.
    ///
    /// Input errors surface before anything is sent to `backend`.
    pub async fn run(
        &self,
        a: &[f64],
        b: &[f64],
        backend: &dyn Backend,
    ) -> EstimateResult<DistanceEstimate> {
        let stats = classical_distance(a, b)?;
        debug!(
            distance = stats.distance,
            norm_a = stats.norm_a,
            norm_b = stats.norm_b,
            z = stats.z,
            "classical stats"
        );

        let states = prepare_states(a, b, stats.z)?;
        let outcome = self.estimate(&states, stats.z, backend).await?;

        info!(
            classical = stats.distance,
            quantum = outcome.quantum,
            shots = self.shots,
            "distance estimated"
        );

        Ok(DistanceEstimate {
            classical: stats.distance,
            quantum: outcome.quantum,
            p0: outcome.p0,
            overlap: outcome.overlap,
            shots: self.shots,
        })
    }

    fn check_shots(&self, backend: &dyn Backend) -> EstimateResult<()> {
        if self.shots == 0 {
            return Err(EstimateError::InvalidConfiguration(
                "shots must be at least 1".into(),
            ));
        }
        let max = backend.capabilities().max_shots;
        if self.shots > max {
            return Err(EstimateError::InvalidConfiguration(format!(
                "{} shots requested but {} accepts at most {max}",
                self.shots,
                backend.name()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdist_ir::InstructionKind;

    fn orthogonal_states() -> AmplitudeStates {
        prepare_states(&[2.0, 0.0], &[0.0, 2.0], 8.0).unwrap()
    }

    #[test]
    fn test_circuit_shape() {
        let circuit = SwapTestEstimator::build_circuit(&orthogonal_states()).unwrap();
        assert_eq!(circuit.name(), CIRCUIT_NAME);
        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.num_clbits(), 1);
        assert_eq!(circuit.num_ops(), 6);
    }

    #[test]
    fn test_circuit_gate_order() {
        let circuit = SwapTestEstimator::build_circuit(&orthogonal_states()).unwrap();
        let ancilla_ops: Vec<&str> = circuit
            .instructions()
            .into_iter()
            .filter(|inst| inst.qubits.contains(&ANCILLA))
            .map(|inst| inst.name())
            .collect();
        assert_eq!(ancilla_ops, ["h", "cswap", "h", "measure"]);

        let cswap = circuit
            .instructions()
            .into_iter()
            .find(|inst| inst.name() == "cswap")
            .unwrap();
        assert_eq!(cswap.qubits, vec![QubitId(0), QubitId(1), QubitId(2)]);
    }

    #[test]
    fn test_circuit_initializes_registers() {
        let states = orthogonal_states();
        let circuit = SwapTestEstimator::build_circuit(&states).unwrap();

        let inits: Vec<_> = circuit
            .instructions()
            .into_iter()
            .filter_map(|inst| match &inst.kind {
                InstructionKind::Initialize { amplitudes } => {
                    Some((inst.qubits.clone(), amplitudes.clone()))
                }
                _ => None,
            })
            .collect();
        assert_eq!(inits.len(), 2);
        assert!(inits.contains(&(vec![QubitId(1)], states.phi.to_vec())));
        assert!(inits.contains(&(PSI_QUBITS.to_vec(), states.psi.to_vec())));
    }

    #[test]
    fn test_circuit_is_pure_function_of_states() {
        let states = orthogonal_states();
        let a = SwapTestEstimator::build_circuit(&states).unwrap();
        let b = SwapTestEstimator::build_circuit(&states).unwrap();
        assert_eq!(a.instructions(), b.instructions());
    }

    #[test]
    fn test_overlap_inversion() {
        let cases = [(1000, 1.0), (500, 0.0), (0, 1.0), (750, 0.5)];
        for (zeros, expected) in cases {
            let counts = Counts::from_pairs([("0", zeros), ("1", 1000 - zeros)]);
            let (p0, overlap) = SwapTestEstimator::overlap_from_counts(&counts, 1000).unwrap();
            assert!((p0 - zeros as f64 / 1000.0).abs() < 1e-12);
            assert!((overlap - expected).abs() < 1e-12, "zeros = {zeros}");
        }
    }

    #[test]
    fn test_missing_zero_key() {
        let counts = Counts::from_pairs([("1", 10u64)]);
        let (p0, overlap) = SwapTestEstimator::overlap_from_counts(&counts, 10).unwrap();
        assert_eq!(p0, 0.0);
        assert_eq!(overlap, 1.0);
    }

    #[test]
    fn test_counts_must_sum_to_shots() {
        let counts = Counts::from_pairs([("0", 5u64), ("1", 4)]);
        let err = SwapTestEstimator::overlap_from_counts(&counts, 10).unwrap_err();
        assert!(matches!(err, EstimateError::MalformedCounts(_)));
        assert!(err.is_backend_failure());
    }

    #[test]
    fn test_unexpected_outcome_key() {
        let counts = Counts::from_pairs([("0", 5u64), ("01", 5)]);
        let err = SwapTestEstimator::overlap_from_counts(&counts, 10).unwrap_err();
        assert!(matches!(err, EstimateError::MalformedCounts(_)));
    }

    #[test]
    fn test_distance_from_overlap() {
        assert!((SwapTestEstimator::distance_from_overlap(1.0, 8.0) - 4.0).abs() < 1e-12);
        assert_eq!(SwapTestEstimator::distance_from_overlap(0.0, 8.0), 0.0);
    }
}

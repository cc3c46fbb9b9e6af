//! Pipeline tests against a deterministic stub backend.
//!
//! The stub answers every swap test with a fixed fraction of "0" outcomes, so
//! the expected estimate follows directly from the overlap inversion.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use qdist_core::{EstimateError, SwapTestEstimator, estimate_distance};
use qdist_hal::{
    Backend, Capabilities, Counts, ExecutionResult, HalError, HalResult, JobId, JobStatus,
    ValidationResult,
};
use qdist_ir::Circuit;

/// Backend that reports `floor(p0 · shots)` zeros and records submissions.
struct FixedP0Backend {
    p0: f64,
    capabilities: Capabilities,
    submissions: AtomicUsize,
    last: Mutex<Option<(Circuit, u32)>>,
    counts_override: Option<Counts>,
}

impl FixedP0Backend {
    fn new(p0: f64) -> Self {
        Self {
            p0,
            capabilities: Capabilities::simulator(5),
            submissions: AtomicUsize::new(0),
            last: Mutex::new(None),
            counts_override: None,
        }
    }

    fn with_counts(counts: Counts) -> Self {
        Self {
            counts_override: Some(counts),
            ..Self::new(1.0)
        }
    }

    fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Backend for FixedP0Backend {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "fixed-p0"
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        Ok(ValidationResult::check(&self.capabilities, circuit))
    }

    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        let n = self.submissions.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some((circuit.clone(), shots));
        Ok(JobId::new(format!("fixed-{n}")))
    }

    async fn status(&self, _job_id: &JobId) -> HalResult<JobStatus> {
        Ok(JobStatus::Completed)
    }

    async fn result(&self, _job_id: &JobId) -> HalResult<ExecutionResult> {
        let (_, shots) = self
            .last
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| HalError::JobNotFound("nothing submitted".into()))?;

        let counts = self.counts_override.clone().unwrap_or_else(|| {
            let zeros = (self.p0 * f64::from(shots)) as u64;
            Counts::from_pairs([("0", zeros), ("1", u64::from(shots) - zeros)])
        });
        Ok(ExecutionResult::new(counts, shots))
    }

    async fn cancel(&self, _job_id: &JobId) -> HalResult<()> {
        Ok(())
    }
}

/// Backend whose every job fails.
struct FailingBackend {
    capabilities: Capabilities,
}

#[async_trait]
impl Backend for FailingBackend {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "failing"
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn validate(&self, _circuit: &Circuit) -> HalResult<ValidationResult> {
        Ok(ValidationResult::Valid)
    }

    async fn submit(&self, _circuit: &Circuit, _shots: u32) -> HalResult<JobId> {
        Ok(JobId::new("doomed"))
    }

    async fn status(&self, _job_id: &JobId) -> HalResult<JobStatus> {
        Ok(JobStatus::Failed("device offline".into()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        Err(HalError::JobNotFound(job_id.0.clone()))
    }

    async fn cancel(&self, _job_id: &JobId) -> HalResult<()> {
        Ok(())
    }
}

const A: [f64; 2] = [2.0, 0.0];
const B: [f64; 2] = [0.0, 2.0];

#[tokio::test]
async fn test_certain_zero_outcome() {
    let backend = FixedP0Backend::new(1.0);
    let (classical, quantum) = estimate_distance(&A, &B, 1000, &backend).await.unwrap();

    assert!((classical - 8f64.sqrt()).abs() < 1e-12);
    assert!((quantum - 4.0).abs() < 1e-12);
    assert_eq!(backend.submissions(), 1);
}

#[tokio::test]
async fn test_balanced_outcomes_give_zero_distance() {
    let backend = FixedP0Backend::new(0.5);
    let (_, quantum) = estimate_distance(&A, &B, 1000, &backend).await.unwrap();
    assert!(quantum.abs() < 1e-12);
}

#[tokio::test]
async fn test_p0_parametrized() {
    // Z = 8 for A, B above, so quantum = √(16 · |2·p0 − 1|).
    for p0 in [0.0, 0.25, 0.5, 0.75, 0.8, 1.0] {
        let backend = FixedP0Backend::new(p0);
        let estimate = SwapTestEstimator::new(1000)
            .run(&A, &B, &backend)
            .await
            .unwrap();

        let expected = (16.0 * (2.0 * p0 - 1.0_f64).abs()).sqrt();
        assert!((estimate.p0 - p0).abs() < 1e-12, "p0 = {p0}");
        assert!((estimate.quantum - expected).abs() < 1e-9, "p0 = {p0}");
        assert!(estimate.quantum >= 0.0);
        assert_eq!(estimate.shots, 1000);
    }
}

#[tokio::test]
async fn test_submits_swap_test_circuit() {
    let backend = FixedP0Backend::new(0.75);
    estimate_distance(&A, &B, 321, &backend).await.unwrap();

    let (circuit, shots) = backend.last.lock().unwrap().clone().unwrap();
    assert_eq!(shots, 321);
    assert_eq!(circuit.name(), "qed_phi_psi");
    assert_eq!(circuit.num_qubits(), 5);
    assert_eq!(circuit.num_clbits(), 1);
}

#[tokio::test]
async fn test_shape_mismatch_never_reaches_backend() {
    let backend = FixedP0Backend::new(1.0);
    let err = estimate_distance(&[1.0, 2.0], &[1.0, 2.0, 3.0], 1000, &backend)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EstimateError::ShapeMismatch { left: 2, right: 3 }
    ));
    assert_eq!(backend.submissions(), 0);
}

#[tokio::test]
async fn test_zero_norm_vector_is_degenerate() {
    let backend = FixedP0Backend::new(1.0);
    let err = estimate_distance(&[3.0, 4.0], &[0.0, 0.0], 1000, &backend)
        .await
        .unwrap_err();

    assert!(matches!(err, EstimateError::DegenerateInput(_)));
    assert_eq!(backend.submissions(), 0);
}

#[tokio::test]
async fn test_too_long_vectors() {
    let backend = FixedP0Backend::new(1.0);
    let a = [1.0; 5];
    let err = estimate_distance(&a, &a, 1000, &backend).await.unwrap_err();

    assert!(matches!(err, EstimateError::DimensionTooLarge { .. }));
    assert_eq!(backend.submissions(), 0);
}

#[tokio::test]
async fn test_zero_shots_rejected_before_submission() {
    let backend = FixedP0Backend::new(1.0);
    let err = estimate_distance(&A, &B, 0, &backend).await.unwrap_err();

    assert!(matches!(err, EstimateError::InvalidConfiguration(_)));
    assert_eq!(backend.submissions(), 0);
}

#[tokio::test]
async fn test_shots_above_backend_limit() {
    let backend = FixedP0Backend::new(1.0);
    let too_many = backend.capabilities().max_shots + 1;
    let err = estimate_distance(&A, &B, too_many, &backend)
        .await
        .unwrap_err();

    assert!(matches!(err, EstimateError::InvalidConfiguration(_)));
    assert_eq!(backend.submissions(), 0);
}

#[tokio::test]
async fn test_repeated_calls_are_identical() {
    let backend = FixedP0Backend::new(0.8);
    let first = estimate_distance(&A, &B, 1000, &backend).await.unwrap();
    let second = estimate_distance(&A, &B, 1000, &backend).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(backend.submissions(), 2);
}

#[tokio::test]
async fn test_counts_not_summing_to_shots() {
    let backend = FixedP0Backend::with_counts(Counts::from_pairs([("0", 10u64), ("1", 10)]));
    let err = estimate_distance(&A, &B, 1000, &backend).await.unwrap_err();

    assert!(matches!(err, EstimateError::MalformedCounts(_)));
    assert!(err.is_backend_failure());
}

#[tokio::test]
async fn test_counts_with_foreign_keys() {
    let backend = FixedP0Backend::with_counts(Counts::from_pairs([("00", 1000u64)]));
    let err = estimate_distance(&A, &B, 1000, &backend).await.unwrap_err();
    assert!(matches!(err, EstimateError::MalformedCounts(_)));
}

#[tokio::test]
async fn test_backend_failure_propagates() {
    let backend = FailingBackend {
        capabilities: Capabilities::simulator(5),
    };
    let err = estimate_distance(&A, &B, 1000, &backend).await.unwrap_err();

    assert!(matches!(err, EstimateError::Backend(HalError::JobFailed(_))));
    assert!(err.is_backend_failure());
}

#[tokio::test]
async fn test_narrow_backend_rejects_circuit() {
    let mut backend = FixedP0Backend::new(1.0);
    backend.capabilities = Capabilities::simulator(3);
    let err = estimate_distance(&A, &B, 1000, &backend).await.unwrap_err();

    assert!(matches!(
        err,
        EstimateError::Backend(HalError::InvalidCircuit(_))
    ));
    assert_eq!(backend.submissions(), 0);
}

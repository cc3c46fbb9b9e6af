//! The backend trait.
//!
//! A caller drives a backend through the same sequence every time:
//!
//! ```text
//!   capabilities() ─→ validate() ─→ submit() ─→ wait() ─→ ExecutionResult
//!                                                 │
//!                                      status() ──┴── result()
//! ```
//!
//! Backends that execute inline may report `Completed` on the first poll.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use qdist_ir::{Circuit, InstructionKind};

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

/// Delay between `status` polls in [`Backend::wait`].
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Polls [`Backend::wait`] makes before giving up (five minutes).
pub const MAX_POLLS: u32 = 600;

/// Name plus free-form settings for constructing a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub name: String,
    /// Backend-specific settings, e.g. `max_qubits` or `seed`.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Set one backend-specific setting.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Something that samples circuits.
///
/// Implementations must return counts whose values sum to the requested
/// shots, and must only hand out results for `Completed` jobs.
#[async_trait]
pub trait Backend: Send + Sync {
    fn name(&self) -> &str;

    /// Static limits, fixed when the backend is built.
    fn capabilities(&self) -> &Capabilities;

    /// Check a circuit before submission. An `Invalid` answer is not an error.
    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult>;

    /// Queue `circuit` for `shots` independent executions.
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId>;

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    /// Counts of a `Completed` job.
    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;

    async fn cancel(&self, job_id: &JobId) -> HalResult<()>;

    /// Poll until the job is terminal and return its result.
    ///
    /// `Failed` and `Cancelled` become [`HalError::JobFailed`] and
    /// [`HalError::JobCancelled`]; running out of polls is a `Timeout`.
    async fn wait(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        for _ in 0..MAX_POLLS {
            let status = self.status(job_id).await?;
            tracing::debug!(job = %job_id, %status, "polled job");
            match status {
                JobStatus::Completed => return self.result(job_id).await,
                JobStatus::Failed(reason) => return Err(HalError::JobFailed(reason)),
                JobStatus::Cancelled => return Err(HalError::JobCancelled),
                JobStatus::Queued | JobStatus::Running => {
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            }
        }
        Err(HalError::Timeout(job_id.to_string()))
    }
}

/// Outcome of [`Backend::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid { reasons: Vec<String> },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        *self == Self::Valid
    }

    /// Compare `circuit` with the qubit count, gate set and features in
    /// `caps`. Each distinct problem is reported once.
    pub fn check(caps: &Capabilities, circuit: &Circuit) -> Self {
        let mut reasons = Vec::new();

        if circuit.num_qubits() > caps.num_qubits as usize {
            reasons.push(format!(
                "{} qubits requested, {} has {}",
                circuit.num_qubits(),
                caps.name,
                caps.num_qubits
            ));
        }

        for inst in circuit.instructions() {
            match &inst.kind {
                InstructionKind::Gate { gate } if !caps.gate_set.contains(gate.name()) => {
                    reasons.push(format!("gate '{}' not supported", gate.name()));
                }
                InstructionKind::Initialize { .. } if !caps.has_feature("initialize") => {
                    reasons.push("amplitude initialization not supported".to_string());
                }
                _ => {}
            }
        }

        reasons.sort();
        reasons.dedup();
        if reasons.is_empty() {
            Self::Valid
        } else {
            Self::Invalid { reasons }
        }
    }

    /// Append `more` reasons, turning `Valid` into `Invalid` if any are given.
    #[must_use]
    pub fn with_reasons(self, more: impl IntoIterator<Item = String>) -> Self {
        let mut reasons = match self {
            Self::Valid => Vec::new(),
            Self::Invalid { reasons } => reasons,
        };
        reasons.extend(more);
        if reasons.is_empty() {
            Self::Valid
        } else {
            Self::Invalid { reasons }
        }
    }
}

/// Backends that can be built from a [`BackendConfig`].
pub trait BackendFactory: Backend + Sized {
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}

//! Jobs and their lifecycle.
//!
//! ```text
//!   Queued ──→ Running ──→ Completed
//!     │           ├──────→ Failed(reason)
//!     └───────────┴──────→ Cancelled
//! ```
//!
//! Once a job is terminal its status never changes again, and results may
//! only be fetched from a `Completed` job.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Backend-assigned job handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a job is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed(String),
    Cancelled,
}

impl JobStatus {
    /// `Completed`, `Failed` and `Cancelled` are final.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Queued | Self::Running)
    }

    pub fn is_success(&self) -> bool {
        *self == Self::Completed
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => f.write_str("queued"),
            Self::Running => f.write_str("running"),
            Self::Completed => f.write_str("completed"),
            Self::Failed(reason) => write!(f, "failed ({reason})"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Bookkeeping a backend keeps per submitted circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub shots: u32,
    /// Name of the backend that accepted the job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    /// A freshly queued job.
    pub fn new(id: JobId, shots: u32) -> Self {
        Self {
            id,
            status: JobStatus::Queued,
            shots,
            backend: None,
            submitted_at: Utc::now(),
            finished_at: None,
        }
    }

    #[must_use]
    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = Some(backend.into());
        self
    }

    /// Move to `status` unless already terminal. Entering a terminal state
    /// stamps `finished_at`.
    pub fn transition(&mut self, status: JobStatus) {
        if self.status.is_terminal() {
            return;
        }
        if status.is_terminal() {
            self.finished_at = Some(Utc::now());
        }
        self.status = status;
    }

    /// Time from submission to the terminal state, if reached.
    pub fn turnaround(&self) -> Option<TimeDelta> {
        self.finished_at.map(|done| done - self.submitted_at)
    }
}

//! HAL error type.

use thiserror::Error;

/// Failures reported by a backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// The circuit uses something the backend cannot run.
    #[error("circuit rejected: {0}")]
    InvalidCircuit(String),

    /// The circuit needs more qubits than the backend has.
    #[error("circuit too large: {0}")]
    CircuitTooLarge(String),

    /// Shot count is zero or above the backend limit.
    #[error("bad shot count: {0}")]
    InvalidShots(String),

    #[error("no job with id {0}")]
    JobNotFound(String),

    /// The job reached `Failed`.
    #[error("job failed: {0}")]
    JobFailed(String),

    #[error("job was cancelled")]
    JobCancelled,

    /// `wait` gave up before the job finished.
    #[error("gave up waiting for job {0}")]
    Timeout(String),

    /// Backend settings could not be understood.
    #[error("backend configuration: {0}")]
    Configuration(String),

    /// Any other backend-specific failure.
    #[error("{0}")]
    Backend(String),
}

/// Result alias for backend operations.
pub type HalResult<T> = Result<T, HalError>;

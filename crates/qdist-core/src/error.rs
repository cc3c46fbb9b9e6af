//! Error types for the estimator crate.

use qdist_hal::HalError;
use qdist_ir::IrError;
use thiserror::Error;

/// Errors produced while estimating a distance.
///
/// Nothing is partially returned: any failure aborts the whole estimate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EstimateError {
    /// The two input vectors have different lengths.
    #[error("Shape mismatch: left vector has {left} entries, right vector has {right}")]
    ShapeMismatch {
        /// Length of the first vector.
        left: usize,
        /// Length of the second vector.
        right: usize,
    },

    /// Inputs that cannot be encoded as quantum states (zero norm, Z = 0,
    /// non-finite entries).
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Vectors longer than the ψ register can hold.
    #[error("Vector length {len} exceeds the supported maximum of {max}")]
    DimensionTooLarge {
        /// Length of the input vectors.
        len: usize,
        /// Largest supported length.
        max: usize,
    },

    /// Invalid run parameters, such as a zero shot count.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The backend failed or rejected the circuit.
    #[error("Backend failure: {0}")]
    Backend(#[from] HalError),

    /// The backend returned counts that do not describe the requested shots.
    #[error("Backend failure: malformed counts: {0}")]
    MalformedCounts(String),

    /// Circuit construction failed.
    #[error("Circuit IR error: {0}")]
    Circuit(#[from] IrError),
}

impl EstimateError {
    /// True for errors attributable to the sampling backend.
    pub fn is_backend_failure(&self) -> bool {
        matches!(self, Self::Backend(_) | Self::MalformedCounts(_))
    }
}

/// Result type for estimation operations.
pub type EstimateResult<T> = Result<T, EstimateError>;

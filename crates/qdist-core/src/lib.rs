//! `qdist-core`: Euclidean distance estimation with a swap test.
//!
//! Two equal-length real vectors A and B are encoded as quantum states, a
//! 5-qubit swap-test circuit is sampled on a [`Backend`], and the ancilla
//! statistics are inverted back into an estimate of ‖A − B‖:
//!
//! 1. [`classical_distance`] computes ‖A − B‖ and Z = ‖A‖² + ‖B‖²
//! 2. [`prepare_states`] builds the amplitude vectors φ and ψ
//! 3. [`SwapTestEstimator`] builds the circuit, samples it and post-processes
//!    the counts
//!
//! # Quick start
//!
//! ```ignore
//! use qdist_adapter_sim::SimulatorBackend;
//! use qdist_core::estimate_distance;
//!
//! let backend = SimulatorBackend::new().with_seed(1);
//! let (classical, quantum) =
//!     estimate_distance(&[2.0, 9.0, 8.0, 5.0], &[7.0, 5.0, 10.0, 3.0], 50_000, &backend).await?;
//! println!("{classical:.4} vs {quantum:.4}");
//! ```
//!
//! [`Backend`]: qdist_hal::Backend

pub mod classical;
pub mod config;
pub mod error;
pub mod estimator;
pub mod state;

pub use classical::{ClassicalStats, classical_distance};
pub use config::{ConfigError, EstimatorConfig};
pub use error::{EstimateError, EstimateResult};
pub use estimator::{CIRCUIT_NAME, DistanceEstimate, SwapTestEstimator, SwapTestOutcome};
pub use state::{AmplitudeStates, MAX_VECTOR_LEN, prepare_states};

use qdist_hal::Backend;

/// Shots used when the caller does not choose.
pub const DEFAULT_SHOTS: u32 = 10_000;

/// Estimate ‖A − B‖ with a swap test sampled `shots` times on `backend`.
///
/// Returns `(classical, quantum)`: the exact distance and the swap-test
/// estimate. Input errors are reported before the backend is contacted.
pub async fn estimate_distance(
    a: &[f64],
    b: &[f64],
    shots: u32,
    backend: &dyn Backend,
) -> EstimateResult<(f64, f64)> {
    let estimate = SwapTestEstimator::new(shots).run(a, b, backend).await?;
    Ok((estimate.classical, estimate.quantum))
}

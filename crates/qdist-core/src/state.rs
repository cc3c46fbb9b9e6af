//! Amplitude encoding of the input vectors.
//!
//! φ lives on one qubit and carries the two norms; ψ lives on three qubits
//! and interleaves the normalized entries of A (even indices) and B (odd
//! indices). The swap test between φ and the lowest qubit of ψ then measures
//! ‖A − B‖² / (2Z).

use qdist_ir::NORM_TOLERANCE;
use serde::Serialize;

use crate::classical::{check_shape, l2_norm};
use crate::error::{EstimateError, EstimateResult};

/// Longest input vector the 3-qubit ψ register can encode.
pub const MAX_VECTOR_LEN: usize = 4;

/// Number of amplitudes in φ.
pub const PHI_LEN: usize = 2;

/// Number of amplitudes in ψ.
pub const PSI_LEN: usize = 2 * MAX_VECTOR_LEN;

/// The two prepared states.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmplitudeStates {
    /// `[‖A‖/√Z, −‖B‖/√Z]`.
    pub phi: [f64; PHI_LEN],
    /// Interleaved normalized A and B, scaled by 1/√2 and zero-padded.
    pub psi: [f64; PSI_LEN],
}

impl AmplitudeStates {
    /// Euclidean norm of φ.
    pub fn phi_norm(&self) -> f64 {
        l2_norm(&self.phi)
    }

    /// Euclidean norm of ψ.
    pub fn psi_norm(&self) -> f64 {
        l2_norm(&self.psi)
    }
}

/// Build φ and ψ from A, B and Z = ‖A‖² + ‖B‖².
///
/// The norms of A and B are recomputed here; only Z is taken from the
/// caller.
///
/// # Errors
///
/// - [`EstimateError::ShapeMismatch`] if the lengths differ
/// - [`EstimateError::DimensionTooLarge`] if the vectors are longer than
///   [`MAX_VECTOR_LEN`]
/// - [`EstimateError::DegenerateInput`] if Z, ‖A‖ or ‖B‖ is zero, if any
///   resulting amplitude is not finite, or if φ or ψ is not unit-norm
///   (an infinite Z, or a Z that does not match A and B)
pub fn prepare_states(a: &[f64], b: &[f64], z: f64) -> EstimateResult<AmplitudeStates> {
    check_shape(a, b)?;

    if a.len() > MAX_VECTOR_LEN {
        return Err(EstimateError::DimensionTooLarge {
            len: a.len(),
            max: MAX_VECTOR_LEN,
        });
    }

    if !(z > 0.0 && z.is_finite()) {
        return Err(EstimateError::DegenerateInput(format!(
            "normalization constant Z must be positive and finite, got {z}"
        )));
    }

    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 {
        return Err(EstimateError::DegenerateInput(
            "vector A has zero norm".into(),
        ));
    }
    if norm_b == 0.0 {
        return Err(EstimateError::DegenerateInput(
            "vector B has zero norm".into(),
        ));
    }

    let sqrt_z = z.sqrt();
    let phi = [norm_a / sqrt_z, -norm_b / sqrt_z];

    let mut psi = [0.0; PSI_LEN];
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        psi[2 * i] = x / norm_a;
        psi[2 * i + 1] = y / norm_b;
    }
    for amp in &mut psi {
        *amp *= std::f64::consts::FRAC_1_SQRT_2;
    }

    if phi.iter().chain(&psi).any(|v| !v.is_finite()) {
        return Err(EstimateError::DegenerateInput(
            "state amplitudes are not finite".into(),
        ));
    }
    check_unit_norm("φ", &phi)?;
    check_unit_norm("ψ", &psi)?;

    Ok(AmplitudeStates { phi, psi })
}

/// Same bound the circuit applies to `initialize` amplitudes.
fn check_unit_norm(name: &str, amplitudes: &[f64]) -> EstimateResult<()> {
    let norm_sq: f64 = amplitudes.iter().map(|v| v * v).sum();
    if (norm_sq - 1.0).abs() > NORM_TOLERANCE {
        return Err(EstimateError::DegenerateInput(format!(
            "{name} has squared norm {norm_sq}, expected 1"
        )));
    }
    Ok(())
}

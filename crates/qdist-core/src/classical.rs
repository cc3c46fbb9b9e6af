//! Exact classical distance and the normalization constant Z.

use serde::Serialize;

use crate::error::{EstimateError, EstimateResult};

/// Classical quantities derived from a pair of input vectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassicalStats {
    /// Euclidean distance ‖A − B‖.
    pub distance: f64,
    /// ‖A‖.
    pub norm_a: f64,
    /// ‖B‖.
    pub norm_b: f64,
    /// Z = ‖A‖² + ‖B‖². Infinite when it exceeds the `f64` range.
    pub z: f64,
}

/// Compute ‖A − B‖, ‖A‖, ‖B‖ and Z.
///
/// Fails with [`EstimateError::ShapeMismatch`] before any arithmetic when the
/// lengths differ. Empty vectors are accepted and yield all zeros.
pub fn classical_distance(a: &[f64], b: &[f64]) -> EstimateResult<ClassicalStats> {
    check_shape(a, b)?;
    check_finite("A", a)?;
    check_finite("B", b)?;

    let distance = scaled_norm(a.iter().zip(b).map(|(x, y)| x - y));
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);

    Ok(ClassicalStats {
        distance,
        norm_a,
        norm_b,
        z: norm_a * norm_a + norm_b * norm_b,
    })
}

pub(crate) fn l2_norm(v: &[f64]) -> f64 {
    scaled_norm(v.iter().copied())
}

/// Euclidean norm with every entry divided by the largest magnitude first,
/// so the squares neither overflow nor underflow.
fn scaled_norm<I>(values: I) -> f64
where
    I: Iterator<Item = f64> + Clone,
{
    let scale = values.clone().fold(0.0_f64, |m, x| m.max(x.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }
    let sum: f64 = values
        .map(|x| {
            let r = x / scale;
            r * r
        })
        .sum();
    scale * sum.sqrt()
}

pub(crate) fn check_shape(a: &[f64], b: &[f64]) -> EstimateResult<()> {
    if a.len() != b.len() {
        return Err(EstimateError::ShapeMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}

fn check_finite(name: &str, v: &[f64]) -> EstimateResult<()> {
    match v.iter().position(|x| !x.is_finite()) {
        Some(i) => Err(EstimateError::DegenerateInput(format!(
            "{name}[{i}] is not finite ({})",
            v[i]
        ))),
        None => Ok(()),
    }
}

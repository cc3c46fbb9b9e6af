//! Property-based tests for the classical stages.

use proptest::prelude::*;

use qdist_core::{EstimateError, MAX_VECTOR_LEN, classical_distance, prepare_states};

/// A pair of equal-length vectors with 1..=4 entries in a moderate range.
fn arb_pair() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (1..=MAX_VECTOR_LEN).prop_flat_map(|len| {
        (
            prop::collection::vec(-100.0..100.0_f64, len),
            prop::collection::vec(-100.0..100.0_f64, len),
        )
    })
}

proptest! {
    #[test]
    fn classical_distance_is_symmetric((a, b) in arb_pair()) {
        let ab = classical_distance(&a, &b).unwrap();
        let ba = classical_distance(&b, &a).unwrap();
        prop_assert!((ab.distance - ba.distance).abs() < 1e-9);
        prop_assert!((ab.z - ba.z).abs() < 1e-9);
    }

    #[test]
    fn classical_distance_satisfies_identity((a, b) in arb_pair()) {
        // ‖A − B‖² = Z − 2·A·B
        let stats = classical_distance(&a, &b).unwrap();
        let dot: f64 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
        let lhs = stats.distance * stats.distance;
        prop_assert!((lhs - (stats.z - 2.0 * dot)).abs() < 1e-6 * (1.0 + stats.z));
    }

    #[test]
    fn prepared_states_are_unit_vectors((a, b) in arb_pair()) {
        let stats = classical_distance(&a, &b).unwrap();
        prop_assume!(stats.norm_a > 1e-6 && stats.norm_b > 1e-6);

        let states = prepare_states(&a, &b, stats.z).unwrap();
        prop_assert!((states.phi_norm() - 1.0).abs() < 1e-9);
        prop_assert!((states.psi_norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn mismatched_lengths_always_fail(a in prop::collection::vec(-10.0..10.0_f64, 0..6),
                                      extra in 1usize..3) {
        let b = vec![1.0; a.len() + extra];
        let err = classical_distance(&a, &b).unwrap_err();
        prop_assert!(
            matches!(err, EstimateError::ShapeMismatch { .. }),
            "unexpected error: {err}"
        );
    }
}

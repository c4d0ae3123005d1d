// src/validation/mod.rs

//! Checks on `StateVector`s: normalization and comparison up to global phase.

use crate::core::{ShorError, StateVector};
use num_complex::Complex;
use num_traits::Zero;

const DEFAULT_NORM_TOLERANCE: f64 = 1e-9;

/// Checks that the squared amplitudes sum to 1.
///
/// # Arguments
/// * `state` - The `StateVector` to check.
/// * `tolerance` - Allowed deviation from 1.0; defaults to 1e-9.
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(ShorError::Incoherence)` otherwise.
pub fn check_normalization(state: &StateVector, tolerance: Option<f64>) -> Result<(), ShorError> {
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_NORM_TOLERANCE);
    let norm_sq: f64 = state.vector().iter().map(|c| c.norm_sqr()).sum();
    if (norm_sq - 1.0).abs() > effective_tolerance {
        Err(ShorError::Incoherence {
            message: format!("State vector normalization failed. Sum(|c_i|^2) = {} (Deviation > {})", norm_sq, effective_tolerance),
        })
    } else {
        Ok(())
    }
}

/// `<a|b>`, or `None` if the dimensions differ.
pub fn inner_product(a: &StateVector, b: &StateVector) -> Option<Complex<f64>> {
    if a.dim() != b.dim() {
        return None;
    }
    Some(a.vector().iter().zip(b.vector()).fold(Complex::zero(), |acc, (x, y)| acc + x.conj() * y))
}

/// `|<a|b>|^2`; 1.0 for normalized states equal up to global phase.
pub fn fidelity(a: &StateVector, b: &StateVector) -> Option<f64> {
    inner_product(a, b).map(|overlap| overlap.norm_sqr())
}

/// `true` when `a` and `b` differ at most by a global phase, within `tolerance`
/// on the fidelity.
pub fn equal_up_to_global_phase(a: &StateVector, b: &StateVector, tolerance: f64) -> bool {
    fidelity(a, b).is_some_and(|f| (f - 1.0).abs() <= tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn state(amps: &[(f64, f64)]) -> StateVector {
        StateVector::from_amplitudes(amps.iter().map(|(re, im)| Complex::new(*re, *im)).collect())
            .expect("power-of-two length")
    }

    #[test]
    fn normalized_state_passes() {
        let plus = state(&[(FRAC_1_SQRT_2, 0.0), (FRAC_1_SQRT_2, 0.0)]);
        assert!(check_normalization(&plus, None).is_ok());
    }

    #[test]
    fn unnormalized_state_fails() {
        let bad = state(&[(1.0, 0.0), (1.0, 0.0)]);
        assert!(matches!(check_normalization(&bad, None), Err(ShorError::Incoherence { .. })));
        assert!(check_normalization(&bad, Some(1.5)).is_ok());
    }

    #[test]
    fn global_phase_is_ignored() {
        let a = state(&[(FRAC_1_SQRT_2, 0.0), (0.0, FRAC_1_SQRT_2)]);
        // multiply by i
        let b = state(&[(0.0, FRAC_1_SQRT_2), (-FRAC_1_SQRT_2, 0.0)]);
        assert!(equal_up_to_global_phase(&a, &b, 1e-12));

        // relative phase is not
        let c = state(&[(FRAC_1_SQRT_2, 0.0), (0.0, -FRAC_1_SQRT_2)]);
        assert!(!equal_up_to_global_phase(&a, &c, 1e-6));
    }

    #[test]
    fn mismatched_dimensions() {
        let a = state(&[(1.0, 0.0), (0.0, 0.0)]);
        let b = state(&[(1.0, 0.0), (0.0, 0.0), (0.0, 0.0), (0.0, 0.0)]);
        assert_eq!(fidelity(&a, &b), None);
        assert!(!equal_up_to_global_phase(&a, &b, 1.0));
    }
}

// src/validation/mod.rs

//! Checks on [`StateVector`]s: normalization and equivalence up to global phase.

use crate::core::{RemoteOpsError, Result, StateVector};
use num_complex::Complex;
use num_traits::Zero;

const DEFAULT_NORM_TOLERANCE: f64 = 1e-9;
const DEFAULT_FIDELITY_TOLERANCE: f64 = 1e-9;

/// Checks if the state vector is normalized (sum of squared amplitudes ≈ 1.0).
///
/// # Returns
/// * `Ok(())` if normalized within tolerance (default `1e-9`).
/// * `Err(RemoteOpsError::Incoherence)` otherwise.
pub fn check_normalization(state: &StateVector, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_NORM_TOLERANCE);
    let norm_sq = state.norm_sqr();
    if (norm_sq - 1.0).abs() > effective_tolerance {
        Err(RemoteOpsError::Incoherence {
            message: format!(
                "State vector normalization failed. Sum(|c_i|^2) = {} (Deviation > {})",
                norm_sq, effective_tolerance
            ),
        })
    } else {
        Ok(())
    }
}

/// Inner product `<a|b>`.
///
/// # Errors
/// `InvalidOperation` if the dimensions differ.
pub fn inner_product(a: &StateVector, b: &StateVector) -> Result<Complex<f64>> {
    if a.dim() != b.dim() {
        return Err(RemoteOpsError::InvalidOperation {
            message: format!("Cannot compare states of dimension {} and {}", a.dim(), b.dim()),
        });
    }
    Ok(a.vector()
        .iter()
        .zip(b.vector())
        .fold(Complex::zero(), |acc, (x, y)| acc + x.conj() * y))
}

/// Fidelity `|<a|b>|^2` of two pure states; insensitive to global phase.
pub fn fidelity(a: &StateVector, b: &StateVector) -> Result<f64> {
    Ok(inner_product(a, b)?.norm_sqr())
}

/// `true` if both states are normalized and equal up to a global phase.
pub fn states_equivalent(a: &StateVector, b: &StateVector, tolerance: Option<f64>) -> Result<bool> {
    let tol = tolerance.unwrap_or(DEFAULT_FIDELITY_TOLERANCE);
    check_normalization(a, Some(tol))?;
    check_normalization(b, Some(tol))?;
    Ok((1.0 - fidelity(a, b)?).abs() <= tol)
}

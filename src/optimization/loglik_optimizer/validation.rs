//! Input and output checks for the likelihood optimizer.
//!
//! Everything the optimizer accepts from callers or hands back to them
//! passes through one of these helpers:
//!
//! - **Tolerances**: [`verify_tol_grad`] and [`verify_tol_cost`] reject
//!   non-finite or non-positive stopping thresholds.
//! - **Gradients**: [`validate_grad`] pins the length to the free-parameter
//!   count and rejects NaN or infinite entries.
//! - **Estimates**: [`validate_theta_hat`] unwraps the solver's best point,
//!   refusing an absent or non-finite one.
//! - **Objective values**: [`validate_value`] rejects NaN or infinite
//!   log-likelihoods before they reach the solver.
//!
//! Each failure maps to a dedicated [`OptError`] variant carrying the
//! offending index and value, so a bad fit reports exactly where the
//! likelihood surface went wrong rather than a generic solver failure.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta, types::Hessian},
};

/// Check an optional gradient-norm stopping threshold.
///
/// `None` disables the gradient stopping rule. A provided value has to be
/// finite and strictly positive.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] for NaN, infinite, zero, or
/// negative values.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Check an optional cost-change stopping threshold.
///
/// `None` disables the cost stopping rule. A provided value has to be
/// finite and strictly positive.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] for NaN, infinite, zero, or
/// negative values.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Check a gradient vector for the expected length and finite entries.
///
/// `dim` is the number of free parameters; a gradient of any other length
/// cannot belong to the current fit.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] when the length differs from `dim`.
/// - [`OptError::InvalidGradient`] naming the first non-finite element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Unwrap the solver's final parameter estimate.
///
/// The solver reports `Option<Theta>`; a run that never produced a best
/// point yields `None`, and a diverged run can leave NaN entries behind.
/// Both are turned into errors here so downstream code always holds a
/// usable estimate.
///
/// # Returns
/// The owned `Theta` when present and fully finite.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] when the solver produced no estimate.
/// - [`OptError::InvalidThetaHat`] naming the first non-finite element.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Check that a scalar log-likelihood is finite.
///
/// Arbitrarily negative values pass; only NaN and infinities are refused.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] for NaN or infinite input.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

/// Check a Hessian matrix for the expected shape and finite entries.
///
/// # Checks
/// 1. Both dimensions equal `dim`.
/// 2. No entry is NaN or infinite.
///
/// # Arguments
/// - `hessian`: matrix to inspect.
/// - `dim`: expected row and column count.
///
/// # Returns
/// - `Ok(())` when both checks pass.
///
/// # Errors
/// - [`OptError::HessianDimMismatch`] when the shape is not `dim × dim`.
/// - [`OptError::InvalidHessian`] naming the first non-finite entry by
///   row and column.
pub fn validate_hessian(hessian: &Hessian, dim: usize) -> OptResult<()> {
    if hessian.nrows() != dim || hessian.ncols() != dim {
        return Err(OptError::HessianDimMismatch {
            expected: dim,
            found: (hessian.nrows(), hessian.ncols()),
        });
    }
    for ((i, j), &value) in hessian.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidHessian { row: i, col: j, value });
        }
    }
    Ok(())
}

//! loglik_optimizer::finite_diff — numerical derivatives for the optimizer.
//!
//! Purpose
//! -------
//! Supply finite-difference gradients and Hessians around a parameter
//! vector, with error capture and validation folded in, so the adapter
//! and the standard-error machinery never talk to the `finitediff` crate
//! directly.
//!
//! Key behaviors
//! -------------
//! - [`run_fd_diff`] takes a forward-difference gradient of a scalar
//!   objective, surfacing any error the objective raised mid-sweep and
//!   validating the result before returning it.
//! - [`compute_hessian`] differentiates a gradient function into a dense
//!   Hessian, trying central differences first and falling back to
//!   forward differences when the central result fails validation.
//! - [`symmetrize_hess`] averages off-diagonal pairs in place so the
//!   returned Hessian is numerically symmetric before any factorization.
//!
//! Invariants & assumptions
//! ------------------------
//! - All inputs and outputs are `ndarray` containers of `f64` (`Theta`,
//!   `Grad`, `Hessian`).
//! - Objectives evaluated inside a finite-difference sweep cannot return
//!   `Result`; they write failures into a shared `closure_err` cell and
//!   return NaN, and this module turns a populated cell into a hard
//!   error.
//! - A gradient or Hessian that leaves this module has passed
//!   [`validate_grad`] or [`validate_hessian`] for its chosen scheme.
//!
//! Conventions
//! -----------
//! - Differences are taken in the raw free-parameter coordinates; any
//!   reparameterization happens in the layers above.
//! - Central differencing is the preferred Hessian scheme; the forward
//!   fallback exists for objectives that misbehave half a step away from
//!   the expansion point.
//! - Failures surface as [`OptError`] through `OptResult<T>`; Argmin's
//!   [`Error`] appears only inside the closure-capture cell.
//!
//! Downstream usage
//! ----------------
//! - The Argmin adapter calls [`run_fd_diff`] whenever a model supplies
//!   no analytic gradient, which is the normal case for the BAO
//!   correlation likelihood.
//! - Standard-error computation calls [`compute_hessian`] at the fitted
//!   point to build the observed-information matrix.
//! - Python bindings never reach this module directly.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the success paths, the closure-error path, and the
//!   validation failures for both gradients and Hessians, plus the
//!   central-to-forward fallback.
//! - The full-fit integration tests exercise these helpers on the real
//!   correlation likelihood.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// run_fd_diff — forward-difference gradient with error capture.
///
/// Purpose
/// -------
/// Approximate the gradient of a scalar objective at `theta` by forward
/// differences, while watching a shared error cell for failures raised
/// inside the objective and checking the finished gradient for shape and
/// finiteness.
///
/// Parameters
/// ----------
/// - `theta`: `&Theta`
///   Expansion point. Its length fixes the gradient dimension.
/// - `func`: `&G`
///   Scalar objective evaluated repeatedly during the sweep. By
///   convention it stores any internal failure in `closure_err` and
///   returns NaN for that evaluation.
/// - `closure_err`: `&RefCell<Option<Error>>`
///   Shared cell for failures raised inside `func`. Cleared on entry and
///   inspected once the sweep finishes.
///
/// Returns
/// -------
/// `OptResult<Grad>`
///   - `Ok(grad)` when the sweep ran without a captured error and the
///     gradient passes [`validate_grad`].
///   - `Err(e)` when `func` signaled a failure or validation rejected
///     the result.
///
/// Errors
/// ------
/// - `OptError` (through `impl From<Error> for OptError`)
///   When `closure_err` holds an Argmin error captured during the sweep.
/// - `OptError::GradientDimMismatch`
///   When the finished gradient is not `theta.len()` long.
/// - `OptError::InvalidGradient`
///   When any gradient element is NaN or infinite.
///
/// Panics
/// ------
/// - Never panics.
///
/// Safety
/// ------
/// - No `unsafe` code is used.
///
/// Notes
/// -----
/// - The cell is cleared before the sweep, so a stale error from an
///   earlier evaluation cannot fail the current one.
/// - An empty cell after the sweep means every evaluation succeeded;
///   the NaN-on-error convention then cannot produce a silently wrong
///   gradient because validation rejects the NaN.
///
/// Examples
/// --------
/// ```rust
/// # use std::cell::RefCell;
/// # use argmin::core::Error;
/// # use ndarray::Array1;
/// # use rust_cosmology::optimization::loglik_optimizer::{
/// #     Theta,
/// # };
/// # use rust_cosmology::optimization::loglik_optimizer::finite_diff::run_fd_diff;
/// let theta: Theta = Array1::from(vec![1.0_f64, 1.8]);
/// let closure_err: RefCell<Option<Error>> = RefCell::new(None);
///
/// // Concave toy likelihood with a peak at (1, 2).
/// let f = |x: &Theta| -(x[0] - 1.0).powi(2) - 0.5 * (x[1] - 2.0).powi(2);
///
/// let grad = run_fd_diff(&theta, &f, &closure_err).unwrap();
/// assert_eq!(grad.len(), theta.len());
/// ```
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    let dim = theta.len();
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}

/// compute_hessian — finite-difference Hessian with a fallback scheme.
///
/// Purpose
/// -------
/// Differentiate a gradient function at `theta` into a dense Hessian.
/// Central differences are tried first; if that matrix fails validation,
/// a forward-difference matrix is built instead. Whichever matrix passes
/// is symmetrized in place before being returned.
///
/// Parameters
/// ----------
/// - `f`: `&F`
///   Gradient function mapping a parameter vector to `Grad`. Each of its
///   components is differenced numerically.
/// - `theta`: `&Theta`
///   Expansion point. Its length fixes the Hessian side `dim`.
///
/// Returns
/// -------
/// `OptResult<Hessian>`
///   - `Ok(h)` holding a symmetric `dim × dim` matrix of finite entries.
///   - `Err(e)` when both difference schemes produce an invalid matrix.
///
/// Errors
/// ------
/// - `OptError::HessianDimMismatch`
///   When the fallback matrix is not `dim × dim`.
/// - `OptError::InvalidHessian`
///   When the fallback matrix holds a NaN or infinite entry.
///
/// Panics
/// ------
/// - Never panics.
///
/// Safety
/// ------
/// - No `unsafe` code is used.
///
/// Notes
/// -----
/// - The central-scheme validation error is dropped, not chained; the
///   caller only ever sees the forward-scheme diagnostic, which keeps
///   the two-stage strategy out of the error surface.
/// - Symmetrization runs after validation so an `InvalidHessian` error
///   reports the raw offending entry, not an averaged one.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::Array1;
/// # use rust_cosmology::optimization::loglik_optimizer::{
/// #     Theta,
/// # };
/// # use rust_cosmology::optimization::loglik_optimizer::finite_diff::compute_hessian;
/// // Gradient of f(θ) = -||θ||², so the Hessian is -2·I.
/// let grad_fn = |theta: &Theta| theta.mapv(|x| -2.0 * x);
///
/// let theta: Theta = Array1::from(vec![0.3_f64, 5.0]);
/// let hess = compute_hessian(&grad_fn, &theta).unwrap();
/// assert_eq!(hess.shape(), &[2, 2]);
/// ```
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut cent_hess = theta.central_hessian(f);
    match validate_hessian(&cent_hess, dim) {
        Ok(_) => {
            symmetrize_hess(&mut cent_hess);
            Ok(cent_hess)
        }
        Err(_) => {
            let mut forward_hess = theta.forward_hessian(f);
            validate_hessian(&forward_hess, dim)?;
            symmetrize_hess(&mut forward_hess);
            Ok(forward_hess)
        }
    }
}

// ---- Helper methods ----

/// symmetrize_hess — average off-diagonal pairs in place.
///
/// Purpose
/// -------
/// Replace each pair `(i, j)` / `(j, i)` with its mean so the matrix is
/// exactly symmetric, leaving the diagonal alone.
///
/// Parameters
/// ----------
/// - `hess`: `&mut Hessian`
///   Square matrix to symmetrize. Shape is not rechecked here; callers
///   pass matrices that already passed [`validate_hessian`].
///
/// Returns
/// -------
/// `()`
///   The matrix is mutated in place; nothing is allocated.
///
/// Errors
/// ------
/// - Never returns an error.
///
/// Panics
/// ------
/// - Never panics for a well-formed `ndarray::Array2`.
///
/// Safety
/// ------
/// - No `unsafe` code is used.
///
/// Notes
/// -----
/// - Only the strict lower triangle is walked; each pair is written
///   once from both sides.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::Array2;
/// # use rust_cosmology::optimization::loglik_optimizer::types::Hessian;
/// # use rust_cosmology::optimization::loglik_optimizer::finite_diff::symmetrize_hess;
/// let mut h: Hessian = Array2::from_shape_vec(
///     (2, 2),
///     vec![4.0_f64, 1.2,
///          0.8,     9.0],
/// ).unwrap();
///
/// symmetrize_hess(&mut h);
/// assert_eq!(h[[0, 1]], h[[1, 0]]);
/// ```
pub fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}

//! inference::hessian — standard errors from the observed information.
//!
//! Purpose
//! -------
//! Turn a finite-difference Hessian at the maximum-likelihood point into
//! per-parameter standard errors. The module owns the crossing from
//! `ndarray` (optimizer side) into `nalgebra` (eigendecomposition side)
//! and the eigenvalue truncation that keeps near-singular information
//! matrices from blowing up the reported uncertainties.
//!
//! Key behaviors
//! -------------
//! - Build the observed information `J(θ̂)` by calling
//!   [`compute_hessian`] on a gradient map of the negative
//!   log-likelihood.
//! - Copy the `ndarray` matrix into a `nalgebra::DMatrix`
//!   (`fill_dmatrix`) for the symmetric eigendecomposition.
//! - Form the Moore–Penrose pseudoinverse diagonal by eigenvalue
//!   truncation and return its square roots as standard errors.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`compute_hessian`] hands back a finite, square, already
//!   symmetrized `n×n` matrix with `n = θ̂.len()`; nothing here
//!   re-symmetrizes.
//! - [`solve_for_se`] treats its input as symmetric, which
//!   `symmetric_eigen` requires.
//! - Eigenvalues at or below [`EIGEN_EPS`] count as numerically zero and
//!   contribute no pseudoinverse direction.
//!
//! Conventions
//! -----------
//! - The gradient map is for the negative log-likelihood, so the
//!   curvature at a well-behaved maximum of `ℓ` is positive and `J(θ̂)`
//!   has non-negative spectrum.
//! - Only the SE vector is exposed; the full covariance stays internal.
//! - No explicit matrix inverse anywhere; everything goes through the
//!   eigendecomposition with truncation.
//! - Failures travel as [`OptResult<T>`].
//!
//! Downstream usage
//! ----------------
//! - `BaoCorrelationModel::standard_errors` calls
//!   [`calc_standard_errors`] after a fit, handing it a
//!   finite-difference gradient closure over its own likelihood.
//! - [`fill_dmatrix`] and [`solve_for_se`] are internal helpers; nothing
//!   outside this module needs them.
//!
//! Testing notes
//! -------------
//! - Unit tests here cover the `ndarray`-to-`DMatrix` copy, agreement
//!   with analytic SEs for diagonal quadratics, and the truncation of
//!   null directions in singular information matrices.
//! - The integration suite checks that SEs from a real correlation-model
//!   fit are finite and positive.
use crate::optimization::{
    errors::OptResult, loglik_optimizer::finite_diff::compute_hessian,
    numerical_stability::transformations::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::Array1;

/// calc_standard_errors — classical SEs at the fitted point.
///
/// Purpose
/// -------
/// Evaluate the observed information `J(θ̂)` by finite differences of the
/// supplied gradient map, then read standard errors off the diagonal of
/// its eigen-based pseudoinverse.
///
/// Parameters
/// ----------
/// - `f`: `&F`
///   Gradient map of the negative log-likelihood, `f: θ ↦ -∇ℓ(θ)`.
///   It needs to be C¹ near `theta_hat` for [`compute_hessian`] to
///   succeed; a finite-difference gradient is fine, since the Hessian
///   routine validates and symmetrizes what it builds.
/// - `theta_hat`: `&Array1<f64>`
///   Fitted parameter vector `θ̂`. Its length `n` fixes both the Hessian
///   side and the length of the returned SE vector.
///
/// Returns
/// -------
/// `OptResult<Array1<f64>>`
///   A length-`n` vector of standard errors on success; otherwise the
///   error [`compute_hessian`] reported (shape mismatch, non-finite
///   entries).
///
/// Errors
/// ------
/// - `OptError`
///   Whatever [`compute_hessian`] surfaces while building and validating
///   the Hessian.
///
/// Panics
/// ------
/// - Never panics under the documented invariants.
///
/// Safety
/// ------
/// - No `unsafe` code is used.
///
/// Notes
/// -----
/// - Directions whose eigenvalue is at most [`EIGEN_EPS`] are dropped,
///   so a flat likelihood direction reports zero variance instead of an
///   arbitrarily large one.
/// - SEs come back in the same coordinates as `theta_hat`. A model that
///   fits in a transformed space interprets them there.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_cosmology::inference::hessian::calc_standard_errors;
/// # use rust_cosmology::optimization::errors::OptResult;
/// #
/// // Linear gradient map g(θ) = A θ with A positive definite.
/// let a = array![[4.0, 0.0],
///                [0.0, 1.0]];
/// let f = |theta: &ndarray::Array1<f64>| -> ndarray::Array1<f64> {
///     a.dot(theta)
/// };
/// let theta_hat = array![1.0, -1.0];
///
/// let se: OptResult<ndarray::Array1<f64>> = calc_standard_errors(&f, &theta_hat);
/// assert!(se.is_ok());
/// let se = se.unwrap();
/// assert_eq!(se.len(), 2);
/// // Diagonal information gives SEs 1/sqrt(4) and 1/sqrt(1).
/// assert!((se[0] - 0.5).abs() < 1e-6);
/// assert!((se[1] - 1.0).abs() < 1e-6);
/// ```
pub fn calc_standard_errors<F: Fn(&Array1<f64>) -> Array1<f64>>(
    f: &F, theta_hat: &Array1<f64>,
) -> OptResult<Array1<f64>> {
    let n = theta_hat.len();
    let obs_info = compute_hessian(f, theta_hat)?;
    let mut obs_info_nalg = DMatrix::<f64>::zeros(obs_info.nrows(), obs_info.ncols());
    fill_dmatrix(&obs_info, &mut obs_info_nalg);
    Ok(solve_for_se(obs_info_nalg, n))
}

// ---- Helper methods ----

/// fill_dmatrix — copy an information matrix into `nalgebra` storage.
///
/// Purpose
/// -------
/// Move a square `ndarray` matrix into a preallocated `DMatrix<f64>`,
/// writing column by column. Symmetry is taken as given; the input has
/// been symmetrized upstream by [`compute_hessian`].
///
/// Parameters
/// ----------
/// - `obs_info`: `&ndarray::Array2<f64>`
///   Square `n×n` observed information in `ndarray` form, symmetric up
///   to rounding.
/// - `obs_info_nalg`: `&mut DMatrix<f64>`
///   Destination of the same shape.
///
/// Panics
/// ------
/// - Out-of-bounds indexing can panic when the two shapes disagree.
///
/// Notes
/// -----
/// - The column-by-column walk matches `DMatrix`'s column-major storage.
fn fill_dmatrix(obs_info: &ndarray::Array2<f64>, obs_info_nalg: &mut DMatrix<f64>) {
    let n = obs_info.ncols();
    for j in 0..n {
        for i in j..n {
            if j == i {
                obs_info_nalg[(i, i)] = obs_info[[i, i]];
            } else {
                obs_info_nalg[(i, j)] = obs_info[[i, j]];
                obs_info_nalg[(j, i)] = obs_info[[j, i]];
            }
        }
    }
}

/// solve_for_se — pseudoinverse diagonal by eigenvalue truncation.
///
/// Purpose
/// -------
/// Decompose a symmetric observed information matrix and return the
/// square roots of the diagonal of its Moore–Penrose pseudoinverse,
/// dropping eigenvalues below the floor.
///
/// Parameters
/// ----------
/// - `obs_info_nalg`: `DMatrix<f64>`
///   Symmetric `n×n` information matrix, consumed by the decomposition.
/// - `n`: `usize`
///   Parameter dimension; must match the matrix side.
///
/// Returns
/// -------
/// `Array1<f64>`
///   Length-`n` vector of standard errors `SE(θ̂_i)`.
///
/// Panics
/// ------
/// - A non-square matrix or an `n` mismatch can panic through indexing;
///   both are programmer errors.
///
/// Notes
/// -----
/// - With the eigendecomposition `J = Q Λ Qᵀ`, the variance is
///   `Var(θ̂_i) = Σ_{k: λ_k > EIGEN_EPS} Q[i,k]² / λ_k` and the return
///   value is its square root per parameter.
/// - Dropped eigenvalues simply contribute nothing to the sum.
fn solve_for_se(obs_info_nalg: DMatrix<f64>, n: usize) -> Array1<f64> {
    let eigen_decomp = obs_info_nalg.symmetric_eigen();
    let mut se = Array1::<f64>::zeros(n);
    let q = eigen_decomp.eigenvectors;
    let eigenvals = eigen_decomp.eigenvalues;
    for i in 0..n {
        se[i] = eigenvals
            .iter()
            .enumerate()
            .filter(|(_, lambda)| **lambda > EIGEN_EPS)
            .map(|(k, &lambda)| q[(i, k)] * q[(i, k)] / lambda)
            .sum();
        se[i] = se[i].sqrt();
    }
    se
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The ndarray-to-DMatrix copy.
    // - Classical SEs against analytic values for diagonal quadratics.
    // - Truncation of null directions in singular information matrices.
    //
    // They intentionally DO NOT cover:
    // - Full correlation-model inference (the pipeline integration tests
    //   own that).
    // - Failure paths inside `compute_hessian` itself.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The copy into `DMatrix` must reproduce every entry, off-diagonals
    // included.
    //
    // Given
    // -----
    // - A symmetric 2×2 `Array2<f64>` with distinct entries.
    //
    // Expect
    // ------
    // - The `DMatrix` matches entry for entry.
    fn fill_dmatrix_copies_ndarray_into_dmatrix_without_modification() {
        // Arrange
        let obs_info: Array2<f64> = array![[2.0, 0.5], [0.5, 1.0]];
        let mut obs_info_nalg = DMatrix::<f64>::zeros(2, 2);

        // Act
        fill_dmatrix(&obs_info, &mut obs_info_nalg);

        // Assert
        assert_eq!(obs_info_nalg[(0, 0)], 2.0);
        assert_eq!(obs_info_nalg[(0, 1)], 0.5);
        assert_eq!(obs_info_nalg[(1, 0)], 0.5);
        assert_eq!(obs_info_nalg[(1, 1)], 1.0);
    }

    #[test]
    // Purpose
    // -------
    // For a constant diagonal information matrix the SEs must match the
    // analytic pseudoinverse diagonal.
    //
    // Given
    // -----
    // - A = diag(4, 1) encoded as the linear gradient map g(θ) = A θ.
    // - Any θ̂; the Hessian of a linear map does not depend on it.
    //
    // Expect
    // ------
    // - SEs close to [1/sqrt(4), 1/sqrt(1)] = [0.5, 1.0].
    fn calc_standard_errors_diagonal_quadratic_matches_analytic_se() {
        // Arrange
        let a = array![[4.0, 0.0], [0.0, 1.0]];
        let f = |theta: &Array1<f64>| -> Array1<f64> { a.dot(theta) };
        let theta_hat = array![1.0, -1.0];

        // Act
        let se_res = calc_standard_errors(&f, &theta_hat);

        // Assert
        assert!(se_res.is_ok());
        let se = se_res.unwrap();
        assert_eq!(se.len(), 2);
        assert!((se[0] - 0.5).abs() < 1e-6);
        assert!((se[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // A singular information matrix must have its null direction dropped
    // instead of yielding infinite or NaN standard errors.
    //
    // Given
    // -----
    // - diag(4, 0) passed straight to `solve_for_se`, putting the second
    //   eigenvalue below the floor.
    //
    // Expect
    // ------
    // - The identified direction reports SE = 0.5.
    // - The null direction reports SE = 0.0 and stays finite.
    fn solve_for_se_truncates_null_directions_of_singular_information() {
        // Arrange
        let mut singular = DMatrix::<f64>::zeros(2, 2);
        singular[(0, 0)] = 4.0;

        // Act
        let se = solve_for_se(singular, 2);

        // Assert
        assert!((se[0] - 0.5).abs() < 1e-12);
        assert_eq!(se[1], 0.0);
        assert!(se.iter().all(|v| v.is_finite()));
    }
}

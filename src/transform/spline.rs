//! Natural cubic spline over a tabulated function.
//!
//! Fits second derivatives at the knots by solving the standard tridiagonal
//! system with the Thomas algorithm; natural boundary conditions pin the
//! curvature to zero at both ends. Evaluation outside the tabulated range
//! returns 0, matching a power spectrum that vanishes beyond its sampled
//! support. The system's diagonal dominance (2(hᵢ₋₁+hᵢ) against hᵢ₋₁ and
//! hᵢ) guarantees the sweep never divides by zero once the knots are
//! validated as strictly ascending.
use crate::transform::errors::{TransformError, TransformResult};
use ndarray::{Array1, ArrayView1};

/// A fitted natural cubic spline.
///
/// Stores the knots and the second derivatives solved for at fit time;
/// evaluation is a binary search plus the usual two-term cubic blend.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Array1<f64>,
    ys: Array1<f64>,
    second_derivs: Array1<f64>,
}

impl CubicSpline {
    /// Fit a natural cubic spline through `(xs, ys)`.
    ///
    /// Requires at least 3 strictly ascending, finite knots and matching
    /// array lengths.
    ///
    /// Errors
    /// ------
    /// - `TransformError::LengthMismatch` if `xs` and `ys` disagree.
    /// - `TransformError::InsufficientPoints` below 3 knots.
    /// - `TransformError::NonFiniteInput` on NaN/±inf entries.
    /// - `TransformError::NotAscending` if `xs` is not strictly ascending.
    pub fn fit(xs: ArrayView1<f64>, ys: ArrayView1<f64>) -> TransformResult<CubicSpline> {
        if xs.len() != ys.len() {
            return Err(TransformError::LengthMismatch { expected: xs.len(), actual: ys.len() });
        }
        if xs.len() < 3 {
            return Err(TransformError::InsufficientPoints { needed: 3, actual: xs.len() });
        }
        for (index, &value) in xs.iter().enumerate() {
            if !value.is_finite() {
                return Err(TransformError::NonFiniteInput { name: "xs", index, value });
            }
        }
        for (index, &value) in ys.iter().enumerate() {
            if !value.is_finite() {
                return Err(TransformError::NonFiniteInput { name: "ys", index, value });
            }
        }
        for index in 1..xs.len() {
            if xs[index] <= xs[index - 1] {
                return Err(TransformError::NotAscending { name: "xs", index });
            }
        }
        let second_derivs = solve_second_derivs(&xs, &ys);
        Ok(CubicSpline { xs: xs.to_owned(), ys: ys.to_owned(), second_derivs })
    }

    /// Evaluate the spline at `x`.
    ///
    /// Returns 0 outside the tabulated range.
    pub fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        if !(self.xs[0]..=self.xs[n - 1]).contains(&x) {
            return 0.0;
        }
        // Locate the segment [xs[j], xs[j+1]] containing x.
        let mut lo = 0;
        let mut hi = n - 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if self.xs[mid] > x {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        let h = self.xs[hi] - self.xs[lo];
        let a = (self.xs[hi] - x) / h;
        let b = (x - self.xs[lo]) / h;
        a * self.ys[lo]
            + b * self.ys[hi]
            + ((a.powi(3) - a) * self.second_derivs[lo]
                + (b.powi(3) - b) * self.second_derivs[hi])
                * h
                * h
                / 6.0
    }

    /// First tabulated x value.
    pub fn x_min(&self) -> f64 {
        self.xs[0]
    }

    /// Last tabulated x value.
    pub fn x_max(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

/// Solve the natural-spline tridiagonal system for the knot second
/// derivatives via the Thomas algorithm.
fn solve_second_derivs(xs: &ArrayView1<f64>, ys: &ArrayView1<f64>) -> Array1<f64> {
    let n = xs.len();
    let mut second_derivs = Array1::zeros(n);
    let interior = n - 2;
    if interior == 0 {
        return second_derivs;
    }

    // Row i of the system pins the second derivative at knot i + 1:
    //   h_i·m_i + 2(h_i + h_{i+1})·m_{i+1} + h_{i+1}·m_{i+2}
    //     = 6·[(Δy/h)_{i+1} − (Δy/h)_i]
    let mut sweep_upper = Array1::zeros(interior);
    let mut sweep_rhs = Array1::zeros(interior);
    for i in 0..interior {
        let h_lo = xs[i + 1] - xs[i];
        let h_hi = xs[i + 2] - xs[i + 1];
        let diag = 2.0 * (h_lo + h_hi);
        let rhs = 6.0 * ((ys[i + 2] - ys[i + 1]) / h_hi - (ys[i + 1] - ys[i]) / h_lo);
        if i == 0 {
            sweep_upper[i] = h_hi / diag;
            sweep_rhs[i] = rhs / diag;
        } else {
            let denom = diag - h_lo * sweep_upper[i - 1];
            sweep_upper[i] = h_hi / denom;
            sweep_rhs[i] = (rhs - h_lo * sweep_rhs[i - 1]) / denom;
        }
    }
    second_derivs[interior] = sweep_rhs[interior - 1];
    for i in (0..interior - 1).rev() {
        second_derivs[i + 1] = sweep_rhs[i] - sweep_upper[i] * second_derivs[i + 2];
    }
    second_derivs
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Interpolation exactness at knots and for linear data.
    // - Approximation accuracy on a smooth function with vanishing end
    //   curvature (where natural boundary conditions are exact).
    // - The zero return outside the tabulated range.
    // - Input validation in `fit`.
    //
    // They intentionally DO NOT cover:
    // - Use of the spline inside the Hankel-transform strategy (covered by
    //   the strategy tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The spline passes through every knot exactly.
    //
    // Given
    // -----
    // - Five knots of a cubic-ish shape.
    //
    // Expect
    // ------
    // - eval(x_i) == y_i at each knot.
    fn eval_reproduces_knots() {
        // Arrange
        let xs = Array1::from(vec![0.0, 1.0, 2.5, 3.0, 4.0]);
        let ys = Array1::from(vec![1.0, 2.0, 0.5, -1.0, 3.0]);

        // Act
        let spline = CubicSpline::fit(xs.view(), ys.view()).unwrap();

        // Assert
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert_approx_eq!(spline.eval(*x), *y, 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Linear data is reproduced exactly between knots: the tridiagonal
    // right-hand side vanishes, so all second derivatives are zero.
    //
    // Given
    // -----
    // - Knots on the line y = 2x − 1.
    //
    // Expect
    // ------
    // - Off-knot evaluations match the line to round-off.
    fn eval_is_exact_for_linear_data() {
        // Arrange
        let xs = Array1::from(vec![0.0, 0.7, 1.5, 2.2, 3.0]);
        let ys = xs.mapv(|x| 2.0 * x - 1.0);
        let spline = CubicSpline::fit(xs.view(), ys.view()).unwrap();

        // Act & Assert
        for &x in [0.3, 1.0, 1.9, 2.6].iter() {
            assert_approx_eq!(spline.eval(x), 2.0 * x - 1.0, 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // On sin(x) over [0, π] the natural boundary conditions are exact
    // (sin'' vanishes at both ends), so the spline converges at the
    // standard rate.
    //
    // Given
    // -----
    // - 21 equally spaced knots of sin(x) on [0, π].
    //
    // Expect
    // ------
    // - Mid-segment errors below 1e-4.
    fn eval_approximates_smooth_function() {
        // Arrange
        let n = 21;
        let xs = Array1::linspace(0.0, std::f64::consts::PI, n);
        let ys = xs.mapv(f64::sin);
        let spline = CubicSpline::fit(xs.view(), ys.view()).unwrap();

        // Act & Assert
        for i in 0..n - 1 {
            let mid = 0.5 * (xs[i] + xs[i + 1]);
            assert_approx_eq!(spline.eval(mid), mid.sin(), 1e-4);
        }
    }

    #[test]
    // Purpose
    // -------
    // Evaluation outside the tabulated range returns 0 on both sides.
    //
    // Given
    // -----
    // - A spline over [0, 4] with nonzero values everywhere.
    //
    // Expect
    // ------
    // - eval(-0.1) == 0 and eval(4.1) == 0, while the endpoints themselves
    //   still evaluate to their knot values.
    fn eval_returns_zero_outside_range() {
        // Arrange
        let xs = Array1::from(vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        let ys = Array1::from(vec![5.0, 4.0, 3.0, 2.0, 1.0]);
        let spline = CubicSpline::fit(xs.view(), ys.view()).unwrap();

        // Act & Assert
        assert_eq!(spline.eval(-0.1), 0.0);
        assert_eq!(spline.eval(4.1), 0.0);
        assert_approx_eq!(spline.eval(0.0), 5.0, 1e-12);
        assert_approx_eq!(spline.eval(4.0), 1.0, 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // `fit` rejects malformed inputs with the documented errors.
    //
    // Given
    // -----
    // - Mismatched lengths, too few points, a NaN entry, and a
    //   non-ascending grid.
    //
    // Expect
    // ------
    // - LengthMismatch, InsufficientPoints, NonFiniteInput, and
    //   NotAscending respectively.
    fn fit_rejects_malformed_inputs() {
        // Arrange
        let xs3 = Array1::from(vec![0.0, 1.0, 2.0]);
        let ys2 = Array1::from(vec![1.0, 2.0]);
        let xs2 = Array1::from(vec![0.0, 1.0]);
        let ys_nan = Array1::from(vec![1.0, f64::NAN, 2.0]);
        let xs_bad = Array1::from(vec![0.0, 2.0, 1.0]);
        let ys3 = Array1::from(vec![1.0, 2.0, 3.0]);

        // Act & Assert
        assert!(matches!(
            CubicSpline::fit(xs3.view(), ys2.view()),
            Err(TransformError::LengthMismatch { expected: 3, actual: 2 })
        ));
        assert!(matches!(
            CubicSpline::fit(xs2.view(), ys2.view()),
            Err(TransformError::InsufficientPoints { needed: 3, actual: 2 })
        ));
        assert!(matches!(
            CubicSpline::fit(xs3.view(), ys_nan.view()),
            Err(TransformError::NonFiniteInput { name: "ys", index: 1, .. })
        ));
        assert!(matches!(
            CubicSpline::fit(xs_bad.view(), ys3.view()),
            Err(TransformError::NotAscending { name: "xs", index: 2 })
        ));
    }
}

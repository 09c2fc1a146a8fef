//! Numerical stability utilities.
//!
//! Provides safe implementations of common nonlinear transforms
//! that are prone to overflow/underflow in naïve form.
//! The functions here follow guarded strategies similar to those
//! in major ML libraries (e.g. PyTorch, TensorFlow), branching on the
//! sign or clamping the argument to keep `f64` arithmetic in a
//! well-conditioned regime.
//!
//! # Provided items
//! - [`LOGIT_EPS`]: a small ε buffer (default 1e-12).
//!   Used to clamp logit inputs strictly inside `(0, 1)`.
//! - [`EIGEN_EPS`]: eigenvalue floor (default 1e-9) below which an
//!   observed-information eigenvalue is treated as numerically zero
//!   when building pseudoinverses.
//! - [`safe_sigmoid(x)`]: stable version of `1 / (1 + exp(-x))`,
//!   mapping ℝ → (0, 1) without overflow.
//! - [`safe_logit(p)`]: inverse of the sigmoid, mapping
//!   (0, 1) → ℝ with clamping against the interval endpoints.
//!
//! # Rationale
//! The correlation-function model keeps every physical parameter inside
//! a box (e.g. `om ∈ [0.1, 0.5]`, `alpha ∈ [0.8, 1.2]`) while the
//! L-BFGS optimizer works on an unconstrained vector. The sigmoid/logit
//! pair realizes that mapping: `lo + (hi - lo) * sigmoid(θ)` stays inside
//! the box for every finite θ, and the logit recovers θ from a bounded
//! value when building an initial guess.

/// Clamp width for logit inputs.
///
/// `safe_logit` clamps its argument into `[LOGIT_EPS, 1 - LOGIT_EPS]`
/// before taking the log-ratio, so values at (or slightly beyond) the
/// interval endpoints map to large finite numbers instead of ±∞. With
/// the default of 1e-12 the logit saturates near ±27.6, far inside the
/// range where the sigmoid round-trips without precision loss.
pub const LOGIT_EPS: f64 = 1e-12;

/// Eigenvalue floor for observed-information pseudoinverses.
///
/// When standard errors are built from a symmetric eigendecomposition
/// `J = Q Λ Qᵀ`, eigenvalues `λ ≤ EIGEN_EPS` are excluded from the
/// variance sums. Dividing by such eigenvalues would amplify numerical
/// noise into the reported uncertainties, so their directions are
/// dropped from the sum instead, as in a Moore–Penrose pseudoinverse.
pub const EIGEN_EPS: f64 = 1e-9;

/// Numerically stable sigmoid: `sigmoid(x) = 1 / (1 + exp(-x))`.
///
/// Computes the logistic function without overflow for large `|x|`.
/// The implementation branches on the sign of `x` so that `exp` is only
/// ever evaluated at a non-positive argument:
///
/// - For `x >= 0`, `sigmoid(x) = 1 / (1 + exp(-x))`.
/// - For `x < 0`, `sigmoid(x) = exp(x) / (1 + exp(x))`.
///
/// Both branches underflow gracefully: the result saturates at exactly
/// `1.0` or `0.0` for very large `|x|` instead of producing NaN.
///
/// # Parameters
/// - `x`: real input
///
/// # Returns
/// - `sigmoid(x)` in `(0, 1)` (closed at the endpoints only by
///   floating-point saturation).
pub fn safe_sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let ex = x.exp();
        ex / (1.0 + ex)
    }
}

/// Stable inverse of the sigmoid on `(0, 1)`: solves for `t` in
/// `sigmoid(t) = p`, returning `t = ln(p / (1 - p))`.
///
/// Direct evaluation diverges as `p` approaches 0 or 1. This
/// implementation clamps `p` into `[LOGIT_EPS, 1 - LOGIT_EPS]` first,
/// so endpoint values (and small numerical overshoots beyond them) map
/// to large finite outputs rather than ±∞ or NaN.
///
/// # Parameters
/// - `p`: a probability-like value, nominally in `(0, 1)`.
///
/// # Returns
/// - `t` such that `sigmoid(t) = clamp(p)`.
pub fn safe_logit(p: f64) -> f64 {
    let p = p.clamp(LOGIT_EPS, 1.0 - LOGIT_EPS);
    (p / (1.0 - p)).ln()
}

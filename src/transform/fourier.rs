//! Hankel-quadrature strategy for the P(k) → ξ(s) transform.
//!
//! Purpose
//! -------
//! Evaluate the spherical-Bessel integral
//!
//!   ξ(s) = (1/2π²) ∫₀^∞ k² P(k) j₀(ks) dk
//!
//! with Ogata's double-exponential quadrature for Bessel integrals.
//! Substituting u = ks and writing sin(u) through J_{1/2} turns the
//! integral into ∫ g(u) J_{1/2}(u) du, whose Ogata nodes sit at
//! x_j = (π/h)·ψ(h·j) with ψ(t) = t·tanh((π/2)·sinh t); for ν = 1/2 the
//! quadrature weights are exactly 1. Collapsing the Bessel prefactors
//! leaves
//!
//!   ξ(s) = (1/2πs³) · Σ_j x_j · sin(x_j) · ψ'(h·j) · P(x_j/s)
//!
//! and all s-independent pieces (nodes and their factors) are computed
//! once at construction.
//!
//! Key behaviors
//! -------------
//! - Each call fits a natural cubic spline to the supplied spectrum; the
//!   spline evaluates to 0 outside the tabulated range, which truncates
//!   the node sum naturally on both ends.
//! - The node map is double-exponential: ψ(t) → t as t grows, so nodes
//!   approach the Bessel zeros and the quadrature converges rapidly for
//!   decaying spectra.
//!
//! Invariants & assumptions
//! ------------------------
//! - ψ'(t) stays finite for every node: once the tanh factor saturates
//!   the derivative is exactly 1, before the cosh factor can overflow.
use crate::transform::errors::{TransformError, TransformResult};
use crate::transform::spline::CubicSpline;
use crate::transform::validation::validate_separations;
use ndarray::{Array1, ArrayView1};
use std::f64::consts::PI;

/// Default quadrature step size.
pub const OGATA_STEP: f64 = 1e-3;

/// The Ogata node map ψ(t) = t·tanh((π/2)·sinh t).
fn psi(t: f64) -> f64 {
    t * (0.5 * PI * t.sinh()).tanh()
}

/// dψ/dt, written so the large-t limit evaluates cleanly to 1.
fn psi_deriv(t: f64) -> f64 {
    let u = 0.5 * PI * t.sinh();
    let tanh_u = u.tanh();
    let sech2 = 1.0 - tanh_u * tanh_u;
    if sech2 == 0.0 {
        return 1.0;
    }
    tanh_u + t * 0.5 * PI * t.cosh() * sech2
}

/// The Hankel-quadrature transform strategy.
///
/// Construct via [`SphericalBesselTransform::new`], then call
/// [`transform`] per spectrum.
///
/// [`transform`]: SphericalBesselTransform::transform
#[derive(Debug, Clone)]
pub struct SphericalBesselTransform {
    nodes: Array1<f64>,
    factors: Array1<f64>,
}

impl SphericalBesselTransform {
    /// Build the quadrature with step `h` and `num_nodes` nodes
    /// (`None` resolves to ⌈3.2/h⌉, which covers the node map's linear
    /// regime at the default step).
    ///
    /// Errors
    /// ------
    /// - `TransformError::InvalidStep` if `h` is not finite and positive.
    /// - `TransformError::InvalidNodeCount` if `num_nodes` resolves to 0.
    pub fn new(h: f64, num_nodes: Option<usize>) -> TransformResult<SphericalBesselTransform> {
        if !h.is_finite() || h <= 0.0 {
            return Err(TransformError::InvalidStep { value: h });
        }
        let n = num_nodes.unwrap_or_else(|| (3.2 / h).ceil() as usize);
        if n == 0 {
            return Err(TransformError::InvalidNodeCount { value: n });
        }
        let mut nodes = Array1::zeros(n);
        let mut factors = Array1::zeros(n);
        for j in 0..n {
            let t = h * (j + 1) as f64;
            let x = (PI / h) * psi(t);
            nodes[j] = x;
            factors[j] = x * x.sin() * psi_deriv(t);
        }
        Ok(SphericalBesselTransform { nodes, factors })
    }

    /// The default configuration (step 1e-3, ⌈3.2/h⌉ nodes).
    pub fn with_defaults() -> TransformResult<SphericalBesselTransform> {
        SphericalBesselTransform::new(OGATA_STEP, None)
    }

    /// Number of quadrature nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Transform `pk` tabulated on `ks` into ξ at the separations `ss`.
    ///
    /// Errors
    /// ------
    /// - Spline-fit errors for malformed `(ks, pk)` input.
    /// - Separation validation errors.
    pub fn transform(
        &self, ks: ArrayView1<f64>, pk: ArrayView1<f64>, ss: ArrayView1<f64>,
    ) -> TransformResult<Array1<f64>> {
        let spline = CubicSpline::fit(ks, pk)?;
        validate_separations(ss)?;

        let k_max = spline.x_max();
        let mut xis = Array1::zeros(ss.len());
        for (xi, &s) in xis.iter_mut().zip(ss.iter()) {
            let mut acc = 0.0;
            for (&x, &factor) in self.nodes.iter().zip(self.factors.iter()) {
                let k = x / s;
                // Nodes ascend and the spline is zero beyond its support.
                if k > k_max {
                    break;
                }
                acc += factor * spline.eval(k);
            }
            *xi = acc / (2.0 * PI * s * s * s);
        }
        Ok(xis)
    }
}

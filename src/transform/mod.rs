//! transform — P(k) → ξ(s) engine, smoothing, and spline primitives.
//!
//! Purpose
//! -------
//! Turn tabulated matter power spectra into two-point correlation
//! functions, and split spectra into smooth envelopes plus BAO wiggles.
//! Two interchangeable transform strategies sit behind one dispatching
//! enum; smoothing methods are selected by name or constructed directly.
//!
//! Key behaviors
//! -------------
//! - Provide the strategy enum [`PowerToCorrelation`] wrapping the damped
//!   trapezoid rule ([`GaussQuadrature`]) and the Ogata Hankel quadrature
//!   ([`SphericalBesselTransform`]).
//! - Provide the smoothing enum [`SmoothingMethod`] (analytic zero-baryon
//!   envelope, weighted polynomial fit) plus the reusable analytic pieces
//!   ([`NoWiggleTransfer`], [`eh98_sound_horizon`]).
//! - Supply the natural cubic spline ([`CubicSpline`]) and the shared
//!   input validators.
//!
//! Invariants & assumptions
//! ------------------------
//! - Wavenumber grids are strictly ascending, strictly positive, and
//!   finite; every entry point validates before computing.
//! - Configuration is validated at construction: a strategy or smoothing
//!   method in hand never fails on configuration at call time.
//!
//! Conventions
//! -----------
//! - Wavenumbers in h/Mpc, power in (Mpc/h)³, separations in Mpc/h.
//! - Errors are reported as [`TransformError`] via [`TransformResult`];
//!   this module performs no I/O and no logging.
//!
//! Downstream usage
//! ----------------
//! - The BAO model layer smooths the linear spectrum once per cosmology,
//!   dewiggles it per parameter vector, and pushes the result through a
//!   [`PowerToCorrelation`] strategy at scaled separations.
//! - Solver code reuses [`NoWiggleTransfer`] and [`eh98_sound_horizon`]
//!   for its analytic transfer shape.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules check each strategy against the closed-form
//!   transform of a Gaussian spectrum, the spline against smooth
//!   functions, and the smoothing methods against exactly representable
//!   envelopes. Cross-strategy agreement on BAO scales is covered by the
//!   crate-level integration tests.

pub mod errors;
pub mod fourier;
pub mod gauss;
pub mod smoothing;
pub mod spline;
pub mod strategy;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{TransformError, TransformResult};
pub use self::fourier::{OGATA_STEP, SphericalBesselTransform};
pub use self::gauss::{GAUSS_DAMPING, GAUSS_INTERPOLATE_DETAIL, GaussQuadrature};
pub use self::smoothing::{
    HINTON_DEGREE, HINTON_SIGMA, HINTON_WEIGHT, NoWiggleTransfer, SmoothingMethod,
    eh98_sound_horizon,
};
pub use self::spline::CubicSpline;
pub use self::strategy::PowerToCorrelation;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_cosmology::transform::prelude::*;
//
// to import the main transform surface in a single line.

pub mod prelude {
    pub use super::errors::{TransformError, TransformResult};
    pub use super::smoothing::SmoothingMethod;
    pub use super::spline::CubicSpline;
    pub use super::strategy::PowerToCorrelation;
}

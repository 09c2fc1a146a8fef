//! numerical_stability — numerically robust transforms and shared tolerances.
//!
//! Purpose
//! -------
//! Collect the numerically stable scalar transforms and small numeric
//! tolerances shared by the optimization and inference layers. The
//! correlation-function model maps box-bounded physical parameters into
//! the optimizer's unconstrained space and back on every likelihood
//! evaluation; centralizing the transform logic here lets the rest of
//! the crate assume well-conditioned `f64` arithmetic.
//!
//! Key behaviors
//! -------------
//! - Provide stable scalar transforms (`safe_sigmoid` and `safe_logit`)
//!   for mapping unconstrained reals into `(0, 1)` and back without
//!   overflow, underflow, or ±∞ at the interval endpoints.
//! - Centralize small numeric tolerances (`LOGIT_EPS`, `EIGEN_EPS`) so
//!   downstream modules share consistent guards and clamping behavior.
//!
//! Invariants & assumptions
//! ------------------------
//! - All public transforms assume finite `f64` inputs; domain and shape
//!   validation (parameter bounds, vector lengths) is enforced in the
//!   model and optimizer layers, not here.
//! - `safe_sigmoid` is strictly monotone, so the parameter-box mapping
//!   `lo + (hi - lo) * sigmoid(θ)` built on top of it is invertible on
//!   the open box.
//! - `EIGEN_EPS` is treated as a fixed global eigenvalue floor; the
//!   inference layer is responsible for how dropped eigenvalues affect
//!   reported standard errors.
//!
//! Conventions
//! -----------
//! - All routines here are scalar `f64 -> f64` helpers suitable for use
//!   inside tight inner loops; vector- and matrix-level work stays in
//!   the layers that own the containers.
//! - This module never logs, performs I/O, or touches global state.
//! - Panics and `unsafe` are avoided; out-of-range logit inputs are
//!   clamped rather than rejected.
//!
//! Downstream usage
//! ----------------
//! - The model layer uses `safe_sigmoid`/`safe_logit` to move between
//!   box-bounded physical parameters (om, alpha, sigma_nl, bias, and the
//!   polynomial nuisance terms) and the optimizer vector.
//! - The inference layer reuses `EIGEN_EPS` as the eigenvalue cutoff
//!   when building pseudoinverses of observed-information matrices.
//! - Higher-level front-ends are expected to depend only on the
//!   re-exported surface (constants and transforms) or the prelude, not
//!   on internal implementation details of [`transformations`].
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover:
//!   - agreement of the stable sigmoid with the naïve formula on safe
//!     grids,
//!   - saturation behavior for extreme arguments,
//!   - logit/sigmoid round-trips on interior points,
//!   - clamping at and beyond the unit-interval endpoints.
//! - The model and inference layers exercise the higher-level invariants
//!   (bounds respected by construction, SE inflation along weakly
//!   identified directions) rather than re-testing these primitives.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{EIGEN_EPS, LOGIT_EPS, safe_logit, safe_sigmoid};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_cosmology::optimization::numerical_stability::prelude::*;
//
// to import the main numerical-stability surface in a single line.

pub mod prelude {
    pub use super::transformations::{EIGEN_EPS, LOGIT_EPS, safe_logit, safe_sigmoid};
}

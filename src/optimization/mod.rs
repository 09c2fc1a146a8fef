//! optimization — likelihood fitting, numeric guards, and one error surface.
//!
//! Purpose
//! -------
//! House everything a BAO fit needs between the model and the solver: an
//! Argmin-backed maximum-likelihood driver, the numeric transforms that
//! keep parameters and covariances well behaved, and a single error enum
//! the rest of the crate can match on. A model implements one trait,
//! picks stopping rules, and gets fitted parameters and diagnostics back
//! without touching solver internals.
//!
//! Key behaviors
//! -------------
//! - `loglik_optimizer` maximizes a log-likelihood `ℓ(θ)` with L-BFGS,
//!   covering solver construction, stopping rules, and the
//!   finite-difference fallback.
//! - `numerical_stability` maps unconstrained optimizer coordinates into
//!   box-bounded physical parameters and floors eigenvalues when
//!   covariance matrices are inverted.
//! - `errors` folds configuration mistakes, numeric failures, solver
//!   faults, and cosmology-layer errors into `OptError` with the shared
//!   `OptResult<T>` alias.
//!
//! Invariants & assumptions
//! ------------------------
//! - Solvers run in unconstrained θ-space and may assume finite inputs
//!   once validation has passed; anything invalid is an `OptError`, not
//!   a panic.
//! - Likelihood implementations treat domain failures (a missing
//!   spectrum cache, a solver fault at a grid cell, an out-of-range
//!   parameter) as recoverable errors that travel through this layer.
//! - Dimension, bound, and finiteness checks happen at module
//!   boundaries, so inner loops never re-validate.
//!
//! Conventions
//! -----------
//! - Maximization by cost minimization: internally `c(θ) = -ℓ(θ)`, but
//!   every public number is in log-likelihood terms.
//! - `ndarray` aliases (`Theta`, `Grad`, `Hessian`) are the only vector
//!   and matrix types crossing these APIs; the sigmoid/logit box mapping
//!   between θ-space and physical parameters (om, alpha, sigma_nl, bias,
//!   nuisance polynomial) lives in `numerical_stability`.
//! - Fallible entry points return `OptResult<T>`; raw Argmin errors and
//!   model-specific enums stop at the conversion boundary.
//! - No I/O and no logging here apart from the optional solver observer;
//!   front-ends own progress reporting.
//!
//! Downstream usage
//! ----------------
//! - The BAO correlation model implements `LogLikelihood` and calls
//!   `maximize` with a starting θ, its dataset, and `MLEOptions`,
//!   receiving an `OptimOutcome`.
//! - The model and inference layers pull the box mapping and the
//!   eigenvalue floor from `numerical_stability` when they turn
//!   optimizer output into physical parameters and standard errors.
//! - Front-ends import the curated surface through
//!   `optimization::prelude::*`, or the per-submodule preludes when they
//!   want a narrower slice.
//!
//! Testing notes
//! -------------
//! - Submodule unit tests stay local:
//!   - `loglik_optimizer`: solver wiring, tolerance handling, toy-model
//!     fits.
//!   - `numerical_stability`: box-mapping round trips and eigenvalue
//!     floor behavior.
//! - The integration suite drives a complete fit through this layer and
//!   checks that misconfiguration and numeric failure both surface as
//!   meaningful `OptError` values while a clean run yields a stable
//!   `OptimOutcome`.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_cosmology::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}

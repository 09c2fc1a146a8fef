//! inference — standard errors for fitted models.
//!
//! Purpose
//! -------
//! Provide post-estimation uncertainty quantification on top of a fitted
//! model. This module computes classical (observed-information) standard
//! errors from finite-difference Hessians of the log-likelihood, all
//! expressed in the unconstrained optimizer parameter space `θ`.
//!
//! Key behaviors
//! -------------
//! - Build the observed information matrix `J(θ̂)` from a gradient map via
//!   finite differences, then decompose it with a symmetric
//!   eigendecomposition.
//! - Construct the Moore–Penrose pseudoinverse with an eigenvalue floor so
//!   that nearly singular information matrices produce finite standard
//!   errors instead of dividing by numerical noise.
//! - Expose a single entrypoint, [`calc_standard_errors`], that returns
//!   per-parameter SEs for a fitted estimate.
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameters `θ` live in **unconstrained optimizer space**. Any mapping
//!   from constrained model parameters to `θ` is handled upstream in the
//!   estimation code.
//! - The supplied gradient map is the gradient of the negative
//!   log-likelihood, so the observed information has non-negative
//!   eigenvalues at a well-behaved maximum.
//! - All numerical routines return errors through `OptResult` rather than
//!   panicking; callers are expected to handle these errors explicitly.
//!
//! Conventions
//! -----------
//! - Standard error vectors match the ordering and length of `θ̂`.
//! - All functions are pure with respect to I/O: no logging, no global
//!   state, and no `unsafe` code paths.
//!
//! Downstream usage
//! ----------------
//! - After fitting the BAO correlation model and obtaining `θ̂`, the model
//!   layer calls [`calc_standard_errors`] with a finite-difference gradient
//!   closure over its own log-likelihood.
//! - Downstream code typically imports the surface via
//!   `use rust_cosmology::inference::*;` or the prelude.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`hessian`] cover the `ndarray`/`nalgebra` bridge,
//!   agreement with analytic pseudoinverses on diagonal quadratics, and
//!   truncation of singular directions.
//! - The pipeline integration tests exercise SEs for a fitted
//!   correlation-function model on synthetic data.

pub mod hessian;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::hessian::calc_standard_errors;

// ---- Optional convenience prelude for downstream crates ------------------
//
// Downstream crates can `use rust_cosmology::inference::prelude::*;` to
// import the primary inference surface in a single line.

pub mod prelude {
    pub use super::hessian::calc_standard_errors;
}

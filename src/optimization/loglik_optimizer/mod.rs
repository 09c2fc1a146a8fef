//! loglik_optimizer — argmin-backed maximum-likelihood driver.
//!
//! Purpose
//! -------
//! Run maximum-likelihood fits of models that expose a log-likelihood
//! `ℓ(θ)`, from Rust or through the Python bindings. A model implements
//! one trait, [`LogLikelihood`], and a caller invokes [`maximize`] to get
//! an L-BFGS solve with a configurable line search, stopping rules, and
//! finite-difference fallbacks when no analytic gradient exists.
//!
//! Key behaviors
//! -------------
//! - Present `ℓ(θ)` to Argmin as the cost `c(θ) = -ℓ(θ)` through
//!   [`adapter::ArgMinAdapter`].
//! - Funnel every fit through [`maximize`], which:
//!   - pre-checks the starting point with [`LogLikelihood::check`],
//!   - builds the solver for the configured [`traits::LineSearcher`] via
//!     [`builders`],
//!   - executes through [`run::run_lbfgs`], and
//!   - folds the final state into an [`OptimOutcome`].
//! - Keep numeric differentiation in [`finite_diff`], with validation
//!   and error capture, for models without analytic derivatives.
//! - Validate configuration ([`Tolerances`], [`MLEOptions`]) and solver
//!   state ([`validation`]) at the boundaries so the inner loop can
//!   assume finite inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - The layer always maximizes: models implement `ℓ(θ)` and, when
//!   available, `∇ℓ(θ)`; nothing outside the adapter ever sees the cost
//!   sign convention.
//! - [`LogLikelihood::value`] and [`LogLikelihood::grad`] report bad
//!   input as recoverable [`OptError`] values rather than panicking.
//! - All vectors and matrices use the [`Theta`], [`Grad`], and
//!   [`types::Hessian`] aliases, finite whenever a solve is in flight.
//! - [`Tolerances`] and [`MLEOptions`] validate at construction; the
//!   solver layer trusts them afterwards.
//!
//! Conventions
//! -----------
//! - `Theta` lives in the unconstrained optimizer space; mapping from
//!   physical parameters (dilation, bias, damping) into that space is
//!   the model layer's job.
//! - The internal cost is `c(θ) = -ℓ(θ)`; every user-facing number,
//!   [`OptimOutcome::value`] included, is in log-likelihood terms.
//! - A model's `grad` returns `∇ℓ(θ)`; the adapter derives the cost
//!   gradient `∇c(θ) = -∇ℓ(θ)`.
//! - Failures travel as [`OptResult<T>`] / [`OptError`]; no intentional
//!   panics, no `unsafe`.
//!
//! Downstream usage
//! ----------------
//! - The BAO correlation model implements [`LogLikelihood`] and calls
//!   [`maximize`] with:
//!   - itself (`&M`),
//!   - a starting [`Theta`] from its parameter map,
//!   - its dataset (`&M::Data`), and
//!   - an [`MLEOptions`] built from caller configuration.
//! - Front-ends (the Python bindings in particular) touch only the
//!   re-exported surface: [`maximize`], [`LogLikelihood`],
//!   [`MLEOptions`], [`Tolerances`], [`OptimOutcome`], and the aliases
//!   from [`types`].
//! - Inside the layer:
//!   - [`adapter`] bridges into Argmin,
//!   - [`builders`] constructs the line-search-specific solvers,
//!   - [`run::run_lbfgs`] executes,
//!   - [`finite_diff`] and [`validation`] guard derivatives and state.
//!
//! Testing notes
//! -------------
//! - Submodule unit tests cover:
//!   - solver construction and tolerance wiring in [`builders`],
//!   - finite differencing and validation in [`finite_diff`] and
//!     [`validation`],
//!   - configuration and outcome invariants in [`traits`].
//! - The end-to-end fit of the BAO model on synthetic data exercises
//!   [`maximize`] in the integration suite, confirming the line-search
//!   dispatch, the finite-difference path, and the diagnostics carried
//!   by [`OptimOutcome`].

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_cosmology::optimization::loglik_optimizer::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}

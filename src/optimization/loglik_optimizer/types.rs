//! loglik_optimizer::types — numeric aliases and pre-wired solver types.
//!
//! Purpose
//! -------
//! Pin down the concrete numeric types the likelihood optimizer works
//! with, so that every other module in the optimization layer can name
//! `Theta`, `Grad`, or `Hessian` instead of spelling out `ndarray` and
//! Argmin generics. Swapping the linear-algebra backend or the Argmin
//! vector shapes later only touches this file.
//!
//! Key behaviors
//! -------------
//! - Alias the parameter vector, gradient, Hessian, and scalar objective
//!   to `ndarray` containers over `f64` (`Theta`, `Grad`, `Hessian`,
//!   `Cost`).
//! - Alias the solver's per-run function-evaluation counters to a plain
//!   `HashMap` (`FnEvalMap`).
//! - Wire L-BFGS to each supported line search once, here, so builders
//!   construct solvers from a short alias instead of a four-parameter
//!   generic.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every vector or matrix that crosses an optimizer boundary is an
//!   `ndarray` container of `f64`; no other scalar type is supported.
//! - `Cost` lives in negated log-likelihood space. The adapter performs
//!   the sign flip; nothing in this module does.
//! - The line-search aliases follow Argmin's `(Param, Gradient, Float)`
//!   parameterization for the pinned Argmin release.
//!
//! Conventions
//! -----------
//! - `Theta` holds the free parameters of a fit in the order fixed by
//!   the model's parameter map; `Grad` always matches its length.
//! - `Hessian` is dense and square, `theta.len() × theta.len()`.
//! - `DEFAULT_LBFGS_MEM` is the fallback L-BFGS history depth; run
//!   options may override it per fit.
//! - Nothing here executes at runtime; these are aliases and one
//!   constant.
//!
//! Downstream usage
//! ----------------
//! - The adapter, builders, and finite-difference helpers all consume
//!   these aliases rather than raw `ndarray`/Argmin types.
//! - Correlation-function models hand the optimizer a `Theta` of free
//!   BAO parameters and read the fitted `Theta` back out of the run
//!   outcome.
//! - Builders pick [`LbfgsHagerZhang`] or [`LbfgsMoreThuente`] from the
//!   configured line-search choice.
//!
//! Testing notes
//! -------------
//! - Aliases carry no behavior of their own, so there is no unit test
//!   module here.
//! - The surrounding optimizer modules instantiate every alias in their
//!   tests, which is where breakage would surface.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Free-parameter vector `θ` handed to the optimizer.
///
/// Alias for `ndarray::Array1<f64>`; ordering follows the model's
/// parameter map.
pub type Theta = Array1<f64>;

/// Gradient vector of the objective at a given `θ`.
///
/// Alias for `ndarray::Array1<f64>`, always the same length as `Theta`.
pub type Grad = Array1<f64>;

/// Dense second-derivative matrix of the objective.
///
/// Alias for `ndarray::Array2<f64>`, square with side `theta.len()`.
pub type Hessian = Array2<f64>;

/// Scalar objective value.
///
/// This is the cost `c(θ) = -ℓ(θ)` that the minimizer actually sees;
/// callers think in terms of the log-likelihood `ℓ(θ)`.
pub type Cost = f64;

/// Per-run evaluation counters keyed by the solver's counter names.
///
/// Typical keys are `"cost_count"` and `"gradient_count"`.
pub type FnEvalMap = HashMap<String, u64>;

/// Fallback L-BFGS history depth when the caller does not set one.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Hager–Zhang line search over this crate's numeric shapes.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// Moré–Thuente line search over this crate's numeric shapes.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS with the Hager–Zhang line search plugged in.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS with the Moré–Thuente line search plugged in.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;

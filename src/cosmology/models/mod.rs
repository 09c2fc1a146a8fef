//! models — the BAO correlation-function model and its parameterization.
//!
//! Purpose
//! -------
//! Collect the user-facing BAO model APIs (prediction, fitting, inference)
//! on top of the spectrum generator and the P(k) → ξ(s) transform engine.
//! This layer turns cached grid queries into a parametric correlation
//! function and wires it into the generic log-likelihood optimizer.
//!
//! Key behaviors
//! -------------
//! - Expose a complete correlation model type [`BaoCorrelationModel`] that
//!   implements [`LogLikelihood`] and provides `fit`, `standard_errors`,
//!   and `gof_pvalue` methods.
//! - Centralize the parameter table, box bounds, and the θ mapping in
//!   [`params`], including per-name fixing through [`ParamMap`].
//! - Memoize the smooth/ratio spectrum split per Ωm so repeated likelihood
//!   evaluations pay only for damping, dilation, and the transform.
//! - Provide a light-weight prelude so downstream code can import the main
//!   model surface in a single line.
//!
//! Invariants & assumptions
//! ------------------------
//! - Measured data are carried in validated [`CorrelationData`] instances:
//!   finite, strictly positive separations, matching lengths, and a
//!   square inverse covariance.
//! - Optimizer vectors θ have one finite entry per free parameter; this is
//!   enforced by [`LogLikelihood::check`] via [`ParamMap::validate_theta`].
//! - Model-space values produced from θ always lie inside their boxes;
//!   out-of-range fixed values are rejected at [`ParamMap::fix`] time.
//! - The model is `Send + Sync`; its only interior mutability is the
//!   mutex-guarded spectrum memo, so one instance may serve concurrent
//!   likelihood evaluations.
//!
//! Conventions
//! -----------
//! - Optimization runs in unconstrained θ-space; each free parameter is
//!   squashed into its box through a numerically stable sigmoid and
//!   recovered through the matching logit.
//! - θ slots follow the [`BAO_PARAM_SPECS`] table order with fixed
//!   parameters omitted.
//! - Separations are comoving Mpc/h throughout; the dilation α rescales
//!   the separations fed to the transform, never the data.
//! - Errors are reported as `CosmoResult`; panics indicate programming
//!   errors, not bad user data or bad θ.
//!
//! Downstream usage
//! ----------------
//! - Build a [`ParamMap`], fix whatever the analysis pins (typically `om`
//!   to a fiducial value), and construct a [`BaoCorrelationModel`] over a
//!   shared generator.
//! - Call `fit(param_map.default_theta(), &data)` to run the MLE, then
//!   `standard_errors(&data)` and `gof_pvalue(&data)` for inference.
//! - Front-ends (Python bindings, pipeline glue) are expected to depend on
//!   the items re-exported below or via the [`prelude`].
//!
//! Testing notes
//! -------------
//! - Unit tests in [`params`] cover the θ bijection, bound saturation, and
//!   the fixing table's error paths.
//! - Unit tests in [`correlation`] cover dataset validation, prediction
//!   structure (bias linearity, memo reuse), the likelihood maximum on
//!   synthetic data, and the fit / standard-error / goodness-of-fit cycle.
//! - The end-to-end pipeline (grid generation → prediction → fit) runs in
//!   the integration tests.
//!
//! [`LogLikelihood`]: crate::optimization::loglik_optimizer::LogLikelihood
//! [`LogLikelihood::check`]: crate::optimization::loglik_optimizer::LogLikelihood::check

pub mod correlation;
pub mod params;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::correlation::{BaoCorrelationModel, CorrelationData, SMOOTH_MEMO_CAPACITY};
pub use self::params::{BaoParams, ParamMap, ParamSpec, BAO_PARAM_SPECS, PARAM_COUNT};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_cosmology::cosmology::models::prelude::*;
//
// to import the main BAO model surface in a single line.

pub mod prelude {
    pub use super::correlation::{BaoCorrelationModel, CorrelationData};
    pub use super::params::{BaoParams, ParamMap};
}

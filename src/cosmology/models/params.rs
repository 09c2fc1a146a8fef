//! BAO model parameterization and the optimizer-space mapping.
//!
//! This module provides the **model-space** parameter container [`BaoParams`]
//! and the fixing table [`ParamMap`] used by the correlation-function model.
//! It also implements a **numerically stable mapping** between the model's
//! box-bounded parameters and an **unconstrained optimizer vector** θ (as
//! `ndarray::Array1<f64>`).
//!
//! ## What this module defines
//! - [`ParamSpec`] and [`BAO_PARAM_SPECS`]: the model's seven named
//!   parameters with their box bounds and default values.
//! - [`BaoParams`]: plain model-space values `(om, alpha, sigma_nl, b,
//!   a1, a2, a3)` consumed by the correlation-function pipeline.
//! - [`ParamMap`]: which parameters are fixed at a constant, and the
//!   bijection between the remaining free parameters and θ.
//!
//! ## Parameter table
//! - `om`       ∈ [0.1, 0.5],     default 0.31  — matter fraction Ωm.
//! - `alpha`    ∈ [0.8, 1.2],     default 1.0   — BAO dilation.
//! - `sigma_nl` ∈ [1.0, 20.0],    default 5.0   — BAO damping scale, Mpc/h.
//! - `b`        ∈ [0.01, 10.0],   default 1.0   — linear bias.
//! - `a1`       ∈ [−100, 100],    default 0.0   — nuisance term / s².
//! - `a2`       ∈ [−2, 2],        default 0.0   — nuisance term / s.
//! - `a3`       ∈ [−0.2, 0.2],    default 0.0   — constant nuisance term.
//!
//! ## Mapping conventions
//! - Every free parameter occupies one slot of θ, in table order; fixed
//!   parameters are omitted from θ entirely and reinserted by
//!   [`ParamMap::from_theta`].
//! - Forward map: `value = lo + (hi − lo)·sigmoid(θ)`, so any finite θ lands
//!   strictly inside the box and the optimizer never sees a constraint.
//! - Inverse map: `θ = logit((value − lo)/(hi − lo))`, with the fraction
//!   clamped to `[LOGIT_EPS, 1 − LOGIT_EPS]` before the log so values at or
//!   beyond a bound stay finite.
//!
//! ## Invariants validated by constructors
//! - [`ParamMap::fix`] rejects unknown names and values outside the box.
//! - [`ParamMap::from_theta`] rejects vectors whose length disagrees with
//!   the number of free parameters.
//! - [`ParamMap::to_theta`] assumes model-space values inside their boxes;
//!   out-of-box values are clamped to the nearest bound, not rejected.
use crate::cosmology::errors::{CosmoError, CosmoResult};
use crate::optimization::numerical_stability::transformations::{safe_logit, safe_sigmoid};
use ndarray::{Array1, ArrayView1};

/// Number of named parameters in the BAO correlation model.
pub const PARAM_COUNT: usize = 7;

/// One named model parameter: box bounds and a default value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Lookup name used by [`ParamMap::fix`].
    pub name: &'static str,
    /// Lower box bound (inclusive).
    pub min: f64,
    /// Upper box bound (inclusive).
    pub max: f64,
    /// Default model-space value; strictly inside the box.
    pub default: f64,
}

/// The BAO correlation model's parameter table, in θ slot order.
pub const BAO_PARAM_SPECS: [ParamSpec; PARAM_COUNT] = [
    ParamSpec { name: "om", min: 0.1, max: 0.5, default: 0.31 },
    ParamSpec { name: "alpha", min: 0.8, max: 1.2, default: 1.0 },
    ParamSpec { name: "sigma_nl", min: 1.0, max: 20.0, default: 5.0 },
    ParamSpec { name: "b", min: 0.01, max: 10.0, default: 1.0 },
    ParamSpec { name: "a1", min: -100.0, max: 100.0, default: 0.0 },
    ParamSpec { name: "a2", min: -2.0, max: 2.0, default: 0.0 },
    ParamSpec { name: "a3", min: -0.2, max: 0.2, default: 0.0 },
];

/// Model-space parameters for the BAO correlation-function model.
///
/// The fields follow [`BAO_PARAM_SPECS`] order; the table's `"b"` row maps
/// to the `bias` field. Instances produced by [`ParamMap::from_theta`] are
/// guaranteed to lie inside their boxes; hand-built instances are taken at
/// face value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaoParams {
    /// Matter fraction Ωm.
    pub om: f64,
    /// BAO dilation parameter scaling the model separations.
    pub alpha: f64,
    /// Gaussian BAO damping scale Σnl, Mpc/h.
    pub sigma_nl: f64,
    /// Linear bias multiplying ξ.
    pub bias: f64,
    /// Nuisance term weighted by 1/s².
    pub a1: f64,
    /// Nuisance term weighted by 1/s.
    pub a2: f64,
    /// Constant nuisance term.
    pub a3: f64,
}

impl BaoParams {
    /// The parameter values in [`BAO_PARAM_SPECS`] order.
    pub fn values(&self) -> [f64; PARAM_COUNT] {
        [self.om, self.alpha, self.sigma_nl, self.bias, self.a1, self.a2, self.a3]
    }

    /// Build from values in [`BAO_PARAM_SPECS`] order.
    pub fn from_values(values: [f64; PARAM_COUNT]) -> BaoParams {
        BaoParams {
            om: values[0],
            alpha: values[1],
            sigma_nl: values[2],
            bias: values[3],
            a1: values[4],
            a2: values[5],
            a3: values[6],
        }
    }
}

impl Default for BaoParams {
    /// The table defaults: a ΛCDM-like cosmology with unit bias and
    /// dilation, moderate BAO damping, and zeroed nuisance terms.
    fn default() -> Self {
        let mut values = [0.0; PARAM_COUNT];
        for (value, spec) in values.iter_mut().zip(BAO_PARAM_SPECS.iter()) {
            *value = spec.default;
        }
        BaoParams::from_values(values)
    }
}

/// Which parameters are fixed, and the θ ↔ model-space bijection over the
/// free ones.
///
/// A fresh map leaves every parameter free, so θ has [`PARAM_COUNT`]
/// entries. Fixing a parameter removes its slot from θ; the fixed value is
/// reinserted by [`ParamMap::from_theta`] on every evaluation. Fixing is
/// how a fit is restricted (the original analyses typically pin `om` to a
/// fiducial cosmology and fit the remaining six).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParamMap {
    fixed: [Option<f64>; PARAM_COUNT],
}

impl ParamMap {
    /// A map with every parameter free.
    pub fn new() -> ParamMap {
        ParamMap { fixed: [None; PARAM_COUNT] }
    }

    /// Fix `name` at `value`, removing it from the optimizer vector.
    ///
    /// ### Errors
    /// - [`CosmoError::UnknownParameter`] if `name` is not in
    ///   [`BAO_PARAM_SPECS`].
    /// - [`CosmoError::FixedValueOutOfBounds`] if `value` is non-finite or
    ///   outside the parameter's box.
    pub fn fix(&mut self, name: &str, value: f64) -> CosmoResult<()> {
        let index = Self::index_of(name)?;
        let spec = &BAO_PARAM_SPECS[index];
        if !value.is_finite() || value < spec.min || value > spec.max {
            return Err(CosmoError::FixedValueOutOfBounds {
                name: spec.name,
                value,
                min: spec.min,
                max: spec.max,
            });
        }
        self.fixed[index] = Some(value);
        Ok(())
    }

    /// Release a previously fixed parameter back to the optimizer.
    ///
    /// Releasing an already-free parameter is a no-op.
    ///
    /// ### Errors
    /// - [`CosmoError::UnknownParameter`] if `name` is not in the table.
    pub fn release(&mut self, name: &str) -> CosmoResult<()> {
        let index = Self::index_of(name)?;
        self.fixed[index] = None;
        Ok(())
    }

    /// Number of free parameters, which is the length of θ.
    pub fn n_free(&self) -> usize {
        self.fixed.iter().filter(|slot| slot.is_none()).count()
    }

    /// Names of the free parameters, in θ slot order.
    pub fn free_names(&self) -> Vec<&'static str> {
        BAO_PARAM_SPECS
            .iter()
            .zip(self.fixed.iter())
            .filter(|(_, slot)| slot.is_none())
            .map(|(spec, _)| spec.name)
            .collect()
    }

    /// Check that `theta` has one finite entry per free parameter.
    ///
    /// ### Errors
    /// - [`CosmoError::ThetaLengthMismatch`] for a wrong-length vector.
    /// - [`CosmoError::InvalidParameterRange`] (named `"theta"`) for a
    ///   NaN or infinite entry.
    pub fn validate_theta(&self, theta: ArrayView1<f64>) -> CosmoResult<()> {
        let expected = self.n_free();
        if theta.len() != expected {
            return Err(CosmoError::ThetaLengthMismatch { expected, actual: theta.len() });
        }
        for &value in theta.iter() {
            if !value.is_finite() {
                return Err(CosmoError::InvalidParameterRange {
                    name: "theta",
                    value,
                    reason: "Optimizer parameters must be finite.",
                });
            }
        }
        Ok(())
    }

    /// Build model-space parameters from an optimizer vector θ.
    ///
    /// ### Behavior
    /// 1. Checks `theta.len()` against the number of free parameters.
    /// 2. Walks the table in order: fixed parameters take their stored
    ///    value, each free parameter consumes the next θ slot via
    ///    `lo + (hi − lo)·sigmoid(θ)`.
    ///
    /// ### Returns
    /// A [`BaoParams`] whose every field lies inside its box (bounds are
    /// attained only in the sigmoid's saturation limit).
    ///
    /// ### Errors
    /// - [`CosmoError::ThetaLengthMismatch`] for a wrong-length vector.
    pub fn from_theta(&self, theta: ArrayView1<f64>) -> CosmoResult<BaoParams> {
        let expected = self.n_free();
        if theta.len() != expected {
            return Err(CosmoError::ThetaLengthMismatch { expected, actual: theta.len() });
        }
        let mut values = [0.0; PARAM_COUNT];
        let mut cursor = 0;
        for (index, spec) in BAO_PARAM_SPECS.iter().enumerate() {
            values[index] = match self.fixed[index] {
                Some(value) => value,
                None => {
                    let value = spec.min + (spec.max - spec.min) * safe_sigmoid(theta[cursor]);
                    cursor += 1;
                    value
                }
            };
        }
        Ok(BaoParams::from_values(values))
    }

    /// Map model-space parameters to an optimizer vector θ.
    ///
    /// ### Behavior
    /// For each free parameter, writes `logit((value − lo)/(hi − lo))`;
    /// fixed parameters contribute no slot. The fraction is clamped away
    /// from 0 and 1 inside [`safe_logit`], so a value sitting exactly on a
    /// bound maps to a large finite θ rather than ±∞.
    ///
    /// ### Notes
    /// - Assumes values inside their boxes; out-of-box inputs are clamped,
    ///   not rejected, matching the fitter's use of θ as a warm start.
    pub fn to_theta(&self, params: &BaoParams) -> Array1<f64> {
        let values = params.values();
        let mut theta = Vec::with_capacity(self.n_free());
        for (index, spec) in BAO_PARAM_SPECS.iter().enumerate() {
            if self.fixed[index].is_none() {
                theta.push(safe_logit((values[index] - spec.min) / (spec.max - spec.min)));
            }
        }
        Array1::from(theta)
    }

    /// θ for the table defaults of the currently free parameters.
    ///
    /// The standard starting point for a fit.
    pub fn default_theta(&self) -> Array1<f64> {
        self.to_theta(&BaoParams::default())
    }

    fn index_of(name: &str) -> CosmoResult<usize> {
        BAO_PARAM_SPECS
            .iter()
            .position(|spec| spec.name == name)
            .ok_or_else(|| CosmoError::UnknownParameter { name: name.to_string() })
    }
}

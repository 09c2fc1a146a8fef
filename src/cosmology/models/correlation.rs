//! BAO correlation-function model: dewiggled ξ(s) prediction and MLE fit.
//!
//! This module wires the cached power-spectrum generator and the P(k) → ξ(s)
//! transform into a [`LogLikelihood`] implementation. It predicts the galaxy
//! correlation function with a damped BAO feature, a dilation of the
//! separation axis, and broadband nuisance terms, then fits the free
//! parameters against a measured [`CorrelationData`] by maximum likelihood.
//!
//! Key ideas:
//! - The linear spectrum at a queried Ωm is split once into a smooth
//!   envelope and a wiggle ratio, then memoized per Ωm; only the damping,
//!   dilation, and transform steps run per likelihood evaluation.
//! - The BAO wiggles are damped by `exp(−(k·Σnl)²/2)` before the transform,
//!   and the model is evaluated at `α·s` to let the acoustic scale shift.
//! - Broadband freedom comes from a linear bias and the nuisance polynomial
//!   `a1/s² + a2/s + a3`; the Gaussian log-likelihood contracts the residual
//!   with a caller-supplied inverse covariance.
use crate::cosmology::cache::MemoCache;
use crate::cosmology::errors::{CosmoError, CosmoResult};
use crate::cosmology::generator::CosmoGenerator;
use crate::cosmology::models::params::{BaoParams, ParamMap};
use crate::cosmology::core::validation::{
    validate_finite_array, validate_inverse_covariance, validate_same_length,
    validate_separations,
};
use crate::inference::calc_standard_errors;
use crate::optimization::errors::OptResult;
use crate::optimization::loglik_optimizer::{
    maximize, Cost, LogLikelihood, MLEOptions, OptimOutcome, Theta,
};
use crate::transform::smoothing::SmoothingMethod;
use crate::transform::strategy::PowerToCorrelation;
use finitediff::FiniteDiff;
use ndarray::{Array1, Array2, ArrayView1, Zip};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use std::cell::RefCell;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Capacity of the per-Ωm smooth-spectrum memo.
///
/// Each entry holds two arrays on the shared wavenumber axis; a fit that
/// varies Ωm revisits nearby values constantly, so a few hundred entries
/// cover any realistic optimizer trajectory.
pub const SMOOTH_MEMO_CAPACITY: usize = 512;

/// A measured correlation function with its inverse covariance.
///
/// Purpose
/// -------
/// Validated container for the dataset a fit runs against: separations,
/// measured ξ values, and the inverse of the measurement covariance.
///
/// Fields
/// ------
/// - `ss`: separations, Mpc/h; finite and strictly positive.
/// - `xi`: measured correlation values at `ss`; finite, same length.
/// - `icov`: inverse covariance, `n × n` for `n = ss.len()`; finite.
///
/// Invariants
/// ----------
/// - All three members are validated once in [`CorrelationData::new`];
///   downstream code indexes and divides by `ss` without rechecking.
///
/// Notes
/// -----
/// - The container does not verify that `icov` is symmetric or positive
///   definite; that is a property of the caller's covariance estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationData {
    /// Separations, Mpc/h.
    pub ss: Array1<f64>,
    /// Measured correlation function at `ss`.
    pub xi: Array1<f64>,
    /// Inverse covariance of `xi`.
    pub icov: Array2<f64>,
}

impl CorrelationData {
    /// Build a validated dataset.
    ///
    /// Parameters
    /// ----------
    /// - `ss`: separations, Mpc/h.
    /// - `xi`: measured correlation values at `ss`.
    /// - `icov`: inverse covariance matrix of `xi`.
    ///
    /// Returns
    /// -------
    /// - `Ok(CorrelationData)` once every member passes validation.
    ///
    /// Errors
    /// ------
    /// - [`CosmoError::EmptyDataset`] / [`CosmoError::NonFiniteDataset`] /
    ///   [`CosmoError::NonPositiveSeparation`] for a bad `ss`.
    /// - [`CosmoError::LengthMismatch`] if `xi` disagrees with `ss`.
    /// - [`CosmoError::CovarianceShapeMismatch`] for a wrongly shaped
    ///   `icov`.
    pub fn new(ss: Array1<f64>, xi: Array1<f64>, icov: Array2<f64>) -> CosmoResult<Self> {
        validate_separations(ss.view())?;
        validate_finite_array("xi", xi.view())?;
        validate_same_length("xi", ss.len(), xi.len())?;
        validate_inverse_covariance(icov.view(), ss.len())?;
        Ok(CorrelationData { ss, xi, icov })
    }

    /// Number of separation bins.
    pub fn len(&self) -> usize {
        self.ss.len()
    }

    /// True when the dataset holds no bins.
    pub fn is_empty(&self) -> bool {
        self.ss.is_empty()
    }
}

/// BAO correlation-function model over a cached power-spectrum grid.
///
/// Encapsulates the spectrum source (`generator`), the smooth-envelope
/// method (`smoothing`), the P(k) → ξ(s) strategy (`pk2xi`), the fixing
/// table (`param_map`), and optimizer options (`options`). After fitting,
/// `results` stores the optimization outcome and `fitted_params` the
/// model-space parameters at the optimum.
///
/// # Notes
/// - The expensive smooth/ratio split is memoized per Ωm behind a mutex,
///   so likelihood evaluation takes `&self` and the model stays shareable
///   across threads.
/// - Implements [`LogLikelihood`], so it plugs directly into `maximize`.
pub struct BaoCorrelationModel {
    /// Shared power-spectrum source.
    pub generator: Arc<CosmoGenerator>,
    /// Smooth-envelope method used for the dewiggling split.
    pub smoothing: SmoothingMethod,
    /// P(k) → ξ(s) transform strategy.
    pub pk2xi: PowerToCorrelation,
    /// Fixed parameters and the θ mapping over the free ones.
    pub param_map: ParamMap,
    /// Optimizer options used by [`BaoCorrelationModel::fit`].
    pub options: MLEOptions,
    /// Fit results (populated after `fit`).
    pub results: Option<OptimOutcome>,
    /// Fitted parameters (populated after `fit`).
    pub fitted_params: Option<BaoParams>,
    smooth_memo: Mutex<MemoCache<u64, (Array1<f64>, Array1<f64>)>>,
}

impl BaoCorrelationModel {
    /// Construct a model with the Gauss-Legendre transform strategy.
    ///
    /// # Arguments
    /// - `generator`: shared spectrum source; its wavenumber axis sizes the
    ///   transform.
    /// - `smoothing`: smooth-envelope method for the dewiggling split.
    /// - `param_map`: fixing table; free parameters become the fit's θ.
    /// - `options`: optimizer configuration for `fit`.
    ///
    /// # Errors
    /// - Propagates transform-construction failures as
    ///   [`CosmoError::TransformFailed`].
    pub fn new(
        generator: Arc<CosmoGenerator>, smoothing: SmoothingMethod, param_map: ParamMap,
        options: MLEOptions,
    ) -> CosmoResult<BaoCorrelationModel> {
        let pk2xi = PowerToCorrelation::gauss(generator.ks().view())?;
        Ok(Self::with_transform(generator, smoothing, pk2xi, param_map, options))
    }

    /// Construct a model with an explicit transform strategy.
    ///
    /// Lets callers swap the Gauss-Legendre default for the trapezoid
    /// strategy (or a differently tuned instance) without touching the
    /// rest of the model.
    pub fn with_transform(
        generator: Arc<CosmoGenerator>, smoothing: SmoothingMethod, pk2xi: PowerToCorrelation,
        param_map: ParamMap, options: MLEOptions,
    ) -> BaoCorrelationModel {
        BaoCorrelationModel {
            generator,
            smoothing,
            pk2xi,
            param_map,
            options,
            results: None,
            fitted_params: None,
            smooth_memo: Mutex::new(MemoCache::new(SMOOTH_MEMO_CAPACITY)),
        }
    }

    /// The smooth envelope and wiggle ratio of the linear spectrum at `om`.
    ///
    /// ## Steps
    /// 1. On a memo hit for this exact `om`, return the stored pair.
    /// 2. Otherwise query the generator, smooth the linear spectrum with
    ///    the configured method, and form `ratio = pk_lin/pk_smooth − 1`.
    /// 3. Memoize and return `(pk_smooth, ratio)`.
    ///
    /// ## Returns
    /// Both arrays live on the generator's wavenumber axis. The ratio
    /// carries the BAO wiggles and tends to zero at the axis ends, which
    /// is what lets the damping factor erase the feature smoothly.
    ///
    /// ## Errors
    /// - Propagates generator failures (grid loading, invalid `om`).
    /// - [`CosmoError::TransformFailed`] if smoothing rejects the
    ///   spectrum.
    pub fn basic_power_spectrum(&self, om: f64) -> CosmoResult<(Array1<f64>, Array1<f64>)> {
        let key = om.to_bits();
        if let Some(pair) = self.lock_memo().get(&key) {
            return Ok(pair);
        }
        let slice = self.generator.get_data(om, None)?;
        let pk_smooth = self.smoothing.smooth(
            self.generator.ks().view(),
            slice.pk_linear.view(),
            om,
            self.generator.h0(),
            self.generator.omega_b(),
            self.generator.ns(),
        )?;
        let pk_ratio = &slice.pk_linear / &pk_smooth - 1.0;
        let pair = (pk_smooth, pk_ratio);
        self.lock_memo().insert(key, pair.clone());
        Ok(pair)
    }

    /// Model correlation function at separations `dist`.
    ///
    /// ## Steps
    /// 1. Split the spectrum at `params.om` via
    ///    [`BaoCorrelationModel::basic_power_spectrum`].
    /// 2. Re-damp the wiggles:
    ///    `pk = pk_smooth·(1 + ratio·exp(−(k·Σnl)²/2))`.
    /// 3. Transform to ξ at the dilated separations `α·dist`.
    /// 4. Apply bias and the broadband polynomial:
    ///    `ξ_model = b·ξ + a1/s² + a2/s + a3` on the undilated `dist`.
    ///
    /// ## Arguments
    /// - `dist`: separations, Mpc/h; finite and strictly positive.
    /// - `params`: model-space parameters, typically from
    ///   [`ParamMap::from_theta`].
    ///
    /// ## Returns
    /// - The model ξ at `dist`, one value per separation.
    ///
    /// ## Errors
    /// - Dataset errors for an invalid `dist`.
    /// - Propagates spectrum and transform failures.
    pub fn compute_correlation_function(
        &self, dist: ArrayView1<f64>, params: &BaoParams,
    ) -> CosmoResult<Array1<f64>> {
        validate_separations(dist)?;
        let (pk_smooth, pk_ratio) = self.basic_power_spectrum(params.om)?;
        let ks = self.generator.ks();
        let sigma_sq = params.sigma_nl * params.sigma_nl;
        let pk_dewiggled = Zip::from(&pk_smooth).and(&pk_ratio).and(ks).map_collect(
            |&smooth, &ratio, &k| smooth * (1.0 + ratio * (-0.5 * k * k * sigma_sq).exp()),
        );
        let scaled = dist.mapv(|d| d * params.alpha);
        let xi = self.pk2xi.transform(ks.view(), pk_dewiggled.view(), scaled.view())?;
        let model = Zip::from(&xi).and(dist).map_collect(|&xi_s, &d| {
            params.bias * xi_s + params.a1 / (d * d) + params.a2 / d + params.a3
        });
        Ok(model)
    }

    /// Gaussian log-likelihood of `data` under `params`.
    ///
    /// Computes `−(ξ_model − ξ)ᵀ·icov·(ξ_model − ξ)/2`. The χ² statistic
    /// used for goodness of fit is exactly `−2` times this value.
    pub fn log_likelihood(&self, params: &BaoParams, data: &CorrelationData) -> CosmoResult<f64> {
        let model = self.compute_correlation_function(data.ss.view(), params)?;
        let diff = &model - &data.xi;
        Ok(-0.5 * diff.dot(&data.icov.dot(&diff)))
    }

    /// Fit the free parameters by maximum likelihood (consumes `theta0`)
    /// and cache the results.
    ///
    /// ## Steps
    /// 1. Run L-BFGS per `self.options`, **moving** `theta0` into the
    ///    executor; the gradient comes from finite differences.
    /// 2. Map `theta_hat` to model space via [`ParamMap::from_theta`].
    /// 3. Store the outcome in `self.results` and the model-space snapshot
    ///    in `self.fitted_params`.
    ///
    /// ## Arguments
    /// - `theta0`: initial optimizer vector, one entry per free parameter;
    ///   [`ParamMap::default_theta`] is the standard starting point.
    /// - `data`: measured correlation dataset.
    ///
    /// ## Returns
    /// - `Ok(())` on success; `self.results` and `self.fitted_params` are
    ///   populated.
    ///
    /// ## Notes
    /// - Fixed parameters never enter θ; they are reinserted on every
    ///   likelihood evaluation.
    /// - `self.results.theta_hat` is retained for warm starts.
    pub fn fit(&mut self, theta0: Theta, data: &CorrelationData) -> CosmoResult<()> {
        let outcome = maximize(self, theta0, data, &self.options)?;
        let params = self.param_map.from_theta(outcome.theta_hat.view())?;
        self.fitted_params = Some(params);
        self.results = Some(outcome);
        Ok(())
    }

    /// Standard errors of the free parameters at the fitted optimum.
    ///
    /// ## Steps
    /// 1. Require a previous [`BaoCorrelationModel::fit`].
    /// 2. Differentiate the negative log-likelihood around `theta_hat`
    ///    with central finite differences.
    /// 3. Invert the observed information into classical standard errors.
    ///
    /// ## Returns
    /// - One standard error per free parameter, in θ slot order.
    ///
    /// ## Errors
    /// - [`CosmoError::NotFitted`] before a fit.
    /// - Domain failures raised inside the differentiation (spectrum or
    ///   transform errors) surface as themselves, not as a curvature
    ///   failure.
    /// - [`CosmoError::OptimizationFailed`] if the observed information
    ///   cannot be inverted.
    pub fn standard_errors(&self, data: &CorrelationData) -> CosmoResult<Array1<f64>> {
        let outcome = self.results.as_ref().ok_or(CosmoError::NotFitted)?;
        let failure: RefCell<Option<CosmoError>> = RefCell::new(None);
        let neg_loglik = |theta: &Array1<f64>| -> f64 {
            let result = self
                .param_map
                .from_theta(theta.view())
                .and_then(|params| self.log_likelihood(&params, data));
            match result {
                Ok(value) => -value,
                Err(e) => {
                    let mut slot = failure.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                    f64::NAN
                }
            }
        };
        let score = |theta: &Array1<f64>| -> Array1<f64> { theta.central_diff(&neg_loglik) };
        let ses = calc_standard_errors(&score, &outcome.theta_hat);
        if let Some(e) = failure.borrow_mut().take() {
            return Err(e);
        }
        Ok(ses?)
    }

    /// Goodness-of-fit p-value of the fitted model against `data`.
    ///
    /// ## Steps
    /// 1. Require a previous fit and `data.len() > n_free`.
    /// 2. Recompute `χ² = −2·ℓ(fitted_params; data)`.
    /// 3. Return the upper-tail probability of a χ² distribution with
    ///    `data.len() − n_free` degrees of freedom.
    ///
    /// ## Returns
    /// - A p-value in `[0, 1]`; small values flag a poor fit.
    ///
    /// ## Errors
    /// - [`CosmoError::NotFitted`] before a fit.
    /// - [`CosmoError::InsufficientDegreesOfFreedom`] when the dataset is
    ///   no larger than the free-parameter count.
    pub fn gof_pvalue(&self, data: &CorrelationData) -> CosmoResult<f64> {
        let params = self.fitted_params.ok_or(CosmoError::NotFitted)?;
        let n_points = data.len();
        let n_free = self.param_map.n_free();
        if n_points <= n_free {
            return Err(CosmoError::InsufficientDegreesOfFreedom { n_points, n_free });
        }
        let chi_sq = -2.0 * self.log_likelihood(&params, data)?;
        let dof = (n_points - n_free) as f64;
        let dist = ChiSquared::new(dof)
            .map_err(|_| CosmoError::InsufficientDegreesOfFreedom { n_points, n_free })?;
        Ok(1.0 - dist.cdf(chi_sq))
    }

    /// Number of memoized smooth-spectrum splits currently held.
    pub fn memo_len(&self) -> usize {
        self.lock_memo().len()
    }

    fn lock_memo(&self) -> MutexGuard<'_, MemoCache<u64, (Array1<f64>, Array1<f64>)>> {
        match self.smooth_memo.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl fmt::Debug for BaoCorrelationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaoCorrelationModel")
            .field("generator", &self.generator.fingerprint())
            .field("smoothing", &self.smoothing)
            .field("free", &self.param_map.free_names())
            .field("fitted", &self.results.is_some())
            .finish()
    }
}

impl LogLikelihood for BaoCorrelationModel {
    type Data = CorrelationData;

    /// Log-likelihood evaluation at optimizer vector `θ`.
    ///
    /// # Steps
    /// 1. Map `θ` to model space via [`ParamMap::from_theta`] (fixed
    ///    parameters reinserted, free ones squashed into their boxes).
    /// 2. Evaluate the Gaussian log-likelihood of `data`.
    ///
    /// # Arguments
    /// - `theta`: optimizer vector, one entry per free parameter.
    /// - `data`: measured correlation dataset.
    ///
    /// # Returns
    /// - Scalar log-likelihood `ℓ(θ)`.
    ///
    /// # Errors
    /// - Cosmology-side failures converted into their optimizer-facing
    ///   counterparts.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost> {
        let params = self.param_map.from_theta(theta.view())?;
        Ok(self.log_likelihood(&params, data)?)
    }

    /// Validate an optimizer vector `θ` before the run starts.
    ///
    /// # Behavior
    /// - Checks `θ.len()` against the number of free parameters.
    /// - Ensures all entries are finite.
    ///
    /// # Returns
    /// - `Ok(())` if valid, error otherwise.
    fn check(&self, theta: &Theta, _data: &Self::Data) -> OptResult<()> {
        self.param_map.validate_theta(theta.view())?;
        Ok(())
    }
}

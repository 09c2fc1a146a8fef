//! rust_cosmology — BAO analysis pipeline core with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the cosmology pipeline to Python via the `_rust_cosmology`
//! extension module. When the `python-bindings` feature is enabled, this
//! module defines the Python-facing classes and submodules used by the
//! `rust_cosmology` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`cosmology`, `transform`,
//!   `optimization`, `inference`) as the public crate surface.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for
//!   the `_rust_cosmology` Python extension.
//! - Create the `power_spectra` and `bao_models` submodules and register
//!   them under `rust_cosmology` so dotted imports resolve from Python.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work is implemented in the inner Rust modules;
//!   this file performs only FFI glue, input validation, and error
//!   mapping.
//! - When `python-bindings` is enabled, the Python-visible types mirror
//!   the invariants and signatures of their Rust counterparts (e.g.
//!   `BaoCorrelationModel`, `CosmoGenerator`).
//! - Once a Python object has converted cleanly into its Rust type, the
//!   core-module invariants hold for it from that point on.
//!
//! Conventions
//! -----------
//! - Python-exposed classes live under `_rust_cosmology.<submodule>` and
//!   are typically wrapped by thin pure-Python facades in the top-level
//!   `rust_cosmology` package.
//! - Units and statistical conventions follow the documentation of the
//!   underlying Rust modules (`cosmology`, `transform`, etc.):
//!   wavenumbers in h/Mpc, separations in Mpc/h, r_drag in Mpc.
//! - Errors from core Rust code are propagated as rich error types
//!   internally and converted to `PyErr` values at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should usually depend directly on the inner modules
//!   and can ignore the PyO3 items guarded by the `python-bindings`
//!   feature.
//! - The Python packaging layer imports the `_rust_cosmology` module
//!   defined here and wraps its classes in user-facing Python APIs.
//! - External users are expected to interact with either the safe Rust
//!   APIs or the pure-Python wrappers; the PyO3 plumbing is considered
//!   internal.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner
//!   modules and by the crate-level integration tests that exercise the
//!   grid → transform → fit pipeline.
//! - Smoke tests for the PyO3 bindings verify that classes can be
//!   constructed, called, and round-tripped correctly from Python.

pub mod cosmology;
pub mod inference;
pub mod optimization;
pub mod transform;
pub mod utils;

#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use std::sync::Arc;

#[cfg(feature = "python-bindings")]
use crate::{
    cosmology::{
        errors::CosmoError,
        generator::CosmoGenerator,
        models::{correlation::BaoCorrelationModel, params::BaoParams},
    },
    optimization::loglik_optimizer::OptimOutcome,
    utils::{
        build_bao_model, extract_correlation_data, extract_f64_array, extract_generator_config,
    },
};

/// PowerSpectrumGrid — Python-facing wrapper for the cached spectrum source.
///
/// Purpose
/// -------
/// Expose [`CosmoGenerator`] to Python callers: a lazily loaded, disk-cached
/// grid of solver outputs answering interpolated point queries in
/// (Ωm, h0).
///
/// Key behaviors
/// -------------
/// - Build a generator configuration from Python-friendly arguments and
///   own the generator behind an `Arc` so models can share it.
/// - Answer `get_data(om, h0=None)` queries with the sound horizon and the
///   linear / non-linear spectra on the shared wavenumber axis.
/// - Expose the wavenumber axis and cache identity as read-only
///   properties.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `PowerSpectrumGrid(data_dir, z, om_resolution=None, ...)`:
/// - `data_dir`: `str`
///   Directory holding cached grid files; created on first generation.
/// - `z`: `float`
///   Target redshift of the linear spectrum rows.
/// - `om_resolution`, `h0_resolution`: `Option<usize>`
///   Grid axis sizes; default to the standard 101 × 1 layout.
/// - `h0`, `ob`, `ns`: `Option<f64>`
///   Reference cosmology; default to the standard configuration.
/// - `allow_generate`: `Option<bool>`
///   Whether a cache miss may trigger grid generation (default `True`).
/// - `memo_capacity`: `Option<usize>`
///   Point-query memo capacity (default 512).
/// - `clamp`: `Option<bool>`
///   Clamp out-of-grid queries to the edges instead of extrapolating.
/// - `parallel`: `Option<bool>`
///   Generate grid cells across a thread pool.
///
/// Fields
/// ------
/// - `inner`: `Arc<CosmoGenerator>`
///   Shared generator; cloned cheaply into every model built from it.
///
/// Invariants
/// ----------
/// - `inner` is always a well-formed generator created through a validated
///   [`GeneratorConfig`]; equal parameters map to the same cache file.
///
/// Performance
/// -----------
/// - The first query pays for grid loading or generation; subsequent
///   queries are bilinear interpolation plus memo lookups.
///
/// Notes
/// -----
/// - Native Rust callers should use [`CosmoGenerator`] directly; this type
///   exists solely for the PyO3 binding surface.
///
/// [`GeneratorConfig`]: crate::cosmology::core::options::GeneratorConfig
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_cosmology.power_spectra")]
pub struct PowerSpectrumGrid {
    /// Shared underlying generator.
    pub inner: Arc<CosmoGenerator>,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PowerSpectrumGrid {
    #[new]
    #[pyo3(
        signature = (
            data_dir,
            z,
            om_resolution = None,
            h0_resolution = None,
            h0 = None,
            ob = None,
            ns = None,
            allow_generate = None,
            memo_capacity = None,
            clamp = None,
            parallel = None,
        ),
        text_signature = "(data_dir, z, /, om_resolution=None, h0_resolution=None, h0=None, \
                          ob=None, ns=None, allow_generate=True, memo_capacity=512, \
                          clamp=False, parallel=False)"
    )]
    pub fn new(
        data_dir: &str, z: f64, om_resolution: Option<usize>, h0_resolution: Option<usize>,
        h0: Option<f64>, ob: Option<f64>, ns: Option<f64>, allow_generate: Option<bool>,
        memo_capacity: Option<usize>, clamp: Option<bool>, parallel: Option<bool>,
    ) -> PyResult<Self> {
        let config = extract_generator_config(
            data_dir,
            z,
            om_resolution,
            h0_resolution,
            h0,
            ob,
            ns,
            allow_generate,
            memo_capacity,
            clamp,
            parallel,
        )?;
        Ok(PowerSpectrumGrid { inner: Arc::new(CosmoGenerator::new(config)) })
    }

    /// Interpolated `(r_drag, pk_lin, pk_nl)` at `om` (and optionally `h0`).
    #[pyo3(signature = (om, h0 = None), text_signature = "(self, om, /, h0=None)")]
    pub fn get_data(&self, om: f64, h0: Option<f64>) -> PyResult<(f64, Vec<f64>, Vec<f64>)> {
        let slice = self.inner.get_data(om, h0)?;
        Ok((slice.sound_horizon, slice.pk_linear.to_vec(), slice.pk_nonlinear.to_vec()))
    }

    /// The shared wavenumber axis, h/Mpc.
    #[getter]
    pub fn ks(&self) -> Vec<f64> {
        self.inner.ks().to_vec()
    }

    /// Fingerprint identifying this grid's parameter set.
    #[getter]
    pub fn fingerprint(&self) -> String {
        self.inner.fingerprint()
    }

    /// True once the grid tensor is resident in memory.
    #[getter]
    pub fn loaded(&self) -> bool {
        self.inner.is_loaded()
    }
}

/// BaoModel — Python-facing wrapper for the BAO correlation-function model.
///
/// Purpose
/// -------
/// Expose the [`BaoCorrelationModel`] API to Python callers while
/// preserving the core Rust invariants and error handling.
///
/// Key behaviors
/// -------------
/// - Build a [`BaoCorrelationModel`] over a shared [`PowerSpectrumGrid`]
///   from Python-friendly arguments (smoothing method by name, fixed
///   parameters as (name, value) pairs, optimizer knobs).
/// - Provide `fit`, `correlation_function`, `standard_errors`, and
///   `gof_pvalue` methods that convert Python arrays into validated
///   datasets and delegate to the core implementation.
/// - Cache optimization and fitted-parameter results for inspection from
///   Python via property getters.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `BaoModel(grid, smoothing=None, fixed=None, ...)`:
/// - `grid`: [`PowerSpectrumGrid`]
///   Shared spectrum source; the model clones its `Arc`.
/// - `smoothing`: `Option<&str>`
///   Smooth-envelope method name (`"eh1998"` or `"hinton2017"`); defaults
///   to the Hinton 2017 fit.
/// - `fixed`: `Option<Vec<(String, f64)>>`
///   Parameters to pin, e.g. `[("om", 0.3121)]`; the rest stay free.
/// - `tol_grad`, `tol_cost`, `max_iter`, `line_searcher`, `lbfgs_mem`,
///   `verbose`
///   Optimizer tolerances and configuration used to build `MLEOptions`.
///
/// Fields
/// ------
/// - `inner`: [`BaoCorrelationModel`]
///   Fully configured model that owns the transform strategy, fixing
///   table, and cached results.
///
/// Invariants
/// ----------
/// - `inner` is always a well-formed model created through
///   [`build_bao_model`]; fixed values lie inside their boxes and the
///   transform matches the grid's wavenumber axis.
///
/// Performance
/// -----------
/// - Everything expensive happens inside `inner`; the wrapper only
///   converts inputs, dispatches, and maps errors.
///
/// Notes
/// -----
/// - Native Rust callers should usually work with [`BaoCorrelationModel`]
///   directly; this type exists solely for the PyO3 binding surface.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_cosmology.bao_models", unsendable)]
pub struct BaoModel {
    /// Underlying Rust correlation model.
    pub inner: BaoCorrelationModel,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl BaoModel {
    #[new]
    #[pyo3(
        signature = (
            grid,
            smoothing = None,
            fixed = None,
            tol_grad = None,
            tol_cost = None,
            max_iter = None,
            line_searcher = None,
            lbfgs_mem = None,
            verbose = None,
        ),
        text_signature = "(grid, /, smoothing=None, fixed=None, tol_grad=None, tol_cost=None, \
                          max_iter=None, line_searcher=None, lbfgs_mem=None, verbose=False)"
    )]
    pub fn new(
        grid: &PowerSpectrumGrid, smoothing: Option<&str>, fixed: Option<Vec<(String, f64)>>,
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
        line_searcher: Option<&str>, lbfgs_mem: Option<usize>, verbose: Option<bool>,
    ) -> PyResult<Self> {
        let inner = build_bao_model(
            Arc::clone(&grid.inner),
            smoothing,
            fixed,
            tol_grad,
            tol_cost,
            max_iter,
            line_searcher,
            lbfgs_mem,
            verbose,
        )?;
        Ok(BaoModel { inner })
    }

    #[pyo3(
        signature = (ss, xi, icov, theta0 = None),
        text_signature = "(self, ss, xi, icov, /, theta0=None)"
    )]
    pub fn fit<'py>(
        &mut self, py: Python<'py>, ss: &Bound<'py, PyAny>, xi: &Bound<'py, PyAny>,
        icov: &Bound<'py, PyAny>, theta0: Option<&Bound<'py, PyAny>>,
    ) -> PyResult<()> {
        let data = extract_correlation_data(py, ss, xi, icov)?;
        let theta_vec = match theta0 {
            Some(raw) => {
                let arr = extract_f64_array(py, raw)?;
                let slice = arr.as_slice().map_err(|_| {
                    PyValueError::new_err(
                        "theta0 must be a 1-D contiguous float64 array or sequence",
                    )
                })?;
                Array1::from(slice.to_vec())
            }
            None => self.inner.param_map.default_theta(),
        };
        self.inner.fit(theta_vec, &data)?;

        Ok(())
    }

    /// Model ξ at the fitted parameters, evaluated at `dist`.
    #[pyo3(signature = (dist,), text_signature = "(self, dist, /)")]
    pub fn correlation_function<'py>(
        &self, py: Python<'py>, dist: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<f64>> {
        let arr = extract_f64_array(py, dist)?;
        let slice = arr.as_slice().map_err(|_| {
            PyValueError::new_err("dist must be a 1-D contiguous float64 array or sequence")
        })?;
        let params = self.inner.fitted_params.ok_or(CosmoError::NotFitted)?;
        let dist_vec = Array1::from(slice.to_vec());
        let xi = self.inner.compute_correlation_function(dist_vec.view(), &params)?;
        Ok(xi.to_vec())
    }

    #[pyo3(signature = (ss, xi, icov), text_signature = "(self, ss, xi, icov, /)")]
    pub fn standard_errors<'py>(
        &self, py: Python<'py>, ss: &Bound<'py, PyAny>, xi: &Bound<'py, PyAny>,
        icov: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<f64>> {
        let data = extract_correlation_data(py, ss, xi, icov)?;
        let ses = self.inner.standard_errors(&data)?;
        Ok(ses.to_vec())
    }

    #[pyo3(signature = (ss, xi, icov), text_signature = "(self, ss, xi, icov, /)")]
    pub fn gof_pvalue<'py>(
        &self, py: Python<'py>, ss: &Bound<'py, PyAny>, xi: &Bound<'py, PyAny>,
        icov: &Bound<'py, PyAny>,
    ) -> PyResult<f64> {
        let data = extract_correlation_data(py, ss, xi, icov)?;
        Ok(self.inner.gof_pvalue(&data)?)
    }

    #[getter]
    pub fn results(&self) -> PyResult<BaoOptimOutcome> {
        match &self.inner.results {
            Some(outcome) => Ok(BaoOptimOutcome { inner: outcome.clone() }),
            None => Err(CosmoError::NotFitted.into()),
        }
    }

    #[getter]
    pub fn fitted_params(&self) -> PyResult<BaoFittedParams> {
        match self.inner.fitted_params {
            Some(params) => Ok(BaoFittedParams { inner: params }),
            None => Err(CosmoError::NotFitted.into()),
        }
    }

    /// Names of the free parameters, in optimizer slot order.
    #[getter]
    pub fn free_names(&self) -> Vec<String> {
        self.inner.param_map.free_names().iter().map(|name| name.to_string()).collect()
    }
}

/// BaoOptimOutcome — optimization outcome for a BAO model exposed to Python.
///
/// Purpose
/// -------
/// Present the key optimizer diagnostics from [`OptimOutcome`] to Python
/// code in a lightweight, read-only wrapper.
///
/// Key behaviors
/// -------------
/// - Carry the fitted vector `theta_hat` alongside the scalar
///   diagnostics: likelihood value, convergence flag, status string,
///   iteration count, and gradient norm.
/// - Every accessor copies or clones into a Python-owned container; the
///   wrapper itself stays read-only.
///
/// Parameters
/// ----------
/// Instances are constructed internally by the `BaoModel.results` getter
/// and are not created directly by user code.
///
/// Fields
/// ------
/// - `inner`: [`OptimOutcome`]
///   Complete result of the likelihood maximization.
///
/// Invariants
/// ----------
/// - `inner` reflects the most recent [`BaoCorrelationModel::fit`] on the
///   owning model.
///
/// Performance
/// -----------
/// - Accessors are O(n) only in the length of `theta_hat` and `fn_evals`
///   when cloning into Python; other fields are scalar copies.
///
/// Notes
/// -----
/// - Rust code should read [`OptimOutcome`] directly; this wrapper exists
///   for the Python FFI surface.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_cosmology.bao_models")]
pub struct BaoOptimOutcome {
    /// Wrapped optimizer result.
    pub inner: OptimOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl BaoOptimOutcome {
    #[getter]
    pub fn theta_hat(&self) -> Vec<f64> {
        self.inner.theta_hat.to_vec()
    }

    #[getter]
    pub fn value(&self) -> f64 {
        self.inner.value
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged
    }

    #[getter]
    pub fn status(&self) -> String {
        self.inner.status.clone()
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.iterations
    }

    #[getter]
    pub fn grad_norm(&self) -> Option<f64> {
        self.inner.grad_norm
    }

    #[getter]
    pub fn fn_evals(&self) -> Vec<(String, u64)> {
        self.inner.fn_evals.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }
}

/// BaoFittedParams — fitted model-space parameters for a BAO model.
///
/// Purpose
/// -------
/// Provide Python access to the model-space parameters obtained at the
/// fitted optimum of a [`BaoCorrelationModel`].
///
/// Key behaviors
/// -------------
/// - Expose `om`, `alpha`, `sigma_nl`, `b`, `a1`, `a2`, and `a3` as
///   copy-on-access properties for Python callers.
/// - Mirror the structure of [`BaoParams`] without exposing the θ mapping
///   to Python.
///
/// Parameters
/// ----------
/// Instances are constructed internally by the `BaoModel.fitted_params`
/// getter and are not created directly by user code.
///
/// Fields
/// ------
/// - `inner`: [`BaoParams`]
///   Model-space parameters corresponding to the last fitted model; every
///   value lies inside its box.
///
/// Invariants
/// ----------
/// - `inner` satisfies the box bounds documented on the parameter table.
///
/// Performance
/// -----------
/// - All getters are scalar copies.
///
/// Notes
/// -----
/// - Rust callers should use [`BaoParams`] directly; this wrapper exists
///   solely for the PyO3 binding.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_cosmology.bao_models")]
pub struct BaoFittedParams {
    pub inner: BaoParams,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl BaoFittedParams {
    #[getter]
    pub fn om(&self) -> f64 {
        self.inner.om
    }

    #[getter]
    pub fn alpha(&self) -> f64 {
        self.inner.alpha
    }

    #[getter]
    pub fn sigma_nl(&self) -> f64 {
        self.inner.sigma_nl
    }

    #[getter]
    pub fn b(&self) -> f64 {
        self.inner.bias
    }

    #[getter]
    pub fn a1(&self) -> f64 {
        self.inner.a1
    }

    #[getter]
    pub fn a2(&self) -> f64 {
        self.inner.a2
    }

    #[getter]
    pub fn a3(&self) -> f64 {
        self.inner.a3
    }
}

/// _rust_cosmology — PyO3 module initializer for the Python extension.
///
/// Purpose
/// -------
/// Define the `_rust_cosmology` Python module and register its submodules
/// used by the public `rust_cosmology` package.
///
/// Key behaviors
/// -------------
/// - Build the `power_spectra` and `bao_models` submodules and attach
///   them to the parent `_rust_cosmology` module.
/// - Insert both into `sys.modules` so `rust_cosmology.bao_models` style
///   imports resolve.
///
/// Parameters
/// ----------
/// - `_py`: [`Python`]
///   GIL token PyO3 supplies during module initialization.
/// - `m`: `&Bound<PyModule>`
///   The `_rust_cosmology` module being populated.
///
/// Returns
/// -------
/// `PyResult<()>`
///   `Ok(())` on success, or the Python exception raised during
///   registration.
///
/// Errors
/// ------
/// - `PyErr`
///   When submodule creation or the `sys.modules` insertion fails.
///
/// Panics
/// ------
/// - Never panics; every failure is mapped into a `PyErr`.
///
/// Notes
/// -----
/// - Python calls this on import of the compiled extension; user code
///   never invokes it.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_cosmology<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let power_spectra_mod = PyModule::new(_py, "power_spectra")?;
    let bao_models_mod = PyModule::new(_py, "bao_models")?;
    power_spectra(_py, m, &power_spectra_mod)?;
    bao_models(_py, m, &bao_models_mod)?;

    // Dotted imports only resolve once the submodules sit in sys.modules.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("rust_cosmology.power_spectra", power_spectra_mod)?;

    _py.import("sys")?
        .getattr("modules")?
        .set_item("rust_cosmology.bao_models", bao_models_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn power_spectra<'py>(
    _py: Python, rust_cosmology: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<PowerSpectrumGrid>()?;
    rust_cosmology.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn bao_models<'py>(
    _py: Python, rust_cosmology: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<BaoModel>()?;
    m.add_class::<BaoOptimOutcome>()?;
    m.add_class::<BaoFittedParams>()?;
    rust_cosmology.add_submodule(m)?;
    Ok(())
}

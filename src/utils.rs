#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use std::sync::Arc;

#[cfg(feature = "python-bindings")]
use crate::{
    cosmology::{
        core::{interpolation::ClampMode, options::GeneratorConfig, params::CosmoParams},
        errors::CosmoError,
        generator::CosmoGenerator,
        models::{correlation::BaoCorrelationModel, correlation::CorrelationData, params::ParamMap},
    },
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
    transform::smoothing::SmoothingMethod,
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1, PyReadonlyArray2,
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix<'py>(raw_data: &Bound<'py, PyAny>) -> PyResult<Array2<f64>> {
    if let Ok(mat_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        return Ok(mat_ro.as_array().to_owned());
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(frame_ro.as_array().to_owned());
        }
    }

    let rows: Vec<Vec<f64>> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 2-D numpy.ndarray, pandas.DataFrame, or nested sequence of float64",
        )
    })?;
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|_| PyValueError::new_err("matrix rows must all have the same length"))
}

#[cfg(feature = "python-bindings")]
pub fn extract_correlation_data<'py>(
    py: Python<'py>, ss: &Bound<'py, PyAny>, xi: &Bound<'py, PyAny>, icov: &Bound<'py, PyAny>,
) -> PyResult<CorrelationData> {
    let ss_arr = extract_f64_array(py, ss)?;
    let ss_slice = ss_arr
        .as_slice()
        .map_err(|_| PyValueError::new_err("ss must be a 1-D contiguous float64 array or sequence"))?;
    let xi_arr = extract_f64_array(py, xi)?;
    let xi_slice = xi_arr
        .as_slice()
        .map_err(|_| PyValueError::new_err("xi must be a 1-D contiguous float64 array or sequence"))?;
    let icov_mat = extract_f64_matrix(icov)?;

    let data = CorrelationData::new(
        Array1::from(ss_slice.to_vec()),
        Array1::from(xi_slice.to_vec()),
        icov_mat,
    )?;
    Ok(data)
}

#[cfg(feature = "python-bindings")]
pub fn extract_generator_config(
    data_dir: &str, z: f64, om_resolution: Option<usize>, h0_resolution: Option<usize>,
    h0: Option<f64>, ob: Option<f64>, ns: Option<f64>, allow_generate: Option<bool>,
    memo_capacity: Option<usize>, clamp: Option<bool>, parallel: Option<bool>,
) -> PyResult<GeneratorConfig> {
    let defaults = CosmoParams::default();

    // CosmoParams::new -> CosmoResult -> PyErr
    let params = CosmoParams::new(
        z,
        om_resolution.unwrap_or(defaults.om_resolution),
        h0_resolution.unwrap_or(defaults.h0_resolution),
        h0.unwrap_or(defaults.h0),
        ob.unwrap_or(defaults.ob),
        ns.unwrap_or(defaults.ns),
    )?;

    let clamp_mode = if clamp.unwrap_or(false) { ClampMode::Clamp } else { ClampMode::Extrapolate };

    let config = GeneratorConfig::new(
        params,
        data_dir,
        allow_generate.unwrap_or(true),
        memo_capacity.unwrap_or(512),
        clamp_mode,
        parallel.unwrap_or(false),
    )?;
    Ok(config)
}

#[cfg(feature = "python-bindings")]
pub fn build_bao_model(
    generator: Arc<CosmoGenerator>, smoothing: Option<&str>, fixed: Option<Vec<(String, f64)>>,
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>, verbose: Option<bool>,
) -> PyResult<BaoCorrelationModel> {
    // Smoothing method by name, defaulting to the Hinton 2017 fit.
    let smoothing = extract_smoothing(smoothing)?;

    // Fixing table from (name, value) pairs.
    let mut param_map = ParamMap::new();
    if let Some(pairs) = fixed {
        for (name, value) in pairs {
            param_map.fix(&name, value)?;
        }
    }

    // Optimizer options.
    let options = extract_mle_opts(tol_grad, tol_cost, max_iter, line_searcher, lbfgs_mem, verbose)?;

    let model = BaoCorrelationModel::new(generator, smoothing, param_map, options)?;
    Ok(model)
}

#[cfg(feature = "python-bindings")]
fn extract_smoothing(method: Option<&str>) -> PyResult<SmoothingMethod> {
    match method {
        // SmoothingMethod::from_name -> TransformResult -> CosmoError -> PyErr
        Some(name) => Ok(SmoothingMethod::from_name(name).map_err(CosmoError::from)?),
        None => Ok(SmoothingMethod::default()),
    }
}

#[cfg(feature = "python-bindings")]
fn extract_mle_opts(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>, verbose: Option<bool>,
) -> PyResult<MLEOptions> {
    use std::str::FromStr;

    // With no stopping rule given, fall back to the crate defaults rather
    // than rejecting the configuration.
    let tols = if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
        MLEOptions::default().tols
    } else {
        // Tolerances::new -> OptResult -> CosmoError -> PyErr
        Tolerances::new(tol_grad, tol_cost, max_iter).map_err(CosmoError::from)?
    };

    // LineSearcher::from_str -> OptResult -> CosmoError -> PyErr
    let ls = match line_searcher {
        Some(name) => LineSearcher::from_str(name).map_err(CosmoError::from)?,
        None => LineSearcher::MoreThuente,
    };

    // MLEOptions::new -> OptResult -> CosmoError -> PyErr
    let opts = MLEOptions::new(tols, ls, verbose.unwrap_or(false), lbfgs_mem)
        .map_err(CosmoError::from)?;

    Ok(opts)
}

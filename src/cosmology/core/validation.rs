//! Cosmology validation helpers — reusable checks for parameters, grids, and
//! datasets.
//!
//! Purpose
//! -------
//! Centralize small, reusable validation routines used across the cosmology
//! stack. These helpers enforce basic sanity checks for defining parameters
//! (redshift, H0, Ωb, ns), grid resolutions, query inputs, and correlation
//! datasets, so higher-level constructors can fail fast with structured
//! errors.
//!
//! Key behaviors
//! -------------
//! - Validate scalar defining parameters and query inputs (finiteness,
//!   positivity).
//! - Validate grid resolutions (at least one point per axis).
//! - Validate dataset arrays (non-empty, finite) and separations (strictly
//!   positive).
//! - Validate the inverse covariance against the dataset size.
//!
//! Invariants & assumptions
//! ------------------------
//! - Separations are comoving distances in Mpc/h and must be strictly
//!   positive.
//! - The inverse covariance is a dense, square `n × n` matrix matching the
//!   number of data points; symmetry and positive-definiteness are the
//!   caller's responsibility.
//! - Out-of-grid query *values* are not rejected here; extrapolation is a
//!   documented behavior of the interpolation layer, not an input error.
//!
//! Conventions
//! -----------
//! - Indices are 0-based and follow the usual Rust/ndarray conventions.
//! - Validation functions return [`CosmoResult`] and never panic on invalid
//!   *inputs*; panics are reserved for programming errors elsewhere.
//! - This module contains no I/O and no logging; it only inspects numeric
//!   values and array shapes.
//!
//! Downstream usage
//! ----------------
//! - Call these helpers from constructors (`CosmoParams`, `GridShape`,
//!   `CorrelationData`, `CosmoGenerator`, etc.) to enforce documented
//!   invariants at the boundaries of the API.
//!
//! Testing notes
//! -------------
//! - Unit tests exercise each helper on representative valid and invalid
//!   inputs, including boundary cases (zeros, infinities, NaNs, off-by-one
//!   shape mismatches).
use crate::cosmology::errors::{CosmoError, CosmoResult};
use ndarray::{ArrayView1, ArrayView2};

/// Validate a scalar that must be finite and strictly positive.
///
/// Parameters
/// ----------
/// - `name`: `&'static str`
///   Parameter name used in the error payload (e.g., `"h0"`, `"om"`).
/// - `value`: `f64`
///   Candidate value. Must be finite and strictly > 0.
///
/// Returns
/// -------
/// `CosmoResult<f64>`
///   - `Ok(value)` if `value` is finite and strictly > 0.
///   - `Err(CosmoError::InvalidParameterRange)` otherwise.
///
/// Errors
/// ------
/// - `CosmoError::InvalidParameterRange`
///   - Returned if `value` is NaN, ±∞, or ≤ 0. The `reason` field explains
///     whether finiteness or positivity failed.
///
/// Panics
/// ------
/// - Never panics.
///
/// Notes
/// -----
/// - Used for H0, Ωb, ns, and for the (om, h0) coordinates of point queries.
///   Redshift is validated separately since z = 0 is legitimate.
///
/// Examples
/// --------
/// ```rust
/// # use rust_cosmology::cosmology::core::validation::validate_positive_scalar;
/// use rust_cosmology::cosmology::errors::CosmoError;
///
/// assert!(validate_positive_scalar("h0", 0.676).is_ok());
/// assert!(matches!(
///     validate_positive_scalar("h0", 0.0),
///     Err(CosmoError::InvalidParameterRange { .. })
/// ));
/// ```
pub fn validate_positive_scalar(name: &'static str, value: f64) -> CosmoResult<f64> {
    if !value.is_finite() {
        return Err(CosmoError::InvalidParameterRange {
            name,
            value,
            reason: "Value must be finite.",
        });
    }
    if value <= 0.0 {
        return Err(CosmoError::InvalidParameterRange {
            name,
            value,
            reason: "Value must be strictly positive.",
        });
    }
    Ok(value)
}

/// Validate a redshift (finite and non-negative).
///
/// Parameters
/// ----------
/// - `value`: `f64`
///   Candidate redshift. Must be finite and ≥ 0.
///
/// Returns
/// -------
/// `CosmoResult<f64>`
///   - `Ok(value)` if `value` is finite and ≥ 0.
///   - `Err(CosmoError::InvalidParameterRange)` otherwise.
///
/// Errors
/// ------
/// - `CosmoError::InvalidParameterRange`
///   - Returned if `value` is NaN, ±∞, or < 0.
///
/// Panics
/// ------
/// - Never panics.
///
/// Examples
/// --------
/// ```rust
/// # use rust_cosmology::cosmology::core::validation::validate_redshift;
/// use rust_cosmology::cosmology::errors::CosmoError;
///
/// assert!(validate_redshift(0.51).is_ok());
/// assert!(validate_redshift(0.0).is_ok());
/// assert!(matches!(
///     validate_redshift(-0.1),
///     Err(CosmoError::InvalidParameterRange { .. })
/// ));
/// ```
pub fn validate_redshift(value: f64) -> CosmoResult<f64> {
    if !value.is_finite() {
        return Err(CosmoError::InvalidParameterRange {
            name: "z",
            value,
            reason: "Redshift must be finite.",
        });
    }
    if value < 0.0 {
        return Err(CosmoError::InvalidParameterRange {
            name: "z",
            value,
            reason: "Redshift must be non-negative.",
        });
    }
    Ok(value)
}

/// Validate a grid resolution (at least one point).
///
/// Parameters
/// ----------
/// - `name`: `&'static str`
///   Resolution name used in the error payload (e.g., `"om_resolution"`).
/// - `value`: `usize`
///   Candidate resolution. Must be ≥ 1.
///
/// Returns
/// -------
/// `CosmoResult<usize>`
///   - `Ok(value)` if `value ≥ 1`.
///   - `Err(CosmoError::InvalidResolution)` otherwise.
///
/// Errors
/// ------
/// - `CosmoError::InvalidResolution`
///   - Returned if `value == 0`.
///
/// Panics
/// ------
/// - Never panics.
///
/// Examples
/// --------
/// ```rust
/// # use rust_cosmology::cosmology::core::validation::validate_resolution;
/// use rust_cosmology::cosmology::errors::CosmoError;
///
/// assert!(validate_resolution("om_resolution", 101).is_ok());
/// assert!(matches!(
///     validate_resolution("om_resolution", 0),
///     Err(CosmoError::InvalidResolution { .. })
/// ));
/// ```
pub fn validate_resolution(name: &'static str, value: usize) -> CosmoResult<usize> {
    if value == 0 {
        return Err(CosmoError::InvalidResolution {
            name,
            value,
            reason: "Each grid axis needs at least one point.",
        });
    }
    Ok(value)
}

/// Validate a dataset array (non-empty, all entries finite).
///
/// Parameters
/// ----------
/// - `name`: `&'static str`
///   Array name used in the error payload (e.g., `"ss"`, `"xi"`).
/// - `values`: `ArrayView1<'_, f64>`
///   Dataset array to inspect.
///
/// Returns
/// -------
/// `CosmoResult<()>`
///   - `Ok(())` if the array is non-empty and every entry is finite.
///   - `Err(CosmoError)` describing the first violation encountered.
///
/// Errors
/// ------
/// - `CosmoError::EmptyDataset`
///   - Returned if the array has no entries.
/// - `CosmoError::NonFiniteDataset`
///   - Returned if any entry is NaN or ±∞, with the offending index and
///     value.
///
/// Panics
/// ------
/// - Never panics.
///
/// Examples
/// --------
/// ```rust
/// # use rust_cosmology::cosmology::core::validation::validate_finite_array;
/// # use rust_cosmology::cosmology::errors::CosmoError;
/// use ndarray::array;
///
/// let xi = array![0.01, 0.005, -0.002];
/// assert!(validate_finite_array("xi", xi.view()).is_ok());
///
/// let bad = array![0.01, f64::NAN];
/// assert!(matches!(
///     validate_finite_array("xi", bad.view()),
///     Err(CosmoError::NonFiniteDataset { .. })
/// ));
/// ```
pub fn validate_finite_array(name: &'static str, values: ArrayView1<f64>) -> CosmoResult<()> {
    if values.is_empty() {
        return Err(CosmoError::EmptyDataset { name });
    }
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(CosmoError::NonFiniteDataset { name, index, value });
    }
    Ok(())
}

/// Validate separations (non-empty, finite, strictly positive).
///
/// Parameters
/// ----------
/// - `ss`: `ArrayView1<'_, f64>`
///   Comoving separations in Mpc/h. Every entry must be finite and
///   strictly > 0.
///
/// Returns
/// -------
/// `CosmoResult<()>`
///   - `Ok(())` if all entries are finite and strictly > 0.
///   - `Err(CosmoError)` describing the first violation encountered.
///
/// Errors
/// ------
/// - `CosmoError::EmptyDataset` if the array has no entries.
/// - `CosmoError::NonFiniteDataset` if any entry is NaN or ±∞.
/// - `CosmoError::NonPositiveSeparation` if any entry is ≤ 0, with the
///   offending index and value.
///
/// Panics
/// ------
/// - Never panics.
///
/// Notes
/// -----
/// - The polynomial nuisance terms divide by the separation, and both
///   transform strategies divide by it as well, so zero is rejected along
///   with negatives.
///
/// Examples
/// --------
/// ```rust
/// # use rust_cosmology::cosmology::core::validation::validate_separations;
/// # use rust_cosmology::cosmology::errors::CosmoError;
/// use ndarray::array;
///
/// let ss = array![30.0, 50.0, 100.0];
/// assert!(validate_separations(ss.view()).is_ok());
///
/// let bad = array![30.0, 0.0];
/// assert!(matches!(
///     validate_separations(bad.view()),
///     Err(CosmoError::NonPositiveSeparation { .. })
/// ));
/// ```
pub fn validate_separations(ss: ArrayView1<f64>) -> CosmoResult<()> {
    validate_finite_array("ss", ss)?;
    if let Some((index, &value)) = ss.iter().enumerate().find(|(_, v)| **v <= 0.0) {
        return Err(CosmoError::NonPositiveSeparation { index, value });
    }
    Ok(())
}

/// Validate two dataset arrays for equal length.
///
/// Parameters
/// ----------
/// - `name`: `&'static str`
///   Name of the array being checked against the reference length.
/// - `expected`: `usize`
///   Reference length (typically `ss.len()`).
/// - `found`: `usize`
///   Actual length of the named array.
///
/// Returns
/// -------
/// `CosmoResult<()>`
///   - `Ok(())` if the lengths agree.
///   - `Err(CosmoError::LengthMismatch)` otherwise.
///
/// Errors
/// ------
/// - `CosmoError::LengthMismatch` if `expected != found`.
///
/// Panics
/// ------
/// - Never panics.
///
/// Examples
/// --------
/// ```rust
/// # use rust_cosmology::cosmology::core::validation::validate_same_length;
/// # use rust_cosmology::cosmology::errors::CosmoError;
///
/// assert!(validate_same_length("xi", 85, 85).is_ok());
/// assert!(matches!(
///     validate_same_length("xi", 85, 84),
///     Err(CosmoError::LengthMismatch { .. })
/// ));
/// ```
pub fn validate_same_length(name: &'static str, expected: usize, found: usize) -> CosmoResult<()> {
    if expected != found {
        return Err(CosmoError::LengthMismatch { name, expected, found });
    }
    Ok(())
}

/// Validate the inverse covariance against the dataset size.
///
/// Parameters
/// ----------
/// - `icov`: `ArrayView2<'_, f64>`
///   Dense inverse covariance matrix.
/// - `n_points`: `usize`
///   Number of data points; `icov` must be `n_points × n_points`.
///
/// Returns
/// -------
/// `CosmoResult<()>`
///   - `Ok(())` if `icov` is square with side `n_points` and all entries
///     are finite.
///   - `Err(CosmoError)` describing the first violation encountered.
///
/// Errors
/// ------
/// - `CosmoError::CovarianceShapeMismatch` if `icov` is not
///   `n_points × n_points`.
/// - `CosmoError::NonFiniteDataset` if any entry is NaN or ±∞ (reported
///   with the row-major flat index).
///
/// Panics
/// ------
/// - Never panics.
///
/// Notes
/// -----
/// - Symmetry and positive-definiteness are not checked here; the χ²
///   likelihood only needs the quadratic form to be evaluable, and
///   callers typically obtain `icov` by inverting an estimated covariance
///   upstream.
///
/// Examples
/// --------
/// ```rust
/// # use rust_cosmology::cosmology::core::validation::validate_inverse_covariance;
/// # use rust_cosmology::cosmology::errors::CosmoError;
/// use ndarray::array;
///
/// let icov = array![[2.0, 0.0], [0.0, 2.0]];
/// assert!(validate_inverse_covariance(icov.view(), 2).is_ok());
/// assert!(matches!(
///     validate_inverse_covariance(icov.view(), 3),
///     Err(CosmoError::CovarianceShapeMismatch { .. })
/// ));
/// ```
pub fn validate_inverse_covariance(icov: ArrayView2<f64>, n_points: usize) -> CosmoResult<()> {
    let (rows, cols) = icov.dim();
    if rows != n_points || cols != n_points {
        return Err(CosmoError::CovarianceShapeMismatch { rows, cols, n_points });
    }
    if let Some((index, &value)) = icov.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(CosmoError::NonFiniteDataset { name: "icov", index, value });
    }
    Ok(())
}

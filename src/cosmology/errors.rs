//! Errors for the cosmology layer (generator configuration, cache I/O,
//! solver invocation, dataset validation, and model fitting).
//!
//! This module defines [`CosmoError`], the unified error type for the
//! generator/cache/model side of the crate, together with the [`CosmoResult`]
//! alias. Transform-engine failures ([`TransformError`]) and optimizer
//! failures ([`OptError`]) are folded into [`CosmoError`] at the call sites
//! where those layers meet this one.
//!
//! ## Conventions
//! - A cache miss with generation disabled surfaces as
//!   [`CosmoError::DataUnavailable`] naming the expected file path; it is
//!   never silently repaired by running the solver.
//! - Out-of-grid interpolation queries are **not** errors; point queries fail
//!   only on non-finite or non-positive inputs.
//! - Solver failures carry the offending grid cell (omch2, h0) and halt
//!   generation; nothing is retried.
//! - An unrecognized smoothing method name fails at construction time,
//!   before any spectra are computed.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::optimization::errors::OptError;
use crate::transform::errors::TransformError;

/// Crate-wide result alias for cosmology operations that may produce
/// [`CosmoError`].
pub type CosmoResult<T> = Result<T, CosmoError>;

/// Unified error type for the cosmology layer.
///
/// Covers defining-parameter and configuration validation, cache persistence,
/// solver invocation, dataset validation, and model fitting failures.
/// Implements `Display`/`Error` and converts to a Python `ValueError` at
/// PyO3 boundaries.
#[derive(Debug, Clone, PartialEq)]
pub enum CosmoError {
    // ---- Parameter / configuration validation ----
    /// A defining parameter or query input is outside its valid range.
    InvalidParameterRange { name: &'static str, value: f64, reason: &'static str },

    /// A grid resolution is invalid (zero, or otherwise unusable).
    InvalidResolution { name: &'static str, value: usize, reason: &'static str },

    /// A memoization capacity of zero cannot hold any entry.
    InvalidCapacity { value: usize },

    /// A smoothing method name was not recognized at configuration time.
    UnknownSmoothingMethod { name: String },

    // ---- Cache / persistence ----
    /// The cache file is missing and generation is disallowed.
    DataUnavailable { path: String },

    /// The cache file exists but could not be read or decoded.
    CacheRead { path: String, detail: String },

    /// The cache file could not be written.
    CacheWrite { path: String, detail: String },

    /// The cache file holds a tensor whose shape disagrees with the
    /// generator's expected shape (stale or corrupt cache).
    CacheShapeMismatch {
        path: String,
        expected: (usize, usize, usize),
        found: (usize, usize, usize),
    },

    // ---- Grid / tensor shape ----
    /// An in-memory tensor does not match the expected grid shape.
    GridShapeMismatch { expected: (usize, usize, usize), found: (usize, usize, usize) },

    /// An interpolated row cannot be split into (r_drag, pk_lin, pk_nl).
    RowLengthMismatch { expected: usize, found: usize },

    // ---- Solver ----
    /// The Boltzmann solver failed on one grid cell; generation halts.
    SolverFailure { omch2: f64, h0: f64, detail: String },

    // ---- Registry ----
    /// A generator with the same fingerprint is already registered.
    DuplicateFingerprint { fingerprint: String },

    // ---- Dataset validation ----
    /// Dataset array is empty.
    EmptyDataset { name: &'static str },

    /// Dataset array holds a NaN/±inf entry.
    NonFiniteDataset { name: &'static str, index: usize, value: f64 },

    /// Two dataset arrays disagree in length.
    LengthMismatch { name: &'static str, expected: usize, found: usize },

    /// The inverse covariance is not square with side `n_points`.
    CovarianceShapeMismatch { rows: usize, cols: usize, n_points: usize },

    /// A separation must be strictly positive.
    NonPositiveSeparation { index: usize, value: f64 },

    // ---- Model / fit ----
    /// A parameter name is not part of the model's parameter table.
    UnknownParameter { name: String },

    /// A fixed parameter value falls outside its box bounds.
    FixedValueOutOfBounds { name: &'static str, value: f64, min: f64, max: f64 },

    /// Optimizer vector length disagrees with the number of free parameters.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// Model hasn't been fitted yet.
    NotFitted,

    /// Goodness-of-fit needs more data points than free parameters.
    InsufficientDegreesOfFreedom { n_points: usize, n_free: usize },

    /// A transform-engine failure, folded in at the model boundary.
    TransformFailed { detail: String },

    /// Optimizer failed; includes a human-readable status/reason.
    OptimizationFailed { status: String },
}

impl std::error::Error for CosmoError {}

impl std::fmt::Display for CosmoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Parameter / configuration validation ----
            CosmoError::InvalidParameterRange { name, value, reason } => {
                write!(f, "Parameter '{name}' is out of range: {value}. {reason}")
            }
            CosmoError::InvalidResolution { name, value, reason } => {
                write!(f, "Resolution '{name}' is invalid: {value}. {reason}")
            }
            CosmoError::InvalidCapacity { value } => {
                write!(f, "Memoization capacity must be at least 1; got {value}.")
            }
            CosmoError::UnknownSmoothingMethod { name } => {
                write!(
                    f,
                    "Unrecognized smoothing method '{name}'; expected 'eh1998' or 'hinton2017'."
                )
            }
            // ---- Cache / persistence ----
            CosmoError::DataUnavailable { path } => {
                write!(
                    f,
                    "Power spectrum cache not found at '{path}' and generation is disallowed; \
                     pre-stage the file or enable generation."
                )
            }
            CosmoError::CacheRead { path, detail } => {
                write!(f, "Failed to read power spectrum cache '{path}': {detail}")
            }
            CosmoError::CacheWrite { path, detail } => {
                write!(f, "Failed to write power spectrum cache '{path}': {detail}")
            }
            CosmoError::CacheShapeMismatch { path, expected, found } => {
                write!(
                    f,
                    "Cache '{path}' holds a tensor of shape {found:?}, expected {expected:?} \
                     (stale or corrupt cache)."
                )
            }
            // ---- Grid / tensor shape ----
            CosmoError::GridShapeMismatch { expected, found } => {
                write!(f, "Grid tensor shape mismatch: expected {expected:?}, got {found:?}")
            }
            CosmoError::RowLengthMismatch { expected, found } => {
                write!(f, "Grid row length mismatch: expected {expected}, got {found}")
            }
            // ---- Solver ----
            CosmoError::SolverFailure { omch2, h0, detail } => {
                write!(f, "Boltzmann solver failed at cell (omch2 = {omch2}, h0 = {h0}): {detail}")
            }
            // ---- Registry ----
            CosmoError::DuplicateFingerprint { fingerprint } => {
                write!(f, "A generator with fingerprint '{fingerprint}' is already registered.")
            }
            // ---- Dataset validation ----
            CosmoError::EmptyDataset { name } => {
                write!(f, "Dataset array '{name}' is empty.")
            }
            CosmoError::NonFiniteDataset { name, index, value } => {
                write!(f, "Dataset array '{name}' has a non-finite entry at index {index}: {value}")
            }
            CosmoError::LengthMismatch { name, expected, found } => {
                write!(f, "Dataset array '{name}' length mismatch: expected {expected}, got {found}")
            }
            CosmoError::CovarianceShapeMismatch { rows, cols, n_points } => {
                write!(
                    f,
                    "Inverse covariance must be {n_points}x{n_points} to match the separations; \
                     got {rows}x{cols}."
                )
            }
            CosmoError::NonPositiveSeparation { index, value } => {
                write!(f, "Separation at index {index} must be strictly positive; got {value}")
            }
            // ---- Model / fit ----
            CosmoError::UnknownParameter { name } => {
                write!(f, "Unknown model parameter '{name}'.")
            }
            CosmoError::FixedValueOutOfBounds { name, value, min, max } => {
                write!(
                    f,
                    "Fixed value for parameter '{name}' is outside its bounds [{min}, {max}]: {value}"
                )
            }
            CosmoError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, got {actual}")
            }
            CosmoError::NotFitted => {
                write!(f, "Model hasn't been fitted yet.")
            }
            CosmoError::InsufficientDegreesOfFreedom { n_points, n_free } => {
                write!(
                    f,
                    "Goodness-of-fit needs n_points > n_free; got {n_points} points with \
                     {n_free} free parameters."
                )
            }
            CosmoError::TransformFailed { detail } => {
                write!(f, "Power-to-correlation transform failed: {detail}")
            }
            CosmoError::OptimizationFailed { status } => {
                write!(f, "Optimizer failed with status: {status}")
            }
        }
    }
}

/// Convert a [`CosmoError`] into a Python `ValueError` with the error message.
///
/// Used at the Rust↔Python boundary to surface domain errors cleanly.
#[cfg(feature = "python-bindings")]
impl From<CosmoError> for PyErr {
    fn from(err: CosmoError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

impl From<TransformError> for CosmoError {
    fn from(err: TransformError) -> CosmoError {
        match err {
            TransformError::UnknownSmoothingMethod { name } => {
                CosmoError::UnknownSmoothingMethod { name }
            }
            other => CosmoError::TransformFailed { detail: other.to_string() },
        }
    }
}

impl From<OptError> for CosmoError {
    fn from(err: OptError) -> CosmoError {
        match err {
            OptError::DataUnavailable { path } => CosmoError::DataUnavailable { path },
            OptError::SolverFailure { omch2, h0, detail } => {
                CosmoError::SolverFailure { omch2, h0, detail }
            }
            OptError::TransformFailed { detail } => CosmoError::TransformFailed { detail },
            OptError::ThetaLengthMismatch { expected, actual } => {
                CosmoError::ThetaLengthMismatch { expected, actual }
            }
            other => CosmoError::OptimizationFailed { status: other.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `Display` formatting for representative CosmoError variants.
    // - Embedding of payload values (paths, shapes, parameter names) into
    //   error messages.
    // - Folding of transform-layer errors into CosmoError.
    //
    // They intentionally DO NOT cover:
    // - The `From<CosmoError> for PyErr` conversion, since exercising it
    //   requires linking against the Python C API and is better handled
    //   by Python-level tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that `DataUnavailable` names the expected cache path so the
    // operator knows which file to pre-stage.
    //
    // Given
    // -----
    // - A `DataUnavailable` error with a known path.
    //
    // Expect
    // ------
    // - The display message contains the path.
    fn data_unavailable_names_expected_path() {
        // Arrange
        let err = CosmoError::DataUnavailable { path: "data/cosmo_510_101_1_6760_481_970.npy".into() };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(
            msg.contains("cosmo_510_101_1_6760_481_970.npy"),
            "Display message should include the cache path.\nGot: {msg}"
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify that `CacheShapeMismatch` reports both the expected and the
    // found tensor shapes.
    //
    // Given
    // -----
    // - A mismatch between (101, 1, 6001) and (51, 1, 6001).
    //
    // Expect
    // ------
    // - The display message contains both shape triples.
    fn cache_shape_mismatch_reports_both_shapes() {
        // Arrange
        let err = CosmoError::CacheShapeMismatch {
            path: "data/cosmo.npy".into(),
            expected: (101, 1, 6001),
            found: (51, 1, 6001),
        };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(
            msg.contains("(101, 1, 6001)") && msg.contains("(51, 1, 6001)"),
            "Display message should include expected and found shapes.\nGot: {msg}"
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify that `SolverFailure` carries the offending grid cell.
    //
    // Given
    // -----
    // - A solver failure at omch2 = 0.125, h0 = 0.676.
    //
    // Expect
    // ------
    // - The display message contains both cell coordinates.
    fn solver_failure_reports_grid_cell() {
        // Arrange
        let err = CosmoError::SolverFailure {
            omch2: 0.125,
            h0: 0.676,
            detail: "negative matter density".into(),
        };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(
            msg.contains("0.125") && msg.contains("0.676"),
            "Display message should include the grid cell.\nGot: {msg}"
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify that an unknown smoothing method travelling up from the
    // transform layer keeps its dedicated variant instead of collapsing
    // into the generic transform-failure bucket.
    //
    // Given
    // -----
    // - A `TransformError::UnknownSmoothingMethod` for method "spline_q".
    //
    // Expect
    // ------
    // - Conversion yields `CosmoError::UnknownSmoothingMethod` with the
    //   same name.
    fn unknown_smoothing_method_survives_tier_conversion() {
        // Arrange
        let err = TransformError::UnknownSmoothingMethod { name: "spline_q".into() };

        // Act
        let converted = CosmoError::from(err);

        // Assert
        assert_eq!(
            converted,
            CosmoError::UnknownSmoothingMethod { name: "spline_q".into() },
            "Unknown smoothing method should map to its dedicated variant."
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify that a generic transform failure folds into `TransformFailed`
    // and keeps the message of the source error.
    //
    // Given
    // -----
    // - A `TransformError::InvalidDamping` with a negative damping scale.
    //
    // Expect
    // ------
    // - Conversion yields `CosmoError::TransformFailed` whose detail embeds
    //   the offending value.
    fn generic_transform_error_folds_into_transform_failed() {
        // Arrange
        let err = TransformError::InvalidDamping { value: -0.25 };

        // Act
        let converted = CosmoError::from(err);

        // Assert
        match converted {
            CosmoError::TransformFailed { detail } => {
                assert!(
                    detail.contains("-0.25"),
                    "Detail should embed the offending damping value.\nGot: {detail}"
                );
            }
            other => panic!("Expected TransformFailed, got {other:?}"),
        }
    }
}

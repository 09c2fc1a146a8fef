//! Errors for the power-spectrum transform engine (strategies, spline,
//! smoothing).
//!
//! Defines [`TransformError`] and the [`TransformResult`] alias used by the
//! correlation-function strategies, the cubic spline, and the smoothing
//! methods. Configuration errors (invalid knobs, unknown method names) are
//! separated from numerical failures so callers can fail fast at
//! construction time.
//!
//! ## Conventions
//! - Wavenumber grids must be strictly ascending, strictly positive, and
//!   finite; power spectra must be finite (and strictly positive where a
//!   logarithm is taken).
//! - Separations handed to `transform` must be strictly positive and finite.
//! - Strategy and smoothing constructors validate all numeric knobs up
//!   front; `transform`/`smooth` never re-validate configuration.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for transform-engine operations that may produce
/// [`TransformError`].
pub type TransformResult<T> = Result<T, TransformError>;

/// Error type for the power-to-correlation transform engine.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformError {
    // ---- Input validation ----
    /// Input array is empty.
    EmptyInput { name: &'static str },

    /// Two input arrays disagree in length.
    LengthMismatch { expected: usize, actual: usize },

    /// An input array holds a NaN/±inf entry.
    NonFiniteInput { name: &'static str, index: usize, value: f64 },

    /// An input array must be strictly ascending but is not at `index`.
    NotAscending { name: &'static str, index: usize },

    /// An input value must be strictly positive.
    NonPositiveInput { name: &'static str, index: usize, value: f64 },

    /// Too few points for the requested operation.
    InsufficientPoints { needed: usize, actual: usize },

    // ---- Configuration validation ----
    /// Oversampling factor must be at least 1.
    InvalidDetail { value: usize },

    /// Gaussian damping scale must be finite and > 0.
    InvalidDamping { value: f64 },

    /// Quadrature step must be finite and > 0.
    InvalidStep { value: f64 },

    /// Quadrature node count must be at least 1.
    InvalidNodeCount { value: usize },

    /// Polynomial degree is unusable for the smoothing fit.
    InvalidDegree { value: usize, reason: &'static str },

    /// A smoothing weight knob is outside its valid range.
    InvalidWeight { name: &'static str, value: f64, reason: &'static str },

    /// A smoothing method name was not recognized.
    UnknownSmoothingMethod { name: String },

    // ---- Numerical failures ----
    /// The weighted least-squares smoothing fit did not converge.
    SmoothingFitFailed { detail: String },
}

impl std::error::Error for TransformError {}

impl std::fmt::Display for TransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input validation ----
            TransformError::EmptyInput { name } => {
                write!(f, "Input array '{name}' is empty.")
            }
            TransformError::LengthMismatch { expected, actual } => {
                write!(f, "Input length mismatch: expected {expected}, got {actual}")
            }
            TransformError::NonFiniteInput { name, index, value } => {
                write!(f, "Input '{name}' has a non-finite entry at index {index}: {value}")
            }
            TransformError::NotAscending { name, index } => {
                write!(f, "Input '{name}' must be strictly ascending; violated at index {index}.")
            }
            TransformError::NonPositiveInput { name, index, value } => {
                write!(
                    f,
                    "Input '{name}' must be strictly positive; index {index} has value {value}"
                )
            }
            TransformError::InsufficientPoints { needed, actual } => {
                write!(f, "Need at least {needed} points; got {actual}.")
            }
            // ---- Configuration validation ----
            TransformError::InvalidDetail { value } => {
                write!(f, "Interpolation detail must be at least 1; got {value}.")
            }
            TransformError::InvalidDamping { value } => {
                write!(f, "Damping scale must be finite and > 0; got {value}.")
            }
            TransformError::InvalidStep { value } => {
                write!(f, "Quadrature step must be finite and > 0; got {value}.")
            }
            TransformError::InvalidNodeCount { value } => {
                write!(f, "Quadrature node count must be at least 1; got {value}.")
            }
            TransformError::InvalidDegree { value, reason } => {
                write!(f, "Polynomial degree {value} is unusable: {reason}")
            }
            TransformError::InvalidWeight { name, value, reason } => {
                write!(f, "Smoothing knob '{name}' is out of range: {value}. {reason}")
            }
            TransformError::UnknownSmoothingMethod { name } => {
                write!(
                    f,
                    "Unrecognized smoothing method '{name}'; expected 'eh1998' or 'hinton2017'."
                )
            }
            // ---- Numerical failures ----
            TransformError::SmoothingFitFailed { detail } => {
                write!(f, "Smoothing fit failed: {detail}")
            }
        }
    }
}

/// Convert a [`TransformError`] into a Python `ValueError` with the error
/// message.
#[cfg(feature = "python-bindings")]
impl From<TransformError> for PyErr {
    fn from(err: TransformError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `Display` formatting for representative TransformError variants.
    // - Embedding of payload values into error messages.
    //
    // They intentionally DO NOT cover:
    // - The PyErr conversion (needs the Python C API; covered by
    //   Python-level tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that `NotAscending` names the offending array and index.
    //
    // Given
    // -----
    // - A `NotAscending` error for array "ks" at index 7.
    //
    // Expect
    // ------
    // - The display message contains "ks" and "7".
    fn not_ascending_names_array_and_index() {
        // Arrange
        let err = TransformError::NotAscending { name: "ks", index: 7 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(
            msg.contains("ks") && msg.contains('7'),
            "Display message should name the array and index.\nGot: {msg}"
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify that `UnknownSmoothingMethod` embeds the rejected name and
    // lists the known methods.
    //
    // Given
    // -----
    // - An `UnknownSmoothingMethod` error for method "boxcar".
    //
    // Expect
    // ------
    // - The display message contains "boxcar" and both known names.
    fn unknown_smoothing_method_lists_known_names() {
        // Arrange
        let err = TransformError::UnknownSmoothingMethod { name: "boxcar".into() };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(
            msg.contains("boxcar") && msg.contains("eh1998") && msg.contains("hinton2017"),
            "Display message should embed the rejected name and the known methods.\nGot: {msg}"
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify that `InsufficientPoints` reports both the requirement and
    // the actual count.
    //
    // Given
    // -----
    // - An `InsufficientPoints` error needing 4 points with 2 given.
    //
    // Expect
    // ------
    // - The display message contains "4" and "2".
    fn insufficient_points_reports_requirement_and_actual() {
        // Arrange
        let err = TransformError::InsufficientPoints { needed: 4, actual: 2 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(
            msg.contains('4') && msg.contains('2'),
            "Display message should include needed and actual counts.\nGot: {msg}"
        );
    }
}

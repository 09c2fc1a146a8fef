//! Input validation shared by the transform strategies and smoothing.
//!
//! Purpose
//! -------
//! Centralize the checks every transform entry point runs on its inputs:
//! wavenumber grids, tabulated spectra, and separation arrays. Validators
//! return `TransformResult<()>` and report the first offending index, so
//! call sites can use `?` and otherwise assume well-formed arrays.
//!
//! Conventions
//! -----------
//! - Wavenumber grids must be nonempty, finite, strictly positive, and
//!   strictly ascending.
//! - Spectra must be finite and the same length as their grid; positivity
//!   is a per-method concern (log-space fits check it themselves).
//! - Separations must be nonempty, finite, and strictly positive.
use crate::transform::errors::{TransformError, TransformResult};
use ndarray::ArrayView1;

/// Validate a wavenumber grid: nonempty, finite, strictly positive, and
/// strictly ascending.
///
/// Errors
/// ------
/// - `TransformError::EmptyInput` if `ks` has no entries.
/// - `TransformError::NonFiniteInput` at the first NaN/±inf entry.
/// - `TransformError::NonPositiveInput` at the first entry ≤ 0.
/// - `TransformError::NotAscending` at the first non-increasing step.
pub fn validate_wavenumbers(ks: ArrayView1<f64>) -> TransformResult<()> {
    if ks.is_empty() {
        return Err(TransformError::EmptyInput { name: "ks" });
    }
    for (index, &value) in ks.iter().enumerate() {
        if !value.is_finite() {
            return Err(TransformError::NonFiniteInput { name: "ks", index, value });
        }
        if value <= 0.0 {
            return Err(TransformError::NonPositiveInput { name: "ks", index, value });
        }
        if index > 0 && value <= ks[index - 1] {
            return Err(TransformError::NotAscending { name: "ks", index });
        }
    }
    Ok(())
}

/// Validate a `(ks, pk)` pair: a valid wavenumber grid plus a finite
/// spectrum of matching length.
///
/// Errors
/// ------
/// - Everything [`validate_wavenumbers`] reports.
/// - `TransformError::LengthMismatch` if the lengths disagree.
/// - `TransformError::NonFiniteInput` at the first non-finite `pk` entry.
pub fn validate_spectrum_pair(ks: ArrayView1<f64>, pk: ArrayView1<f64>) -> TransformResult<()> {
    validate_wavenumbers(ks)?;
    if ks.len() != pk.len() {
        return Err(TransformError::LengthMismatch { expected: ks.len(), actual: pk.len() });
    }
    for (index, &value) in pk.iter().enumerate() {
        if !value.is_finite() {
            return Err(TransformError::NonFiniteInput { name: "pk", index, value });
        }
    }
    Ok(())
}

/// Validate separations handed to a transform: nonempty, finite, and
/// strictly positive (the kernels divide by s).
///
/// Errors
/// ------
/// - `TransformError::EmptyInput` if `ss` has no entries.
/// - `TransformError::NonFiniteInput` at the first NaN/±inf entry.
/// - `TransformError::NonPositiveInput` at the first entry ≤ 0.
pub fn validate_separations(ss: ArrayView1<f64>) -> TransformResult<()> {
    if ss.is_empty() {
        return Err(TransformError::EmptyInput { name: "ss" });
    }
    for (index, &value) in ss.iter().enumerate() {
        if !value.is_finite() {
            return Err(TransformError::NonFiniteInput { name: "ss", index, value });
        }
        if value <= 0.0 {
            return Err(TransformError::NonPositiveInput { name: "ss", index, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Acceptance of well-formed grids, spectra, and separations.
    // - The specific error (and index) reported for each malformation.
    //
    // They intentionally DO NOT cover:
    // - Per-method positivity requirements on pk (smoothing module).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A strictly ascending positive grid passes; each malformation is
    // reported with its variant and first offending index.
    //
    // Given
    // -----
    // - A good grid plus empty, NaN, non-positive, and non-ascending
    //   variants.
    //
    // Expect
    // ------
    // - Ok for the good grid; the documented error for each bad one.
    fn validate_wavenumbers_covers_each_malformation() {
        // Arrange
        let good = Array1::from(vec![0.1, 0.2, 0.4]);
        let empty = Array1::<f64>::zeros(0);
        let nan = Array1::from(vec![0.1, f64::NAN, 0.4]);
        let nonpositive = Array1::from(vec![0.0, 0.2, 0.4]);
        let unordered = Array1::from(vec![0.1, 0.4, 0.2]);

        // Act & Assert
        assert!(validate_wavenumbers(good.view()).is_ok());
        assert!(matches!(
            validate_wavenumbers(empty.view()),
            Err(TransformError::EmptyInput { name: "ks" })
        ));
        assert!(matches!(
            validate_wavenumbers(nan.view()),
            Err(TransformError::NonFiniteInput { name: "ks", index: 1, .. })
        ));
        assert!(matches!(
            validate_wavenumbers(nonpositive.view()),
            Err(TransformError::NonPositiveInput { name: "ks", index: 0, .. })
        ));
        assert!(matches!(
            validate_wavenumbers(unordered.view()),
            Err(TransformError::NotAscending { name: "ks", index: 2 })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Spectrum pairs must match in length and hold finite power values.
    //
    // Given
    // -----
    // - A valid grid with a short spectrum and with an infinite entry.
    //
    // Expect
    // ------
    // - LengthMismatch and NonFiniteInput("pk") respectively.
    fn validate_spectrum_pair_checks_length_and_finiteness() {
        // Arrange
        let ks = Array1::from(vec![0.1, 0.2, 0.4]);
        let short = Array1::from(vec![1.0, 2.0]);
        let infinite = Array1::from(vec![1.0, f64::INFINITY, 3.0]);

        // Act & Assert
        assert!(matches!(
            validate_spectrum_pair(ks.view(), short.view()),
            Err(TransformError::LengthMismatch { expected: 3, actual: 2 })
        ));
        assert!(matches!(
            validate_spectrum_pair(ks.view(), infinite.view()),
            Err(TransformError::NonFiniteInput { name: "pk", index: 1, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Separations must be nonempty, finite, and strictly positive.
    //
    // Given
    // -----
    // - A good array, an empty array, and one holding zero.
    //
    // Expect
    // ------
    // - Ok, EmptyInput, and NonPositiveInput respectively.
    fn validate_separations_requires_positive_values() {
        // Arrange
        let good = Array1::from(vec![30.0, 32.0, 34.0]);
        let empty = Array1::<f64>::zeros(0);
        let with_zero = Array1::from(vec![30.0, 0.0]);

        // Act & Assert
        assert!(validate_separations(good.view()).is_ok());
        assert!(matches!(
            validate_separations(empty.view()),
            Err(TransformError::EmptyInput { name: "ss" })
        ));
        assert!(matches!(
            validate_separations(with_zero.view()),
            Err(TransformError::NonPositiveInput { name: "ss", index: 1, .. })
        ));
    }
}

//! Strategy selection for the P(k) → ξ(s) transform.
//!
//! [`PowerToCorrelation`] is a closed set of interchangeable transform
//! strategies behind one `transform` call: the damped trapezoid rule
//! ([`GaussQuadrature`]) and the Hankel quadrature
//! ([`SphericalBesselTransform`]). Constructors validate configuration up
//! front, so a strategy in hand always transforms without configuration
//! errors. Both strategies agree to better than a percent of the peak
//! amplitude on BAO-scale separations; the trapezoid rule is the faster
//! default, the Hankel quadrature avoids damping bias.
use crate::transform::errors::TransformResult;
use crate::transform::fourier::SphericalBesselTransform;
use crate::transform::gauss::GaussQuadrature;
use ndarray::{Array1, ArrayView1};

/// A configured transform strategy.
#[derive(Debug, Clone)]
pub enum PowerToCorrelation {
    /// Damped trapezoid quadrature on an oversampled grid.
    Gauss(GaussQuadrature),
    /// Ogata quadrature over spherical-Bessel nodes.
    FourierBessel(SphericalBesselTransform),
}

impl PowerToCorrelation {
    /// The trapezoid strategy with default knobs, for spectra on `ks`.
    pub fn gauss(ks: ArrayView1<f64>) -> TransformResult<PowerToCorrelation> {
        Ok(PowerToCorrelation::Gauss(GaussQuadrature::with_defaults(ks)?))
    }

    /// The trapezoid strategy with explicit oversampling and damping.
    pub fn gauss_with(
        ks: ArrayView1<f64>, interpolate_detail: usize, damping: f64,
    ) -> TransformResult<PowerToCorrelation> {
        Ok(PowerToCorrelation::Gauss(GaussQuadrature::new(ks, interpolate_detail, damping)?))
    }

    /// The Hankel strategy with default knobs.
    pub fn fourier_bessel() -> TransformResult<PowerToCorrelation> {
        Ok(PowerToCorrelation::FourierBessel(SphericalBesselTransform::with_defaults()?))
    }

    /// The Hankel strategy with an explicit step and node count.
    pub fn fourier_bessel_with(
        h: f64, num_nodes: Option<usize>,
    ) -> TransformResult<PowerToCorrelation> {
        Ok(PowerToCorrelation::FourierBessel(SphericalBesselTransform::new(h, num_nodes)?))
    }

    /// Transform `pk` tabulated on `ks` into ξ at the separations `ss`,
    /// dispatching to the configured strategy.
    pub fn transform(
        &self, ks: ArrayView1<f64>, pk: ArrayView1<f64>, ss: ArrayView1<f64>,
    ) -> TransformResult<Array1<f64>> {
        match self {
            PowerToCorrelation::Gauss(strategy) => strategy.transform(ks, pk, ss),
            PowerToCorrelation::FourierBessel(strategy) => strategy.transform(ks, pk, ss),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::errors::TransformError;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - That dispatch returns exactly what the wrapped strategy returns.
    // - That constructor validation propagates through the enum builders.
    //
    // They intentionally DO NOT cover:
    // - Numerical accuracy of either strategy (their own modules) or
    //   cross-strategy agreement (integration tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The enum is a transparent dispatcher: its result is identical to
    // calling the wrapped strategy directly.
    //
    // Given
    // -----
    // - A small spectrum and separations, transformed both ways.
    //
    // Expect
    // ------
    // - Bitwise-identical outputs.
    fn dispatch_matches_direct_call() {
        // Arrange
        let ks = Array1::logspace(std::f64::consts::E, (1e-2_f64).ln(), (2.0_f64).ln(), 64);
        let pk = ks.mapv(|k: f64| (-k * k).exp());
        let ss = Array1::from(vec![1.0, 2.0]);
        let direct = GaussQuadrature::with_defaults(ks.view()).unwrap();
        let dispatched = PowerToCorrelation::gauss(ks.view()).unwrap();

        // Act
        let via_direct = direct.transform(ks.view(), pk.view(), ss.view()).unwrap();
        let via_enum = dispatched.transform(ks.view(), pk.view(), ss.view()).unwrap();

        // Assert
        assert_eq!(via_direct, via_enum);
    }

    #[test]
    // Purpose
    // -------
    // Configuration errors surface through the enum builders unchanged.
    //
    // Given
    // -----
    // - A zero damping scale and a zero quadrature step.
    //
    // Expect
    // ------
    // - InvalidDamping and InvalidStep respectively.
    fn builders_propagate_validation_errors() {
        // Arrange
        let ks = Array1::from(vec![0.1, 0.2, 0.4]);

        // Act & Assert
        assert!(matches!(
            PowerToCorrelation::gauss_with(ks.view(), 2, 0.0),
            Err(TransformError::InvalidDamping { .. })
        ));
        assert!(matches!(
            PowerToCorrelation::fourier_bessel_with(0.0, None),
            Err(TransformError::InvalidStep { .. })
        ));
    }
}

//! Analytic Eisenstein & Hu (1998) solver with a damped acoustic modulation.
//!
//! Purpose
//! -------
//! Provide a self-contained [`BoltzmannSolver`] so grids can be generated
//! without an external Boltzmann code. The linear spectrum is the EH98
//! zero-baryon shape modulated by a damped sinc oscillation standing in for
//! the acoustic peaks, scaled across redshift by the linear growth factor.
//!
//! Key behaviors
//! -------------
//! - Sound horizon from the EH98 fitting formula, divided by a fixed
//!   calibration factor so the drag-epoch value lands on the scale Boltzmann
//!   codes report for the same cosmology.
//! - `P(k, z) = A · k^ns · T0(k)² · (1 + w(k)) · D(z)²` with
//!   `w(k) = a_bao · sinc(k·h0·s) · exp(−(k/0.3)²)`.
//! - Non-linear rows apply a quadratic small-scale boost on top of the
//!   linear rows; the boost vanishes as k → 0 and grows with D(z)².
//!
//! Invariants & assumptions
//! ------------------------
//! - `a_bao ∈ [0, 1)`, so `1 + w(k) > 0` and every spectrum value is
//!   strictly positive (log-domain smoothing downstream requires this).
//! - Cells are validated before evaluation; a non-positive `omch2` or `h0`
//!   is a [`CosmoError::SolverFailure`] naming the cell.
//!
//! Downstream usage
//! ----------------
//! - The grid generator drives this solver once per cell and assembles rows
//!   from both passes.
use crate::cosmology::core::background::growth_factor;
use crate::cosmology::core::params::CosmoParams;
use crate::cosmology::errors::{CosmoError, CosmoResult};
use crate::cosmology::solver::{BoltzmannSolver, LinearPass};
use crate::transform::smoothing::{eh98_sound_horizon, NoWiggleTransfer};
use ndarray::{Array1, Array2, ArrayView1};

/// Ratio of the EH98 fitting-formula sound horizon to the drag-epoch value
/// reported by Boltzmann codes for the same cosmology.
pub const SOUND_HORIZON_CALIBRATION: f64 = 1.025;

/// Default relative amplitude of the acoustic modulation.
pub const DEFAULT_BAO_AMPLITUDE: f64 = 0.5;

/// Default overall normalization of the linear spectrum, (Mpc/h)³.
pub const DEFAULT_AMPLITUDE: f64 = 2.0e5;

/// Wavenumber scale (h/Mpc) of the Gaussian envelope damping the acoustic
/// modulation.
const WIGGLE_DAMPING_SCALE: f64 = 0.3;

/// Wavenumber scale (h/Mpc) of the quadratic non-linear boost.
const NONLINEAR_SCALE: f64 = 2.0;

/// Analytic power-spectrum solver built on the EH98 zero-baryon shape.
///
/// `bao_amplitude` sets the relative strength of the acoustic modulation
/// and must lie in `[0, 1)`; `amplitude` is the overall normalization of
/// the linear spectrum. [`Default`] uses the documented constants.
#[derive(Debug, Clone)]
pub struct EisensteinHuSolver {
    bao_amplitude: f64,
    amplitude: f64,
}

impl EisensteinHuSolver {
    /// Build a solver with explicit modulation and normalization settings.
    ///
    /// # Errors
    /// - `CosmoError::InvalidParameterRange` if `bao_amplitude` is outside
    ///   `[0, 1)` or `amplitude` is non-finite or ≤ 0.
    pub fn new(bao_amplitude: f64, amplitude: f64) -> CosmoResult<Self> {
        if !bao_amplitude.is_finite() || !(0.0..1.0).contains(&bao_amplitude) {
            return Err(CosmoError::InvalidParameterRange {
                name: "bao_amplitude",
                value: bao_amplitude,
                reason: "Acoustic modulation amplitude must lie in [0, 1).",
            });
        }
        if !amplitude.is_finite() || amplitude <= 0.0 {
            return Err(CosmoError::InvalidParameterRange {
                name: "amplitude",
                value: amplitude,
                reason: "Spectrum normalization must be positive and finite.",
            });
        }
        Ok(EisensteinHuSolver { bao_amplitude, amplitude })
    }

    /// Relative amplitude of the acoustic modulation.
    pub fn bao_amplitude(&self) -> f64 {
        self.bao_amplitude
    }

    /// Overall normalization of the linear spectrum.
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    fn check_cell(&self, omch2: f64, h0: f64, redshifts: &[f64]) -> CosmoResult<()> {
        if !omch2.is_finite() || omch2 <= 0.0 {
            return Err(CosmoError::SolverFailure {
                omch2,
                h0,
                detail: "omch2 must be positive and finite".to_string(),
            });
        }
        if !h0.is_finite() || h0 <= 0.0 {
            return Err(CosmoError::SolverFailure {
                omch2,
                h0,
                detail: "h0 must be positive and finite".to_string(),
            });
        }
        for &z in redshifts {
            if !z.is_finite() || z < 0.0 {
                return Err(CosmoError::SolverFailure {
                    omch2,
                    h0,
                    detail: format!("redshift {z} must be non-negative and finite"),
                });
            }
        }
        Ok(())
    }
}

impl Default for EisensteinHuSolver {
    fn default() -> Self {
        EisensteinHuSolver {
            bao_amplitude: DEFAULT_BAO_AMPLITUDE,
            amplitude: DEFAULT_AMPLITUDE,
        }
    }
}

impl BoltzmannSolver for EisensteinHuSolver {
    fn linear_pass(
        &self, params: &CosmoParams, omch2: f64, h0: f64, redshifts: &[f64],
        ks: ArrayView1<f64>,
    ) -> CosmoResult<LinearPass> {
        self.check_cell(omch2, h0, redshifts)?;
        let om = (omch2 + params.ob * h0 * h0) / (h0 * h0);
        let transfer = NoWiggleTransfer::new(om, h0, params.ob);
        let sound_horizon = eh98_sound_horizon(om, h0, params.ob) / SOUND_HORIZON_CALIBRATION;

        // Redshift-independent shape; growth scales whole rows below.
        let shape: Array1<f64> = ks.mapv(|k| {
            let t0 = transfer.eval(k);
            let envelope = (-(k / WIGGLE_DAMPING_SCALE).powi(2)).exp();
            let wiggle = self.bao_amplitude * sinc(k * h0 * sound_horizon) * envelope;
            self.amplitude * k.powf(params.ns) * t0 * t0 * (1.0 + wiggle)
        });

        let mut pk = Array2::zeros((redshifts.len(), ks.len()));
        for (row, &z) in redshifts.iter().enumerate() {
            let growth2 = growth_factor(z, om).powi(2);
            pk.row_mut(row).assign(&(&shape * growth2));
        }
        Ok(LinearPass { sound_horizon, pk })
    }

    fn nonlinear_pass(
        &self, params: &CosmoParams, omch2: f64, h0: f64, redshifts: &[f64],
        ks: ArrayView1<f64>,
    ) -> CosmoResult<Array2<f64>> {
        let linear = self.linear_pass(params, omch2, h0, redshifts, ks)?;
        let om = (omch2 + params.ob * h0 * h0) / (h0 * h0);

        let mut pk = linear.pk;
        for (row, &z) in redshifts.iter().enumerate() {
            let growth2 = growth_factor(z, om).powi(2);
            for (col, &k) in ks.iter().enumerate() {
                pk[[row, col]] *= 1.0 + growth2 * (k / NONLINEAR_SCALE).powi(2);
            }
        }
        Ok(pk)
    }
}

/// `sin(x)/x` with the removable singularity filled in at x = 0.
fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        x.sin() / x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use ndarray::Array1;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The calibrated sound horizon for the standard cosmology.
    // - Positivity and finiteness of both passes.
    // - Growth suppression of high-redshift rows.
    // - The non-linear boost relative to the linear rows.
    // - Presence of the acoustic modulation in the linear shape.
    // - Cell validation and constructor validation.
    //
    // They intentionally DO NOT cover:
    // - Grid assembly from per-cell rows (generator tests).
    // - The EH98 transfer function itself (smoothing module tests).
    // -------------------------------------------------------------------------

    const EARLY_Z: f64 = 1e-4;

    fn standard_cell() -> (CosmoParams, f64, f64) {
        let params = CosmoParams::default();
        let h0 = params.h0;
        // omch2 for Ωm = 0.3121 at the reference h0.
        let omch2 = (0.3121 - params.ob) * h0 * h0;
        (params, omch2, h0)
    }

    fn test_ks(n: usize) -> Array1<f64> {
        let (lo, hi) = (1e-3_f64.ln(), 1.0_f64.ln());
        Array1::from_iter(
            (0..n).map(|i| (lo + (hi - lo) * i as f64 / (n - 1) as f64).exp()),
        )
    }

    #[test]
    // Purpose
    // -------
    // The calibrated sound horizon for the standard cosmology lands in the
    // 140-150 Mpc band Boltzmann codes report.
    //
    // Given
    // -----
    // - The standard cell (Ωm = 0.3121, h0 = 0.676).
    //
    // Expect
    // ------
    // - sound_horizon ∈ [140, 150] Mpc.
    fn sound_horizon_lands_in_the_drag_epoch_band() {
        // Arrange
        let (params, omch2, h0) = standard_cell();
        let solver = EisensteinHuSolver::default();
        let ks = test_ks(16);

        // Act
        let pass = solver
            .linear_pass(&params, omch2, h0, &[EARLY_Z, params.z], ks.view())
            .unwrap();

        // Assert
        assert!(
            (140.0..=150.0).contains(&pass.sound_horizon),
            "sound horizon {} outside [140, 150]",
            pass.sound_horizon
        );
    }

    #[test]
    // Purpose
    // -------
    // Both passes produce strictly positive, finite spectra over the whole
    // wavenumber range.
    //
    // Given
    // -----
    // - The standard cell over 64 log-spaced wavenumbers in [1e-3, 1].
    //
    // Expect
    // ------
    // - Every linear and non-linear value is finite and > 0.
    fn spectra_are_positive_and_finite() {
        // Arrange
        let (params, omch2, h0) = standard_cell();
        let solver = EisensteinHuSolver::default();
        let ks = test_ks(64);
        let redshifts = [EARLY_Z, params.z];

        // Act
        let linear = solver.linear_pass(&params, omch2, h0, &redshifts, ks.view()).unwrap();
        let nonlinear =
            solver.nonlinear_pass(&params, omch2, h0, &redshifts, ks.view()).unwrap();

        // Assert
        for &value in linear.pk.iter().chain(nonlinear.iter()) {
            assert!(value.is_finite() && value > 0.0, "non-positive spectrum value {value}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Growth suppresses the high-redshift row: the spectrum at the target
    // redshift sits strictly below the near-present row everywhere.
    //
    // Given
    // -----
    // - Linear rows at z = 1e-4 and z = 0.51 on the standard cell.
    //
    // Expect
    // ------
    // - Row(z = 0.51) < Row(z = 1e-4) elementwise, by the growth ratio.
    fn growth_suppresses_the_high_redshift_row() {
        // Arrange
        let (params, omch2, h0) = standard_cell();
        let solver = EisensteinHuSolver::default();
        let ks = test_ks(32);
        let om = (omch2 + params.ob * h0 * h0) / (h0 * h0);
        let expected_ratio = (growth_factor(params.z, om) / growth_factor(EARLY_Z, om)).powi(2);

        // Act
        let pass = solver
            .linear_pass(&params, omch2, h0, &[EARLY_Z, params.z], ks.view())
            .unwrap();

        // Assert
        assert!(expected_ratio < 1.0);
        for col in 0..ks.len() {
            let ratio = pass.pk[[1, col]] / pass.pk[[0, col]];
            assert_approx_eq!(ratio, expected_ratio, 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // The non-linear pass boosts the linear rows, with a boost that grows
    // toward small scales and vanishes at low k.
    //
    // Given
    // -----
    // - Both passes on the standard cell over [1e-3, 1].
    //
    // Expect
    // ------
    // - pk_nl ≥ pk_lin everywhere; the boost at the largest k exceeds the
    //   boost at the smallest k.
    fn nonlinear_pass_boosts_small_scales() {
        // Arrange
        let (params, omch2, h0) = standard_cell();
        let solver = EisensteinHuSolver::default();
        let ks = test_ks(32);
        let redshifts = [EARLY_Z, params.z];

        // Act
        let linear = solver.linear_pass(&params, omch2, h0, &redshifts, ks.view()).unwrap();
        let nonlinear =
            solver.nonlinear_pass(&params, omch2, h0, &redshifts, ks.view()).unwrap();

        // Assert
        let last = ks.len() - 1;
        for row in 0..redshifts.len() {
            for col in 0..ks.len() {
                assert!(nonlinear[[row, col]] >= linear.pk[[row, col]]);
            }
            let low_boost = nonlinear[[row, 0]] / linear.pk[[row, 0]];
            let high_boost = nonlinear[[row, last]] / linear.pk[[row, last]];
            assert!(high_boost > low_boost);
            assert_approx_eq!(low_boost, 1.0, 1e-5);
        }
    }

    #[test]
    // Purpose
    // -------
    // The acoustic modulation is present: dividing the linear shape by the
    // no-wiggle envelope leaves an oscillation crossing zero repeatedly.
    //
    // Given
    // -----
    // - The linear row at z = 1e-4 over 512 wavenumbers in [0.01, 0.5],
    //   divided by A·k^ns·T0(k)².
    //
    // Expect
    // ------
    // - The residual (ratio − 1) changes sign at least four times.
    fn linear_shape_carries_an_acoustic_modulation() {
        // Arrange
        let (params, omch2, h0) = standard_cell();
        let solver = EisensteinHuSolver::default();
        let om = (omch2 + params.ob * h0 * h0) / (h0 * h0);
        let transfer = NoWiggleTransfer::new(om, h0, params.ob);
        let n = 512;
        let (lo, hi) = (0.01_f64.ln(), 0.5_f64.ln());
        let ks = Array1::from_iter(
            (0..n).map(|i| (lo + (hi - lo) * i as f64 / (n - 1) as f64).exp()),
        );

        // Act
        let pass = solver.linear_pass(&params, omch2, h0, &[EARLY_Z], ks.view()).unwrap();
        let growth2 = growth_factor(EARLY_Z, om).powi(2);
        let residuals: Vec<f64> = ks
            .iter()
            .enumerate()
            .map(|(i, &k)| {
                let t0 = transfer.eval(k);
                let envelope = solver.amplitude() * k.powf(params.ns) * t0 * t0 * growth2;
                pass.pk[[0, i]] / envelope - 1.0
            })
            .collect();

        // Assert
        let sign_changes = residuals
            .windows(2)
            .filter(|pair| pair[0].signum() != pair[1].signum())
            .count();
        assert!(sign_changes >= 4, "only {sign_changes} sign changes in the modulation");
    }

    #[test]
    // Purpose
    // -------
    // Invalid cells and invalid constructor settings are rejected with the
    // structured errors.
    //
    // Given
    // -----
    // - A negative omch2 cell, a zero h0 cell, a negative redshift, and
    //   out-of-range constructor settings.
    //
    // Expect
    // ------
    // - SolverFailure for the cells, InvalidParameterRange for the
    //   constructor.
    fn invalid_cells_and_settings_are_rejected() {
        // Arrange
        let (params, omch2, h0) = standard_cell();
        let solver = EisensteinHuSolver::default();
        let ks = test_ks(8);

        // Act & Assert
        assert!(matches!(
            solver.linear_pass(&params, -0.1, h0, &[EARLY_Z], ks.view()),
            Err(CosmoError::SolverFailure { .. })
        ));
        assert!(matches!(
            solver.linear_pass(&params, omch2, 0.0, &[EARLY_Z], ks.view()),
            Err(CosmoError::SolverFailure { .. })
        ));
        assert!(matches!(
            solver.nonlinear_pass(&params, omch2, h0, &[-0.5], ks.view()),
            Err(CosmoError::SolverFailure { .. })
        ));
        assert!(matches!(
            EisensteinHuSolver::new(1.0, DEFAULT_AMPLITUDE),
            Err(CosmoError::InvalidParameterRange { name: "bao_amplitude", .. })
        ));
        assert!(matches!(
            EisensteinHuSolver::new(0.5, -1.0),
            Err(CosmoError::InvalidParameterRange { name: "amplitude", .. })
        ));
    }
}

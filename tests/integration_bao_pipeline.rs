//! Integration tests for the BAO power-spectrum and fitting pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end pipeline: from grid generation and disk
//!   caching, through interpolated point queries and the P(k) → ξ(s)
//!   transform, to BAO model fitting, standard errors, and the
//!   goodness-of-fit summary.
//! - Exercise realistic configurations (grid shapes, smoothing methods,
//!   transform strategies, and optimizer settings) rather than toy edge
//!   cases only.
//!
//! Coverage
//! --------
//! - `cosmology::generator`:
//!   - Lazy grid generation, cache persistence, and reload across
//!     generator instances.
//!   - Interpolated `get_data` queries on and off the grid, plus the
//!     point-query memo.
//! - `cosmology::registry`:
//!   - Fingerprint-keyed sharing of generators across consumers.
//! - `transform::strategy`:
//!   - Agreement between the damped trapezoid and spherical-Bessel
//!     strategies on a full solver spectrum.
//! - `cosmology::models::correlation`:
//!   - Model construction, fitting, standard errors, and the χ² p-value
//!     on synthetic measurements.
//! - `optimization::loglik_optimizer`:
//!   - Use of LBFGS + line search via `MLEOptions` and `Tolerances`.
//!
//! Exclusions
//! ----------
//! - Fine-grained validation of low-level building blocks (interpolation
//!   weights, cache file formats, smoothing fits, numerical stability
//!   helpers) — these are covered by unit tests.
//! - Python bindings and user-facing API wrappers — those are expected to
//!   be tested at a higher integration or system level.
//! - Exhaustive stress testing over large grids and parameter sweeps —
//!   those belong in targeted performance tests.
use ndarray::{Array1, Array2};
use rust_cosmology::{
    cosmology::{
        core::{interpolation::ClampMode, options::GeneratorConfig, params::CosmoParams},
        errors::CosmoError,
        generator::CosmoGenerator,
        models::{
            correlation::{BaoCorrelationModel, CorrelationData},
            params::{BaoParams, ParamMap},
        },
        registry::GeneratorRegistry,
    },
    optimization::loglik_optimizer::{MLEOptions, Tolerances, traits::LineSearcher},
    transform::{smoothing::SmoothingMethod, strategy::PowerToCorrelation},
};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Purpose
/// -------
/// Provide the standard small-grid parameter set used throughout these
/// tests: coarse enough to generate in milliseconds, fine enough to
/// interpolate meaningfully.
///
/// Parameters
/// ----------
/// - `z`: Target redshift for the linear spectrum rows; must be
///   non-negative and finite.
///
/// Returns
/// -------
/// - A `CosmoParams` with a 5 × 1 (Ωm, h0) grid and the standard
///   reference cosmology (h0 = 0.676, Ωb = 0.04814, ns = 0.97).
///
/// Invariants
/// ----------
/// - Panics if `CosmoParams::new` rejects the inputs; this is treated as
///   a test configuration error, not a behavior under test.
fn small_grid_params(z: f64) -> CosmoParams {
    CosmoParams::new(z, 5, 1, 0.676, 0.04814, 0.97)
        .expect("CosmoParams::new should accept the standard test cosmology")
}

/// Purpose
/// -------
/// Build a `GeneratorConfig` over a test directory with the small 5 × 1
/// grid, leaving every other knob at its conventional test value.
///
/// Parameters
/// ----------
/// - `dir`: Cache directory for grid files; usually a `TempDir` path.
/// - `allow_generate`: Whether a cache miss may trigger generation.
///
/// Returns
/// -------
/// - A validated `GeneratorConfig` with memo capacity 16, extrapolating
///   clamp mode, and serial generation.
///
/// Invariants
/// ----------
/// - Panics if `GeneratorConfig::new` rejects the inputs; the capacity
///   and clamp mode used here are always admissible.
fn small_grid_config(dir: &Path, allow_generate: bool) -> GeneratorConfig {
    GeneratorConfig::new(
        small_grid_params(0.51),
        dir,
        allow_generate,
        16,
        ClampMode::Extrapolate,
        false,
    )
    .expect("GeneratorConfig::new should accept the standard test configuration")
}

/// Purpose
/// -------
/// Build a `GeneratorConfig` at the default resolution (101 × 1 grid,
/// z = 0.51), for tests that exercise the production configuration
/// rather than the coarse test grid.
///
/// Parameters
/// ----------
/// - `dir`: Cache directory for grid files; usually a `TempDir` path.
/// - `allow_generate`: Whether a cache miss may trigger generation.
///
/// Returns
/// -------
/// - A validated `GeneratorConfig` with `CosmoParams::default()`, memo
///   capacity 16, extrapolating clamp mode, and serial generation.
///
/// Invariants
/// ----------
/// - Panics if `GeneratorConfig::new` rejects the inputs; the default
///   parameters are always admissible.
fn default_grid_config(dir: &Path, allow_generate: bool) -> GeneratorConfig {
    GeneratorConfig::new(
        CosmoParams::default(),
        dir,
        allow_generate,
        16,
        ClampMode::Extrapolate,
        false,
    )
    .expect("GeneratorConfig::new should accept the default configuration")
}

/// Purpose
/// -------
/// Provide a stable, documented baseline `MLEOptions` configuration for
/// fits that should reflect "typical" user settings.
///
/// Configuration
/// -------------
/// - Optimizer tolerances (`Tolerances`):
///   - `tol_grad = Some(1e-6)`
///   - `tol_cost = None`
///   - `max_iter = Some(200)`
/// - Line search: `LineSearcher::MoreThuente`.
/// - Quiet output and the default L-BFGS memory.
///
/// Returns
/// -------
/// - An `MLEOptions` instance suitable for the fitting tests below.
///
/// Invariants
/// ----------
/// - Panics if the underlying constructors reject the supplied values;
///   this is a test-time configuration error.
fn default_fit_options() -> MLEOptions {
    let tols = Tolerances::new(Some(1e-6), None, Some(200))
        .expect("Tolerances::new should accept a positive gradient tolerance");
    MLEOptions::new(tols, LineSearcher::MoreThuente, false, None)
        .expect("MLEOptions::new should succeed with default L-BFGS memory")
}

/// Purpose
/// -------
/// Synthesize a noise-free measurement vector from a model at known
/// parameters, paired with a diagonal inverse covariance.
///
/// Parameters
/// ----------
/// - `model`: Model used to evaluate the correlation function.
/// - `ss`: Separation bins, Mpc/h; strictly positive.
/// - `truth`: Generating parameters; every value inside its box.
/// - `weight`: Diagonal inverse-covariance weight; larger values make
///   the synthetic likelihood surface steeper around `truth`.
///
/// Returns
/// -------
/// - A `CorrelationData` whose `xi` equals the model prediction at
///   `truth` exactly, so the log-likelihood peaks there at zero.
///
/// Invariants
/// ----------
/// - Panics if the model cannot evaluate at `truth` or the dataset
///   fails validation; both indicate a test setup error.
fn synthetic_measurements(
    model: &BaoCorrelationModel, ss: &Array1<f64>, truth: &BaoParams, weight: f64,
) -> CorrelationData {
    let xi = model
        .compute_correlation_function(ss.view(), truth)
        .expect("model evaluation at the generating parameters should succeed");
    let icov = Array2::eye(ss.len()) * weight;
    CorrelationData::new(ss.clone(), xi, icov)
        .expect("CorrelationData::new should accept the synthetic measurements")
}

#[test]
// Purpose
// -------
// Ensure a fresh generator builds its grid on first query, persists it,
// and answers physically sensible interpolated queries thereafter.
//
// Given
// -----
// - A 5 × 1 grid over an empty temporary directory with generation
//   allowed.
// - Interior queries at Ωm = 0.25, 0.31, and 0.40, plus an off-grid
//   query at Ωm = 0.72 under extrapolating clamp mode.
//
// Expect
// ------
// - The generator starts unloaded and flips to loaded on first query,
//   leaving the cache file on disk.
// - Every interior query returns r_drag within the physically expected
//   140–150 Mpc band and strictly positive, finite spectra of the shared
//   axis length.
// - r_drag decreases as Ωm grows.
// - Repeating a query hits the memo rather than growing it, and returns
//   the identical slice.
// - The off-grid query still succeeds with finite values.
fn grid_generation_and_queries_produce_physical_spectra() {
    let dir = TempDir::new().expect("tempdir");
    let generator = CosmoGenerator::new(small_grid_config(dir.path(), true));
    assert!(!generator.is_loaded());

    let slice = generator.get_data(0.31, None).expect("interior query should succeed");
    assert!(generator.is_loaded());
    assert!(generator.data_path().exists(), "grid file should be persisted after generation");

    assert!(slice.sound_horizon > 140.0 && slice.sound_horizon < 150.0);
    assert_eq!(slice.pk_linear.len(), generator.ks().len());
    assert_eq!(slice.pk_nonlinear.len(), generator.ks().len());
    assert!(slice.pk_linear.iter().all(|v| v.is_finite() && *v > 0.0));
    assert!(slice.pk_nonlinear.iter().all(|v| v.is_finite() && *v > 0.0));

    // r_drag shrinks with growing matter density.
    let low = generator.get_data(0.25, None).expect("query at om = 0.25");
    let high = generator.get_data(0.40, None).expect("query at om = 0.40");
    assert!(low.sound_horizon > high.sound_horizon);

    // Repeats hit the memo and return the identical slice.
    let memo_before = generator.memo_len();
    let repeat = generator.get_data(0.31, None).expect("repeat query should succeed");
    assert_eq!(generator.memo_len(), memo_before);
    assert_eq!(repeat.pk_linear, slice.pk_linear);

    // Off-grid queries extrapolate rather than fail.
    let outside = generator.get_data(0.72, None).expect("off-grid query should extrapolate");
    assert!(outside.sound_horizon.is_finite());
    assert!(outside.pk_linear.iter().all(|v| v.is_finite()));
}

#[test]
// Purpose
// -------
// Verify that a grid generated by one instance is read back intact by a
// second instance that is forbidden from generating.
//
// Given
// -----
// - Generator A over an empty directory with generation allowed; one
//   query forces generation and persistence.
// - Generator B over the same directory with generation disallowed,
//   asked for the same point.
//
// Expect
// ------
// - Generator B loads from disk without error.
// - Both generators return the same sound horizon and the same spectra
//   for the same query, value for value.
fn cached_grids_round_trip_between_generator_instances() {
    let dir = TempDir::new().expect("tempdir");

    let writer = CosmoGenerator::new(small_grid_config(dir.path(), true));
    let written = writer.get_data(0.31, None).expect("generation-backed query should succeed");

    let reader = CosmoGenerator::new(small_grid_config(dir.path(), false));
    let read = reader.get_data(0.31, None).expect("cache-backed query should succeed");

    assert_eq!(written.sound_horizon, read.sound_horizon);
    assert_eq!(written.pk_linear, read.pk_linear);
    assert_eq!(written.pk_nonlinear, read.pk_nonlinear);
}

#[test]
// Purpose
// -------
// Confirm that a cache miss with generation disallowed is surfaced as
// `DataUnavailable` naming the missing file, rather than triggering the
// solver.
//
// Given
// -----
// - An empty temporary directory and a configuration with
//   `allow_generate = false`.
//
// Expect
// ------
// - `get_data` fails with `CosmoError::DataUnavailable` whose path is
//   exactly the generator's cache path.
// - The generator stays unloaded.
fn cache_miss_with_generation_disallowed_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let generator = CosmoGenerator::new(small_grid_config(dir.path(), false));

    let err = generator.get_data(0.31, None).expect_err("missing cache should be an error");
    match err {
        CosmoError::DataUnavailable { path } => {
            assert_eq!(path, generator.data_path().display().to_string());
        }
        other => panic!("expected DataUnavailable, got {other:?}"),
    }
    assert!(!generator.is_loaded());
}

#[test]
// Purpose
// -------
// Check that the two transform strategies agree on a full solver
// spectrum at BAO scales, so swapping strategies does not move the
// fitted feature.
//
// Given
// -----
// - The linear spectrum at Ωm = 0.31 from a freshly generated grid.
// - The damped trapezoid strategy built on the grid's wavenumber axis
//   and the spherical-Bessel strategy with default nodes.
// - 85 separations spanning 30–198 Mpc/h in 2 Mpc/h steps, covering the
//   full BAO feature.
//
// Expect
// ------
// - Both strategies return finite ξ values.
// - Pointwise differences stay below 1% of the peak |ξ| over the range,
//   which keeps any strategy-induced shift well inside measurement
//   errors.
fn transform_strategies_agree_at_bao_scales() {
    let dir = TempDir::new().expect("tempdir");
    let generator = CosmoGenerator::new(small_grid_config(dir.path(), true));
    let slice = generator.get_data(0.31, None).expect("query should succeed");
    let ks = generator.ks();

    let trapezoid =
        PowerToCorrelation::gauss(ks.view()).expect("trapezoid strategy should build");
    let bessel = PowerToCorrelation::fourier_bessel().expect("Bessel strategy should build");
    let ss = Array1::linspace(30.0, 198.0, 85);

    let xi_trap = trapezoid
        .transform(ks.view(), slice.pk_linear.view(), ss.view())
        .expect("trapezoid transform should succeed");
    let xi_bessel = bessel
        .transform(ks.view(), slice.pk_linear.view(), ss.view())
        .expect("Bessel transform should succeed");

    assert!(xi_trap.iter().chain(xi_bessel.iter()).all(|v| v.is_finite()));

    let peak = xi_trap.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    assert!(peak > 0.0, "transformed spectrum should not vanish");
    for (i, (t, b)) in xi_trap.iter().zip(xi_bessel.iter()).enumerate() {
        assert!(
            (t - b).abs() <= 0.01 * peak,
            "strategies disagree at s = {}: trapezoid {t}, Bessel {b}",
            ss[i]
        );
    }
}

#[test]
// Purpose
// -------
// Run the whole pipeline end to end: registry-shared generator, default
// smoothing, synthetic measurements, MLE fit, standard errors, and the
// goodness-of-fit p-value.
//
// Given
// -----
// - A registry-obtained generator at the default resolution (101 × 1
//   grid, z = 0.51).
// - A model with the default Hinton 2017 smoothing, Ωm, σ_nl, and the
//   polynomial nuisance terms fixed at their generating values, and
//   α and b free.
// - Noise-free synthetic measurements generated at α = 0.97, b = 1.8 on
//   86 bins over 30–200 Mpc/h with diagonal weight 1e4.
//
// Expect
// ------
// - The default-resolution query at Ωm = 0.31 lands r_drag in the
//   140–150 Mpc band.
// - The fit converges and recovers α within 0.01 and b within 0.05.
// - Standard errors arrive for exactly the two free parameters and are
//   finite and strictly positive.
// - The χ² p-value is essentially one on noise-free data.
// - The fitted model reproduces finite predictions on the data bins.
fn bao_fit_recovers_dilation_and_amplitude_end_to_end() {
    // Arrange
    let dir = TempDir::new().expect("tempdir");
    let registry = GeneratorRegistry::new();
    let generator = registry.obtain(default_grid_config(dir.path(), true));

    let slice = generator.get_data(0.31, None).expect("default-grid query should succeed");
    assert!(slice.sound_horizon > 140.0 && slice.sound_horizon < 150.0);

    let mut fixing = ParamMap::new();
    fixing.fix("om", 0.31).expect("om is inside its box");
    fixing.fix("sigma_nl", 5.0).expect("sigma_nl is inside its box");
    fixing.fix("a1", 0.0).expect("a1 is inside its box");
    fixing.fix("a2", 0.0).expect("a2 is inside its box");
    fixing.fix("a3", 0.0).expect("a3 is inside its box");

    let mut model = BaoCorrelationModel::new(
        Arc::clone(&generator),
        SmoothingMethod::default(),
        fixing,
        default_fit_options(),
    )
    .expect("model construction should succeed");

    let truth = BaoParams { alpha: 0.97, bias: 1.8, ..BaoParams::default() };
    let ss = Array1::linspace(30.0, 200.0, 86);
    let data = synthetic_measurements(&model, &ss, &truth, 1.0e4);

    // Act
    let theta0 = model.param_map.default_theta();
    model.fit(theta0, &data).expect("fit should converge on synthetic data");

    // Assert
    let outcome = model.results.as_ref().expect("results should be cached after fit");
    assert!(outcome.converged, "fit should report convergence, got: {}", outcome.status);

    let fitted = model.fitted_params.expect("fitted params should be cached after fit");
    assert!(
        (fitted.alpha - truth.alpha).abs() < 0.01,
        "alpha should be recovered: fitted {}, truth {}",
        fitted.alpha,
        truth.alpha
    );
    assert!(
        (fitted.bias - truth.bias).abs() < 0.05,
        "bias should be recovered: fitted {}, truth {}",
        fitted.bias,
        truth.bias
    );

    let ses = model.standard_errors(&data).expect("standard errors after fit");
    assert_eq!(ses.len(), 2);
    assert!(ses.iter().all(|v| v.is_finite() && *v > 0.0));

    let pvalue = model.gof_pvalue(&data).expect("gof p-value after fit");
    assert!(pvalue > 0.9 && pvalue <= 1.0, "noise-free fit should have p near one: {pvalue}");

    let prediction = model
        .compute_correlation_function(data.ss.view(), &fitted)
        .expect("prediction at fitted params");
    assert!(prediction.iter().all(|v| v.is_finite()));
}

#[test]
// Purpose
// -------
// Verify that the registry hands out one shared generator per parameter
// fingerprint, so concurrent models reuse grids instead of duplicating
// them.
//
// Given
// -----
// - Two configurations with identical parameters over the same
//   directory, and a third at a different redshift.
//
// Expect
// ------
// - The first two `obtain` calls return the same `Arc` and the registry
//   holds one entry.
// - The third call registers a second, distinct generator.
// - `contains` answers by fingerprint for both.
fn registry_shares_generators_by_fingerprint() {
    let dir = TempDir::new().expect("tempdir");
    let registry = GeneratorRegistry::new();

    let first = registry.obtain(small_grid_config(dir.path(), true));
    let second = registry.obtain(small_grid_config(dir.path(), true));
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 1);

    let other_params = small_grid_params(0.61);
    let other_config =
        GeneratorConfig::new(other_params, dir.path(), true, 16, ClampMode::Extrapolate, false)
            .expect("GeneratorConfig::new should accept the alternate redshift");
    let third = registry.obtain(other_config);
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(registry.len(), 2);

    assert!(registry.contains(&first.fingerprint()));
    assert!(registry.contains(&third.fingerprint()));
}

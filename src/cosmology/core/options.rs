//! Generator options — configuration for power-spectrum grid workflows.
//!
//! Purpose
//! -------
//! Collect the configuration knobs for building and querying a cached
//! power-spectrum grid in one place, making the workflow explicit and
//! reproducible. This includes the cosmology/grid parameters, the on-disk
//! cache location, the generation policy, and query-time behavior.
//!
//! Key behaviors
//! -------------
//! - Represent generator configuration via [`GeneratorConfig`], bundling the
//!   validated [`CosmoParams`], the cache directory, the `allow_generate`
//!   policy, the point-query memoization capacity, the out-of-grid
//!   [`ClampMode`], and the parallel-generation toggle.
//! - Keep cross-cutting configuration out of low-level grid code, so call
//!   sites pass explicit, validated options instead of ad-hoc flags.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`GeneratorConfig`] assumes `params` has already been validated by
//!   [`CosmoParams::new`]; locally it only enforces a nonzero memoization
//!   capacity.
//! - `data_dir` is interpreted at load time; it does not need to exist when
//!   the configuration is built (generation creates it).
//!
//! Downstream usage
//! ----------------
//! - Construct a [`GeneratorConfig`] (or start from
//!   `GeneratorConfig::default()`) and pass it to the generator entry point.
//!   Low-level code depends on this type rather than on loose arguments.
use crate::cosmology::core::{interpolation::ClampMode, params::CosmoParams};
use crate::cosmology::errors::{CosmoError, CosmoResult};
use std::path::PathBuf;

/// Default capacity of the generator's point-query memoization cache.
pub const DEFAULT_MEMO_CAPACITY: usize = 512;

/// GeneratorConfig — configuration for a cached power-spectrum generator.
///
/// Purpose
/// -------
/// Bundle everything a generator needs beyond the solver itself: which grid
/// to build ([`CosmoParams`]), where cached tensors live (`data_dir`),
/// whether a cache miss may trigger generation (`allow_generate`), how many
/// interpolated point queries to memoize (`memo_capacity`), how out-of-grid
/// queries behave (`clamp_mode`), and whether grid cells are generated in
/// parallel (`parallel`).
///
/// Fields
/// ------
/// - `params`: [`CosmoParams`]
///   Validated cosmology and grid-shape parameters; these determine the
///   cache fingerprint and file name.
/// - `data_dir`: `PathBuf`
///   Directory holding cached grid files. Created on demand when a grid is
///   generated and persisted.
/// - `allow_generate`: `bool`
///   When `false` (the default), a cache miss fails with `DataUnavailable`
///   and the solver is never invoked. When `true`, a miss runs the solver
///   over the full grid and persists the result.
/// - `memo_capacity`: `usize`
///   Capacity of the bounded cache for interpolated point queries. Must be
///   at least 1.
/// - `clamp_mode`: [`ClampMode`]
///   Whether out-of-grid queries extrapolate from the edge cells (default)
///   or clamp onto the grid.
/// - `parallel`: `bool`
///   Whether generation distributes grid cells across a thread pool.
///   Output is identical either way; cells are assembled by index.
///
/// Invariants
/// ----------
/// - `memo_capacity >= 1`, enforced by [`GeneratorConfig::new`].
/// - `params` carries its own invariants from [`CosmoParams::new`].
///
/// Notes
/// -----
/// - This type is the configuration surface for grid generation. Public
///   APIs accept a `GeneratorConfig` rather than separate parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Cosmology and grid-shape parameters (fingerprint inputs).
    pub params: CosmoParams,
    /// Directory holding cached grid files.
    pub data_dir: PathBuf,
    /// Whether a cache miss may trigger grid generation.
    pub allow_generate: bool,
    /// Capacity of the interpolated point-query cache.
    pub memo_capacity: usize,
    /// Out-of-grid query behavior.
    pub clamp_mode: ClampMode,
    /// Whether grid generation runs cells in parallel.
    pub parallel: bool,
}

impl GeneratorConfig {
    /// Construct a validated [`GeneratorConfig`].
    ///
    /// Parameters
    /// ----------
    /// - `params`: `CosmoParams`
    ///   Cosmology and grid-shape parameters, already validated by
    ///   [`CosmoParams::new`].
    /// - `data_dir`: `impl Into<PathBuf>`
    ///   Directory for cached grid files. Does not need to exist yet.
    /// - `allow_generate`: `bool`
    ///   Generation policy on cache miss.
    /// - `memo_capacity`: `usize`
    ///   Point-query memoization capacity; must be at least 1.
    /// - `clamp_mode`: `ClampMode`
    ///   Out-of-grid query behavior.
    /// - `parallel`: `bool`
    ///   Parallel-generation toggle.
    ///
    /// Returns
    /// -------
    /// `CosmoResult<GeneratorConfig>`
    ///   The assembled configuration.
    ///
    /// Errors
    /// ------
    /// - `CosmoError::InvalidCapacity`
    ///   If `memo_capacity` is zero.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rust_cosmology::cosmology::core::options::GeneratorConfig;
    /// # use rust_cosmology::cosmology::core::params::CosmoParams;
    /// # use rust_cosmology::cosmology::core::interpolation::ClampMode;
    ///
    /// let config = GeneratorConfig::new(
    ///     CosmoParams::default(),
    ///     "data",
    ///     false,
    ///     512,
    ///     ClampMode::Extrapolate,
    ///     false,
    /// )
    /// .unwrap();
    /// # assert!(!config.allow_generate);
    /// ```
    pub fn new(
        params: CosmoParams, data_dir: impl Into<PathBuf>, allow_generate: bool,
        memo_capacity: usize, clamp_mode: ClampMode, parallel: bool,
    ) -> CosmoResult<GeneratorConfig> {
        if memo_capacity == 0 {
            return Err(CosmoError::InvalidCapacity { value: memo_capacity });
        }
        Ok(GeneratorConfig {
            params,
            data_dir: data_dir.into(),
            allow_generate,
            memo_capacity,
            clamp_mode,
            parallel,
        })
    }
}

impl Default for GeneratorConfig {
    /// Construct the default generator configuration.
    ///
    /// Returns
    /// -------
    /// `GeneratorConfig`
    ///   A configuration with:
    ///   - `params = CosmoParams::default()`
    ///   - `data_dir = "data"`
    ///   - `allow_generate = false`
    ///   - `memo_capacity = 512`
    ///   - `clamp_mode = ClampMode::Extrapolate`
    ///   - `parallel = false`
    ///
    /// Notes
    /// -----
    /// - `allow_generate` defaults to `false` so that a missing cache file
    ///   surfaces as `DataUnavailable` instead of silently triggering an
    ///   expensive full-grid generation.
    fn default() -> Self {
        GeneratorConfig {
            params: CosmoParams::default(),
            data_dir: PathBuf::from("data"),
            allow_generate: false,
            memo_capacity: DEFAULT_MEMO_CAPACITY,
            clamp_mode: ClampMode::Extrapolate,
            parallel: false,
        }
    }
}

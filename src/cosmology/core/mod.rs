//! core — shared grid geometry, parameters, and interpolation primitives.
//!
//! Purpose
//! -------
//! Collect the building blocks for cached power-spectrum grids: validated
//! cosmology parameters and their cache fingerprints, axis/tensor geometry,
//! bilinear interpolation, flat-ΛCDM background quantities, data carriers,
//! configuration, and validation helpers. The generator, cache, and model
//! layers build on top of these primitives.
//!
//! Key behaviors
//! -------------
//! - Define the defining parameter set and its cache fingerprint
//!   ([`CosmoParams`]).
//! - Describe grid geometry and build axes ([`GridShape`], [`omch2_axis`],
//!   [`h0_axis`], [`k_axis`]) with the shared axis constants.
//! - Interpolate bilinearly over the (omch2, h0) plane with explicit
//!   out-of-grid policy ([`AxisCoord`], [`ClampMode`], [`axis_coord`],
//!   [`blend_rows`]).
//! - Carry grid data as validated containers ([`PkGrid`], [`PkSlice`]) and
//!   compute background quantities ([`growth_factor`], [`growth_rate`],
//!   [`GrowthRateCache`]).
//! - Bundle workflow configuration in [`GeneratorConfig`].
//!
//! Invariants & assumptions
//! ------------------------
//! - [`CosmoParams`] instances are validated on construction; everything
//!   downstream may assume finite, in-range defining parameters.
//! - A [`PkGrid`] always matches the tensor shape implied by its
//!   parameters and holds only finite values.
//! - Out-of-grid queries are legal: the interpolation layer extrapolates
//!   from the edge cells unless [`ClampMode::Clamp`] is configured.
//!
//! Conventions
//! -----------
//! - The grid's primary axis is omch2 = (Ωm − Ωb)·h0²; conversions from
//!   (Ωm, h0) queries happen in the generator, not here.
//! - Wavenumbers are h/Mpc, power in (Mpc/h)³, the sound horizon in Mpc.
//! - This module performs no I/O; persistence lives in the cache module.
//!
//! Downstream usage
//! ----------------
//! - The generator assembles a [`PkGrid`] from solver output (or the cache
//!   layer reads one back), answers `get_data` queries through
//!   [`PkGrid::interpolate_row`] and [`PkSlice::from_row`], and reaches for
//!   [`GrowthRateCache`] when growth rates are requested.
//! - Model code uses [`growth_factor`] and the axis helpers directly.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover fingerprint stability, axis geometry,
//!   interpolation exactness/continuity/extrapolation, tensor validation,
//!   background limits, and configuration defaults. Full pipelines are
//!   exercised by the integration tests at the crate level.

pub mod background;
pub mod data;
pub mod grid;
pub mod interpolation;
pub mod options;
pub mod params;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::background::{GrowthRateCache, e_z, growth_factor, growth_rate, omega_m_z};
pub use self::data::{PkGrid, PkSlice};
pub use self::grid::{GridShape, h0_axis, k_axis, omch2_axis};
pub use self::interpolation::{AxisCoord, ClampMode, axis_coord, blend_rows};
pub use self::options::GeneratorConfig;
pub use self::params::CosmoParams;
pub use self::validation::{
    validate_finite_array, validate_inverse_covariance, validate_positive_scalar,
    validate_redshift, validate_resolution, validate_same_length, validate_separations,
};

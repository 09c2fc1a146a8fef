//! cosmology — cached power-spectrum grids, BAO modeling, and errors.
//!
//! Purpose
//! -------
//! Provide a cohesive cosmology layer that bundles grid parameters and
//! containers, the cached spectrum generator, the analytic Boltzmann-style
//! solver, the BAO correlation-function model, and shared error types under
//! a single namespace. This is the main entry point for BAO analyses in
//! the crate, and is the surface most consumers (including Python
//! bindings) should depend on.
//!
//! Key behaviors
//! -------------
//! - Collect core numerical and structural building blocks in [`core`]:
//!   cosmology parameters, grid axes and shapes, loaded-grid containers,
//!   bilinear interpolation, background quantities, and validation.
//! - Expose a lazily loaded, disk-cached spectrum source in [`generator`]
//!   via [`CosmoGenerator`], with per-cell generation through the
//!   [`BoltzmannSolver`] trait in [`solver`] and file / memo caching in
//!   [`cache`].
//! - Share generators across consumers by parameter fingerprint through
//!   [`GeneratorRegistry`] in [`registry`].
//! - Expose the user-facing BAO model API in [`models`] via
//!   [`BaoCorrelationModel`], including MLE in θ-space, standard errors,
//!   and goodness of fit.
//! - Centralize cosmology-specific error types in [`errors`]
//!   (`CosmoError` and the `CosmoResult` alias) so callers see a uniform
//!   error surface across the stack.
//!
//! Invariants & assumptions
//! ------------------------
//! - Grid definitions are carried in validated [`CosmoParams`] instances;
//!   the parameter fingerprint names the cache file, so equal parameters
//!   always share one grid.
//! - Grid tensors satisfy the shape contract of [`core::data::PkGrid`];
//!   stale or truncated cache files are rejected at load time rather than
//!   interpolated.
//! - Point queries are continuous in (Ωm, h0) and reproduce stored cells
//!   exactly at the nodes; out-of-grid queries extrapolate from the edge
//!   cells unless clamping is configured.
//! - Measured datasets and optimizer vectors are validated at the model
//!   boundary; invalid input surfaces as [`CosmoError`], not panics.
//! - Generator, registry, and model are `Send + Sync`; locks are recovered
//!   from poisoning instead of propagating it.
//!
//! Conventions
//! -----------
//! - Wavenumbers are comoving h/Mpc, separations comoving Mpc/h, and
//!   spectra (Mpc/h)³; the sound horizon r_drag is in Mpc.
//! - Grids are laid out as `(omch2, h0, row)` tensors whose rows hold
//!   r_drag followed by the stored spectra; queries convert Ωm to the
//!   omch2 axis via `omch2 = (Ωm − Ωb)·h0²`.
//! - Optimization is performed in unconstrained θ-space; box bounds are
//!   applied through numerically stable sigmoid / logit transforms.
//! - The cosmology stack logs nothing and performs no I/O beyond its own
//!   cache files; error conditions are surfaced as [`CosmoResult`].
//!
//! Downstream usage
//! ----------------
//! - Typical end-to-end flow:
//!   1. Construct [`CosmoParams`] and a [`GeneratorConfig`] (cache
//!      directory, generation policy, clamping).
//!   2. Obtain a shared [`CosmoGenerator`] from a [`GeneratorRegistry`]
//!      (or build one directly) and let the first query load or generate
//!      the grid.
//!   3. Build a [`ParamMap`], fix whatever the analysis pins, and
//!      construct a [`BaoCorrelationModel`] over the generator.
//!   4. Fit with `fit(param_map.default_theta(), &data)` against a
//!      validated [`CorrelationData`].
//!   5. After a successful fit, use `standard_errors(&data)` and
//!      `gof_pvalue(&data)` for inference.
//! - Python bindings are expected to import from this module (or its
//!   [`prelude`]) and rely on the `CosmoError` conversion into `PyErr`
//!   defined in [`errors`].
//! - Advanced callers can work directly with submodules (e.g.,
//!   `core::background`, `solver`) when they need growth factors or
//!   custom per-cell spectra.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`core`] cover parameter fingerprints, axis layout,
//!   grid containers, interpolation (node exactness, continuity,
//!   extrapolation), background quantities, and validation.
//! - Unit tests in [`cache`] / [`generator`] / [`registry`] cover cache
//!   round-trips, generation policy, memoization, and fingerprint
//!   sharing, using small grids in temporary directories.
//! - Unit tests in [`models`] cover the θ bijection, dataset validation,
//!   the likelihood maximum on synthetic data, and the fit / inference
//!   cycle. The full pipeline runs in the integration tests.

pub mod cache;
pub mod core;
pub mod errors;
pub mod generator;
pub mod models;
pub mod registry;
pub mod solver;

// ---- Re-exports (primary public surface) ----------------------------------
//
// These are the “everyday” types most users need. More specialized items
// (validation helpers, axis builders, background quantities, cache
// internals) remain under their respective submodules.

pub use self::core::{ClampMode, CosmoParams, GeneratorConfig, PkSlice};

pub use self::errors::{CosmoError, CosmoResult};

pub use self::generator::{CosmoGenerator, EARLY_REDSHIFT};

pub use self::models::{BaoCorrelationModel, BaoParams, CorrelationData, ParamMap};

pub use self::registry::GeneratorRegistry;

pub use self::solver::{BoltzmannSolver, EisensteinHuSolver};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_cosmology::cosmology::prelude::*;
//
// to import the main cosmology surface in a single line, without pulling in
// lower-level internals.

pub mod prelude {
    pub use super::{
        BaoCorrelationModel, BaoParams, BoltzmannSolver, ClampMode, CorrelationData,
        CosmoError, CosmoGenerator, CosmoParams, CosmoResult, EisensteinHuSolver,
        GeneratorConfig, GeneratorRegistry, ParamMap, PkSlice,
    };
}

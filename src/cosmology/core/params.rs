//! Defining parameters of a power-spectrum grid and their cache fingerprint.
//!
//! Purpose
//! -------
//! [`CosmoParams`] pins down everything that determines the contents of a
//! generated grid: target redshift, grid resolutions, and the fixed
//! cosmological inputs (H0, Ωb, ns). Two generators with equal parameters
//! produce byte-identical grids, so the parameters also determine the cache
//! file name via a deterministic fingerprint string.
//!
//! Key behaviors
//! -------------
//! - Validated construction (finiteness, positivity, non-empty axes).
//! - Deterministic fingerprint: equal parameters ⇒ equal fingerprint; any
//!   differing parameter changes it.
//! - Cache filename derivation (`cosmo_{fingerprint}.npy`).
//!
//! Conventions
//! -----------
//! - The fingerprint encodes scaled integer truncations of the float
//!   parameters (z·1000, h0·10000, ob·10000, ns·1000), matching the naming
//!   scheme of pre-staged cache files.

use crate::cosmology::core::validation::{
    validate_positive_scalar, validate_redshift, validate_resolution,
};
use crate::cosmology::errors::CosmoResult;

/// Validated defining parameters of a power-spectrum grid.
///
/// Fields are public for read access; construction goes through
/// [`CosmoParams::new`] so every instance satisfies the documented domain
/// constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct CosmoParams {
    /// Target redshift of the linear spectrum rows.
    pub z: f64,
    /// Number of grid points on the omch2 axis.
    pub om_resolution: usize,
    /// Number of grid points on the h0 axis (1 collapses the axis).
    pub h0_resolution: usize,
    /// Reference Hubble parameter H0/100.
    pub h0: f64,
    /// Baryon density Ωb.
    pub ob: f64,
    /// Scalar spectral index ns.
    pub ns: f64,
}

impl CosmoParams {
    /// Build a validated parameter set.
    ///
    /// # Errors
    /// - `CosmoError::InvalidParameterRange` if `z` is negative or
    ///   non-finite, or if any of `h0`, `ob`, `ns` is non-finite or ≤ 0.
    /// - `CosmoError::InvalidResolution` if either resolution is 0.
    pub fn new(
        z: f64, om_resolution: usize, h0_resolution: usize, h0: f64, ob: f64, ns: f64,
    ) -> CosmoResult<Self> {
        validate_redshift(z)?;
        validate_resolution("om_resolution", om_resolution)?;
        validate_resolution("h0_resolution", h0_resolution)?;
        validate_positive_scalar("h0", h0)?;
        validate_positive_scalar("ob", ob)?;
        validate_positive_scalar("ns", ns)?;
        Ok(CosmoParams { z, om_resolution, h0_resolution, h0, ob, ns })
    }

    /// Deterministic fingerprint string identifying this parameter set.
    ///
    /// Format:
    /// `{z·1000}_{om_resolution}_{h0_resolution}_{h0·10000}_{ob·10000}_{ns·1000}`
    /// with each scaled float truncated toward zero. The standard
    /// configuration fingerprints as `510_101_1_6760_481_970`.
    pub fn fingerprint(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}_{}",
            (self.z * 1000.0) as i64,
            self.om_resolution,
            self.h0_resolution,
            (self.h0 * 10000.0) as i64,
            (self.ob * 10000.0) as i64,
            (self.ns * 1000.0) as i64,
        )
    }

    /// Cache file name for this parameter set: `cosmo_{fingerprint}.npy`.
    pub fn cache_filename(&self) -> String {
        format!("cosmo_{}.npy", self.fingerprint())
    }
}

impl Default for CosmoParams {
    /// The standard configuration: z = 0.51, a 101-point omch2 axis, a
    /// collapsed h0 axis at h0 = 0.676, ob = 0.04814, ns = 0.97.
    fn default() -> Self {
        CosmoParams {
            z: 0.51,
            om_resolution: 101,
            h0_resolution: 1,
            h0: 0.676,
            ob: 0.04814,
            ns: 0.97,
        }
    }
}

//! Flat ΛCDM background quantities: expansion rate, matter fraction, and
//! growth.
//!
//! All helpers assume a flat universe with matter + Λ only (no radiation
//! term); `om` is the present-day matter fraction Ωm and must be strictly
//! positive. The growth-rate helper comes with an explicit bounded cache,
//! [`GrowthRateCache`], sized for the handful of Ωm values an optimizer
//! visits repeatedly.
use crate::cosmology::cache::MemoCache;

/// Default capacity of the growth-rate cache.
pub const GROWTH_CACHE_CAPACITY: usize = 32;

/// Dimensionless expansion rate `E(z) = sqrt((1+z)³·Ωm + (1−Ωm))`.
pub fn e_z(z: f64, om: f64) -> f64 {
    ((1.0 + z).powi(3) * om + (1.0 - om)).sqrt()
}

/// Matter fraction at redshift z: `Ωm(z) = Ωm·(1+z)³ / E(z)²`.
pub fn omega_m_z(z: f64, om: f64) -> f64 {
    let e = e_z(z, om);
    om * (1.0 + z).powi(3) / (e * e)
}

/// Linear growth rate `f(z) ≈ Ωm(z)^0.55`.
pub fn growth_rate(z: f64, om: f64) -> f64 {
    omega_m_z(z, om).powf(0.55)
}

/// Linear growth factor D(z), Carroll–Press–Turner approximation,
/// normalized so that D(0) = 1.
///
/// `g(z) = 2.5·Ωm(z) / (Ωm(z)^{4/7} − ΩΛ(z) + (1 + Ωm(z)/2)(1 + ΩΛ(z)/70))`
/// with `D(z) = g(z) / ((1+z)·g(0))`.
pub fn growth_factor(z: f64, om: f64) -> f64 {
    growth_g(z, om) / ((1.0 + z) * growth_g(0.0, om))
}

fn growth_g(z: f64, om: f64) -> f64 {
    let omz = omega_m_z(z, om);
    let e = e_z(z, om);
    let olz = (1.0 - om) / (e * e);
    2.5 * omz / (omz.powf(4.0 / 7.0) - olz + (1.0 + 0.5 * omz) * (1.0 + olz / 70.0))
}

/// Growth rate at a fixed redshift with an explicit bounded memo.
///
/// Keyed by the Ωm bit pattern, so repeated likelihood evaluations at the
/// same Ωm skip the power-law evaluation. Capacity is fixed at
/// construction; least-recently-used entries are evicted.
#[derive(Debug)]
pub struct GrowthRateCache {
    z: f64,
    memo: MemoCache<u64, f64>,
}

impl GrowthRateCache {
    /// A cache for growth rates at redshift `z` holding up to `capacity`
    /// distinct Ωm values.
    pub fn new(z: f64, capacity: usize) -> Self {
        GrowthRateCache { z, memo: MemoCache::new(capacity) }
    }

    /// The redshift this cache evaluates at.
    pub fn redshift(&self) -> f64 {
        self.z
    }

    /// `f(z) ≈ Ωm(z)^0.55` at this cache's redshift, memoized on `om`.
    pub fn growth_rate(&mut self, om: f64) -> f64 {
        let key = om.to_bits();
        if let Some(cached) = self.memo.get(&key) {
            return cached;
        }
        let value = growth_rate(self.z, om);
        self.memo.insert(key, value);
        value
    }

    /// Number of memoized Ωm values currently held.
    pub fn len(&self) -> usize {
        self.memo.len()
    }

    /// True when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }
}

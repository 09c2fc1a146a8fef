//! registry — explicit keyed sharing of constructed generators.
//!
//! Purpose
//! -------
//! Grids are expensive to load and models are cheap to build, so several
//! models typically share one [`CosmoGenerator`]. [`GeneratorRegistry`]
//! makes that sharing explicit: generators are registered under their
//! parameter fingerprint and handed out as shared references. There is no
//! global instance; callers own their registry.
//!
//! Key behaviors
//! -------------
//! - `insert` registers a constructed generator under its fingerprint and
//!   fails on a duplicate instead of silently replacing it.
//! - `obtain` is the get-or-construct path: an existing generator with the
//!   same fingerprint is reused, otherwise one is built from the given
//!   configuration with the default solver.
//!
//! Invariants & assumptions
//! ------------------------
//! - One generator per fingerprint; equal parameters always resolve to the
//!   same shared instance within a registry.
//!
//! Downstream usage
//! ----------------
//! - Model code calls `obtain` once per configuration and clones the
//!   returned `Arc` into each model that shares the grid.
use crate::cosmology::core::options::GeneratorConfig;
use crate::cosmology::errors::{CosmoError, CosmoResult};
use crate::cosmology::generator::CosmoGenerator;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared generators keyed by their parameter fingerprint.
#[derive(Debug, Default)]
pub struct GeneratorRegistry {
    generators: Mutex<HashMap<String, Arc<CosmoGenerator>>>,
}

impl GeneratorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        GeneratorRegistry::default()
    }

    /// Register `generator` under its fingerprint.
    ///
    /// # Errors
    /// - `CosmoError::DuplicateFingerprint` if a generator with the same
    ///   fingerprint is already registered.
    pub fn insert(&self, generator: CosmoGenerator) -> CosmoResult<Arc<CosmoGenerator>> {
        let fingerprint = generator.fingerprint();
        let mut map = self.lock_map();
        if map.contains_key(&fingerprint) {
            return Err(CosmoError::DuplicateFingerprint { fingerprint });
        }
        let shared = Arc::new(generator);
        map.insert(fingerprint, Arc::clone(&shared));
        Ok(shared)
    }

    /// Look up the generator registered under `fingerprint`.
    pub fn get(&self, fingerprint: &str) -> Option<Arc<CosmoGenerator>> {
        self.lock_map().get(fingerprint).cloned()
    }

    /// Reuse the generator matching `config`'s fingerprint, constructing
    /// and registering one with the default solver if absent.
    pub fn obtain(&self, config: GeneratorConfig) -> Arc<CosmoGenerator> {
        let fingerprint = config.params.fingerprint();
        let mut map = self.lock_map();
        if let Some(existing) = map.get(&fingerprint) {
            return Arc::clone(existing);
        }
        let shared = Arc::new(CosmoGenerator::new(config));
        map.insert(fingerprint, Arc::clone(&shared));
        shared
    }

    /// True when a generator is registered under `fingerprint`.
    pub fn contains(&self, fingerprint: &str) -> bool {
        self.lock_map().contains_key(fingerprint)
    }

    /// Number of registered generators.
    pub fn len(&self) -> usize {
        self.lock_map().len()
    }

    /// True when no generators are registered.
    pub fn is_empty(&self) -> bool {
        self.lock_map().is_empty()
    }

    // A poisoned lock leaves the map whole; recover the guard.
    fn lock_map(&self) -> MutexGuard<'_, HashMap<String, Arc<CosmoGenerator>>> {
        match self.generators.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

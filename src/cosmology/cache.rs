//! cache — bounded in-memory memoization and on-disk grid persistence.
//!
//! Purpose
//! -------
//! Two caching layers back the generator. [`MemoCache`] is a small bounded
//! map with least-recently-used eviction, used for memoizing repeated
//! point queries (interpolated slices, growth rates, smoothed spectra).
//! [`GridCache`] persists whole grid tensors as `.npy` files named by the
//! parameter fingerprint, so expensive generation runs at most once per
//! parameter set.
//!
//! Key behaviors
//! -------------
//! - `MemoCache::get` refreshes recency; `insert` evicts the least
//!   recently used entry once capacity is exceeded. A requested capacity
//!   of 0 is treated as 1 so the cache always holds the latest entry.
//! - `GridCache::load_or_generate` prefers the on-disk file; with
//!   generation disallowed a missing file is [`CosmoError::DataUnavailable`]
//!   and the generation closure is never invoked.
//! - Freshly generated tensors are persisted before being returned, so a
//!   later process finds the file in place.
//!
//! Invariants & assumptions
//! ------------------------
//! - The recency queue holds each live key exactly once; map and queue
//!   lengths agree.
//! - Cache files round-trip bitwise: the tensor read back equals the
//!   tensor written, bit for bit.
//!
//! Conventions
//! -----------
//! - File names come from [`CosmoParams::cache_filename`]; the cache never
//!   invents its own naming scheme.
//! - A file whose tensor shape disagrees with the expected grid shape is
//!   reported as [`CosmoError::CacheShapeMismatch`], not silently re-read.
//!
//! Testing notes
//! -------------
//! - File-system tests run against temporary directories.
use crate::cosmology::core::grid::GridShape;
use crate::cosmology::core::params::CosmoParams;
use crate::cosmology::errors::{CosmoError, CosmoResult};
use ndarray::Array3;
use ndarray_npy::{read_npy, write_npy};
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::path::{Path, PathBuf};

/// Bounded memoization map with least-recently-used eviction.
///
/// Values are cloned out on hits, so `V` should be cheap to clone or
/// wrapped in shared ownership by the caller.
#[derive(Debug)]
pub struct MemoCache<K, V> {
    capacity: usize,
    map: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K: Eq + Hash + Clone, V: Clone> MemoCache<K, V> {
    /// A cache holding up to `capacity` entries; 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        MemoCache {
            capacity,
            map: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// Maximum number of entries retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Look up `key`, refreshing its recency on a hit.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let value = self.map.get(key).cloned()?;
        self.touch(key);
        Some(value)
    }

    /// Insert or replace `key`, evicting the least recently used entry if
    /// the cache is full. Replacing an existing key refreshes its recency.
    pub fn insert(&mut self, key: K, value: V) {
        if self.map.insert(key.clone(), value).is_some() {
            self.touch(&key);
            return;
        }
        self.order.push_back(key);
        if self.map.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.map.remove(&evicted);
            }
        }
    }

    fn touch(&mut self, key: &K) {
        if let Some(pos) = self.order.iter().position(|held| held == key) {
            if let Some(held) = self.order.remove(pos) {
                self.order.push_back(held);
            }
        }
    }
}

/// On-disk cache of grid tensors, one `.npy` file per parameter set.
#[derive(Debug, Clone)]
pub struct GridCache {
    dir: PathBuf,
    shape: GridShape,
}

impl GridCache {
    /// A cache rooted at `dir` expecting tensors of `shape`.
    pub fn new(dir: impl Into<PathBuf>, shape: GridShape) -> Self {
        GridCache { dir: dir.into(), shape }
    }

    /// Directory holding the cache files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the cache file for `params`.
    pub fn path_for(&self, params: &CosmoParams) -> PathBuf {
        self.dir.join(params.cache_filename())
    }

    /// True when the cache file for `params` exists.
    pub fn exists(&self, params: &CosmoParams) -> bool {
        self.path_for(params).exists()
    }

    /// Read and shape-check the cached tensor for `params`.
    ///
    /// # Errors
    /// - `CosmoError::CacheRead` if the file is missing, unreadable, or
    ///   not a 3-d f64 array.
    /// - `CosmoError::CacheShapeMismatch` if the tensor dimensions
    ///   disagree with the expected grid shape.
    pub fn read(&self, params: &CosmoParams) -> CosmoResult<Array3<f64>> {
        let path = self.path_for(params);
        let tensor: Array3<f64> = read_npy(&path).map_err(|err| CosmoError::CacheRead {
            path: path.display().to_string(),
            detail: err.to_string(),
        })?;
        let expected = self.shape.tensor_shape();
        if tensor.dim() != expected {
            return Err(CosmoError::CacheShapeMismatch {
                path: path.display().to_string(),
                expected,
                found: tensor.dim(),
            });
        }
        Ok(tensor)
    }

    /// Persist `tensor` as the cache file for `params`, creating the cache
    /// directory if needed.
    ///
    /// # Errors
    /// - `CosmoError::CacheWrite` if the directory cannot be created or
    ///   the file cannot be written.
    pub fn write(&self, params: &CosmoParams, tensor: &Array3<f64>) -> CosmoResult<()> {
        let path = self.path_for(params);
        std::fs::create_dir_all(&self.dir).map_err(|err| CosmoError::CacheWrite {
            path: path.display().to_string(),
            detail: err.to_string(),
        })?;
        write_npy(&path, tensor).map_err(|err| CosmoError::CacheWrite {
            path: path.display().to_string(),
            detail: err.to_string(),
        })
    }

    /// Return the cached tensor, generating and persisting it on a miss.
    ///
    /// With `allow_generate` false a miss is an error and `generate` is
    /// never invoked.
    ///
    /// # Errors
    /// - `CosmoError::DataUnavailable` on a miss with generation
    ///   disallowed.
    /// - Any error from [`GridCache::read`], `generate`, or
    ///   [`GridCache::write`].
    pub fn load_or_generate<F>(
        &self, params: &CosmoParams, allow_generate: bool, generate: F,
    ) -> CosmoResult<Array3<f64>>
    where
        F: FnOnce() -> CosmoResult<Array3<f64>>,
    {
        if self.exists(params) {
            return self.read(params);
        }
        if !allow_generate {
            return Err(CosmoError::DataUnavailable {
                path: self.path_for(params).display().to_string(),
            });
        }
        let tensor = generate()?;
        self.write(params, &tensor)?;
        Ok(tensor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;
    use tempfile::tempdir;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - MemoCache hit/miss behavior, recency refresh, and LRU eviction.
    // - GridCache bitwise write/read round-trips.
    // - The miss-with-generation-disallowed error path (closure untouched).
    // - Generation on miss, persistence, and shape checking of stale files.
    //
    // They intentionally DO NOT cover:
    // - Tensor contents produced by the solver (generator tests).
    // -------------------------------------------------------------------------

    fn small_params() -> CosmoParams {
        CosmoParams::new(0.2, 3, 1, 0.7, 0.048, 0.96).unwrap()
    }

    fn small_shape() -> GridShape {
        GridShape { om_resolution: 3, h0_resolution: 1, k_num: 2 }
    }

    fn labeled_tensor(shape: GridShape) -> Array3<f64> {
        let (om, h0, row) = shape.tensor_shape();
        Array3::from_shape_fn((om, h0, row), |(i, j, l)| {
            100.0 * i as f64 + 10.0 * j as f64 + l as f64 + 0.25
        })
    }

    #[test]
    // Purpose
    // -------
    // Inserted entries come back on lookup and misses return None.
    //
    // Given
    // -----
    // - A capacity-4 cache with two entries.
    //
    // Expect
    // ------
    // - Hits return the stored values; an absent key returns None.
    fn memo_cache_round_trips_entries() {
        // Arrange
        let mut cache: MemoCache<u64, f64> = MemoCache::new(4);

        // Act
        cache.insert(1, 10.0);
        cache.insert(2, 20.0);

        // Assert
        assert_eq!(cache.get(&1), Some(10.0));
        assert_eq!(cache.get(&2), Some(20.0));
        assert_eq!(cache.get(&3), None);
        assert_eq!(cache.len(), 2);
        assert!(!cache.is_empty());
    }

    #[test]
    // Purpose
    // -------
    // A hit refreshes recency, so the refreshed entry survives the next
    // eviction and the stale one goes first.
    //
    // Given
    // -----
    // - A capacity-2 cache with entries 1 and 2; entry 1 is read, then
    //   entry 3 is inserted.
    //
    // Expect
    // ------
    // - Entry 2 is evicted; entries 1 and 3 remain.
    fn memo_cache_evicts_least_recently_used() {
        // Arrange
        let mut cache: MemoCache<u64, &'static str> = MemoCache::new(2);
        cache.insert(1, "one");
        cache.insert(2, "two");

        // Act
        cache.get(&1);
        cache.insert(3, "three");

        // Assert
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&1), Some("one"));
        assert_eq!(cache.get(&3), Some("three"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    // Purpose
    // -------
    // Replacing an existing key updates the value in place without growing
    // the cache, and refreshes its recency.
    //
    // Given
    // -----
    // - A capacity-2 cache with entries 1 and 2; entry 1 is re-inserted
    //   with a new value, then entry 3 is inserted.
    //
    // Expect
    // ------
    // - Entry 1 holds the new value and survives; entry 2 is evicted.
    fn memo_cache_replaces_in_place_and_refreshes() {
        // Arrange
        let mut cache: MemoCache<u64, f64> = MemoCache::new(2);
        cache.insert(1, 1.0);
        cache.insert(2, 2.0);

        // Act
        cache.insert(1, 1.5);
        cache.insert(3, 3.0);

        // Assert
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), Some(1.5));
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&3), Some(3.0));
    }

    #[test]
    // Purpose
    // -------
    // A requested capacity of 0 still retains the most recent entry.
    //
    // Given
    // -----
    // - A cache built with capacity 0 receiving two inserts.
    //
    // Expect
    // ------
    // - Capacity reports 1; only the latest entry is retained.
    fn memo_cache_treats_zero_capacity_as_one() {
        // Arrange
        let mut cache: MemoCache<u64, f64> = MemoCache::new(0);

        // Act
        cache.insert(1, 1.0);
        cache.insert(2, 2.0);

        // Assert
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(2.0));
    }

    #[test]
    // Purpose
    // -------
    // A written grid tensor reads back bit for bit.
    //
    // Given
    // -----
    // - A labeled 3×1×7 tensor written to a temporary cache directory.
    //
    // Expect
    // ------
    // - The file exists under the fingerprint name and the tensor read
    //   back is bitwise identical.
    fn grid_cache_round_trips_tensors_bitwise() {
        // Arrange
        let dir = tempdir().unwrap();
        let params = small_params();
        let cache = GridCache::new(dir.path(), small_shape());
        let tensor = labeled_tensor(small_shape());

        // Act
        cache.write(&params, &tensor).unwrap();
        let restored = cache.read(&params).unwrap();

        // Assert
        assert!(cache.exists(&params));
        assert!(cache.path_for(&params).ends_with(params.cache_filename()));
        assert_eq!(restored.dim(), tensor.dim());
        for (a, b) in tensor.iter().zip(restored.iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    // Purpose
    // -------
    // A miss with generation disallowed reports the expected path and
    // never invokes the generation closure.
    //
    // Given
    // -----
    // - An empty cache directory and allow_generate = false.
    //
    // Expect
    // ------
    // - DataUnavailable naming the fingerprint file; the closure flag
    //   stays untouched.
    fn grid_cache_miss_without_generation_is_an_error() {
        // Arrange
        let dir = tempdir().unwrap();
        let params = small_params();
        let cache = GridCache::new(dir.path(), small_shape());
        let mut invoked = false;

        // Act
        let result = cache.load_or_generate(&params, false, || {
            invoked = true;
            Ok(labeled_tensor(small_shape()))
        });

        // Assert
        assert!(!invoked, "generation closure must not run when disallowed");
        match result {
            Err(CosmoError::DataUnavailable { path }) => {
                assert!(path.contains(&params.cache_filename()));
            }
            other => panic!("expected DataUnavailable, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // A miss with generation allowed runs the closure once, persists the
    // tensor, and later loads skip generation.
    //
    // Given
    // -----
    // - An empty cache directory and a counting generation closure.
    //
    // Expect
    // ------
    // - One generation; the file exists afterwards; a second load with
    //   generation disallowed succeeds and matches bitwise.
    fn grid_cache_generates_once_and_persists() {
        // Arrange
        let dir = tempdir().unwrap();
        let params = small_params();
        let cache = GridCache::new(dir.path(), small_shape());
        let mut calls = 0;

        // Act
        let generated = cache
            .load_or_generate(&params, true, || {
                calls += 1;
                Ok(labeled_tensor(small_shape()))
            })
            .unwrap();
        let reloaded = cache
            .load_or_generate(&params, false, || {
                panic!("cache file should satisfy the second load")
            })
            .unwrap();

        // Assert
        assert_eq!(calls, 1);
        assert!(cache.exists(&params));
        for (a, b) in generated.iter().zip(reloaded.iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    // Purpose
    // -------
    // A cache file with the wrong tensor shape is rejected instead of
    // being served.
    //
    // Given
    // -----
    // - A 2×1×7 tensor staged under the name a 3×1×7 cache expects.
    //
    // Expect
    // ------
    // - CacheShapeMismatch reporting both shapes.
    fn grid_cache_rejects_stale_shapes() {
        // Arrange
        let dir = tempdir().unwrap();
        let params = small_params();
        let cache = GridCache::new(dir.path(), small_shape());
        let stale = Array3::<f64>::zeros((2, 1, 7));
        write_npy(cache.path_for(&params), &stale).unwrap();

        // Act
        let result = cache.read(&params);

        // Assert
        match result {
            Err(CosmoError::CacheShapeMismatch { expected, found, .. }) => {
                assert_eq!(expected, (3, 1, 7));
                assert_eq!(found, (2, 1, 7));
            }
            other => panic!("expected CacheShapeMismatch, got {other:?}"),
        }
    }
}

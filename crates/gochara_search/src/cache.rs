//! Memoized year computations.
//!
//! Results are keyed by (year, location, sample interval) and evicted in
//! insertion order once the capacity is exceeded. Computation runs outside
//! the lock; when two callers miss on the same key concurrently, the first
//! insert wins and both receive the stored result.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock};

use gochara_core::{GeoLocation, PositionOracle};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::SearchError;
use crate::search_types::SearchConfig;
use crate::year::{YearResult, compute_year};

/// Default maximum number of cached years.
pub const DEFAULT_CACHE_CAPACITY: usize = 20;

/// Bit-exact cache key. `-0.0` and `0.0` coordinates share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    year: i32,
    latitude_bits: u64,
    longitude_bits: u64,
    altitude_bits: u64,
    interval_bits: u64,
}

impl CacheKey {
    fn new(year: i32, location: &GeoLocation, sample_interval_hours: f64) -> Self {
        let bits = |x: f64| (x + 0.0).to_bits();
        Self {
            year,
            latitude_bits: bits(location.latitude_deg),
            longitude_bits: bits(location.longitude_deg),
            altitude_bits: bits(location.altitude_m),
            interval_bits: bits(sample_interval_hours),
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<CacheKey, Arc<YearResult>>,
    insertion_order: VecDeque<CacheKey>,
}

/// Result of [`YearCache::get_or_compute`].
#[derive(Debug, Clone, Serialize)]
pub struct YearOutcome {
    #[serde(flatten)]
    pub result: Arc<YearResult>,
    /// The result came from the cache without any oracle calls.
    pub cached: bool,
}

/// Thread-safe bounded cache in front of [`compute_year`].
pub struct YearCache {
    oracle: Arc<dyn PositionOracle>,
    config: SearchConfig,
    capacity: usize,
    state: RwLock<CacheState>,
}

impl std::fmt::Debug for YearCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YearCache")
            .field("oracle", &self.oracle.name())
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

impl YearCache {
    /// Cache with [`DEFAULT_CACHE_CAPACITY`].
    pub fn new(oracle: Arc<dyn PositionOracle>, config: SearchConfig) -> Result<Self, SearchError> {
        Self::with_capacity(oracle, config, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(
        oracle: Arc<dyn PositionOracle>,
        config: SearchConfig,
        capacity: usize,
    ) -> Result<Self, SearchError> {
        config.validate().map_err(SearchError::InvalidConfig)?;
        if capacity == 0 {
            return Err(SearchError::InvalidConfig(
                "cache capacity must be greater than zero",
            ));
        }
        Ok(Self {
            oracle,
            config,
            capacity,
            state: RwLock::new(CacheState::default()),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, year: i32, location: &GeoLocation, sample_interval_hours: f64) -> bool {
        let key = CacheKey::new(year, location, sample_interval_hours);
        self.read().entries.contains_key(&key)
    }

    pub fn clear(&self) {
        let mut state = self.write();
        state.entries.clear();
        state.insertion_order.clear();
    }

    /// Cached result for the key, computing and storing it on a miss.
    ///
    /// Failed computations are not cached.
    pub fn get_or_compute(
        &self,
        year: i32,
        location: GeoLocation,
        sample_interval_hours: f64,
    ) -> Result<YearOutcome, SearchError> {
        let key = CacheKey::new(year, &location, sample_interval_hours);
        if let Some(result) = self.read().entries.get(&key) {
            debug!(year, "year cache hit");
            return Ok(YearOutcome {
                result: Arc::clone(result),
                cached: true,
            });
        }

        let computed = Arc::new(compute_year(
            self.oracle.as_ref(),
            year,
            location,
            sample_interval_hours,
            &self.config,
        )?);

        let mut state = self.write();
        if let Some(existing) = state.entries.get(&key) {
            debug!(year, "concurrent computation already stored; discarding ours");
            return Ok(YearOutcome {
                result: Arc::clone(existing),
                cached: false,
            });
        }
        state.entries.insert(key, Arc::clone(&computed));
        state.insertion_order.push_back(key);
        while state.insertion_order.len() > self.capacity {
            if let Some(oldest) = state.insertion_order.pop_front() {
                state.entries.remove(&oldest);
                info!(year = oldest.year, "evicted year from cache");
            }
        }

        Ok(YearOutcome {
            result: computed,
            cached: false,
        })
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_zero_shares_key() {
        let a = CacheKey::new(2024, &GeoLocation::from_lat_lon(0.0, -0.0), 12.0);
        let b = CacheKey::new(2024, &GeoLocation::from_lat_lon(0.0, 0.0), 12.0);
        assert_eq!(a, b);
    }

    #[test]
    fn interval_is_part_of_key() {
        let loc = GeoLocation::from_lat_lon(40.7128, -74.0060);
        assert_ne!(CacheKey::new(2024, &loc, 12.0), CacheKey::new(2024, &loc, 6.0));
    }

    // Compile-time assertion: the cache is shared across request threads.
    #[allow(dead_code)]
    const _: () = {
        fn assert_send_sync<T: Send + Sync>() {}
        fn check() {
            assert_send_sync::<YearCache>();
        }
    };
}

//! Result cache behaviour: hits, eviction order, failures, concurrency.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use gochara_core::{Body, EclipticPosition, GeoLocation, OracleError, PositionOracle};
use gochara_search::{SearchConfig, SearchError, YearCache};
use gochara_time::{Instant, J2000_JD};

/// Every body advances at its own constant rate; counts calls.
struct CountingOracle {
    calls: AtomicU64,
    fail_all: bool,
}

impl CountingOracle {
    fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
            fail_all: false,
        }
    }

    fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::new()
        }
    }

    fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PositionOracle for CountingOracle {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn position_at(
        &self,
        instant: Instant,
        body: Body,
        location: &GeoLocation,
        _topocentric: bool,
    ) -> Result<EclipticPosition, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all {
            return Err(OracleError::Unavailable {
                body,
                reason: "offline".into(),
            });
        }
        let rate = match body {
            Body::Sun => 0.9856,
            Body::Moon => 13.176,
            _ => 0.5,
        };
        let days = instant.jd() - J2000_JD;
        Ok(EclipticPosition {
            longitude_deg: 280.0 + rate * days + location.longitude_deg * 1e-3,
            latitude_deg: 0.0,
            distance_au: 1.0,
        })
    }
}

fn sun_only() -> SearchConfig {
    let mut config = SearchConfig::for_bodies(&[Body::Sun]);
    config.aspects.clear();
    config
}

fn nyc() -> GeoLocation {
    GeoLocation::from_lat_lon(40.7128, -74.0060)
}

#[test]
fn second_call_is_cached_with_zero_oracle_calls() {
    let oracle = Arc::new(CountingOracle::new());
    let cache = YearCache::new(oracle.clone(), SearchConfig::for_bodies(&[Body::Sun, Body::Moon]))
        .unwrap();

    let first = cache.get_or_compute(2024, nyc(), 12.0).unwrap();
    assert!(!first.cached);
    let calls_after_first = oracle.calls();
    assert!(calls_after_first > 0);
    assert_eq!(first.result.stats.oracle_calls, calls_after_first);

    let second = cache.get_or_compute(2024, nyc(), 12.0).unwrap();
    assert!(second.cached);
    assert_eq!(oracle.calls(), calls_after_first);
    assert!(Arc::ptr_eq(&first.result, &second.result));
    assert_eq!(*first.result, *second.result);
}

#[test]
fn distinct_keys_compute_separately() {
    let oracle = Arc::new(CountingOracle::new());
    let cache = YearCache::new(oracle.clone(), sun_only()).unwrap();

    cache.get_or_compute(2024, nyc(), 12.0).unwrap();
    let other_interval = cache.get_or_compute(2024, nyc(), 6.0).unwrap();
    let other_place = cache
        .get_or_compute(2024, GeoLocation::from_lat_lon(51.5, -0.1), 12.0)
        .unwrap();
    assert!(!other_interval.cached);
    assert!(!other_place.cached);
    assert_eq!(cache.len(), 3);
    assert!(cache.contains(2024, &nyc(), 6.0));
    assert!(!cache.contains(2025, &nyc(), 12.0));
}

#[test]
fn eviction_drops_oldest_insertion() {
    let oracle = Arc::new(CountingOracle::new());
    let cache = YearCache::with_capacity(oracle, sun_only(), 3).unwrap();
    assert_eq!(cache.capacity(), 3);

    for year in 2020..=2023 {
        cache.get_or_compute(year, nyc(), 24.0).unwrap();
    }
    assert_eq!(cache.len(), 3);
    assert!(!cache.contains(2020, &nyc(), 24.0));
    for year in 2021..=2023 {
        assert!(cache.contains(year, &nyc(), 24.0), "{year} missing");
    }
}

#[test]
fn hits_do_not_refresh_insertion_order() {
    let oracle = Arc::new(CountingOracle::new());
    let cache = YearCache::with_capacity(oracle, sun_only(), 2).unwrap();

    cache.get_or_compute(2020, nyc(), 24.0).unwrap();
    cache.get_or_compute(2021, nyc(), 24.0).unwrap();
    assert!(cache.get_or_compute(2020, nyc(), 24.0).unwrap().cached);
    cache.get_or_compute(2022, nyc(), 24.0).unwrap();

    assert!(!cache.contains(2020, &nyc(), 24.0));
    assert!(cache.contains(2021, &nyc(), 24.0));
    assert!(cache.contains(2022, &nyc(), 24.0));
}

#[test]
fn failed_computation_is_not_cached() {
    let oracle = Arc::new(CountingOracle::failing());
    let cache = YearCache::new(oracle, sun_only()).unwrap();

    let err = cache.get_or_compute(2024, nyc(), 12.0).unwrap_err();
    assert_eq!(err, SearchError::NoSamples { year: 2024 });
    assert!(cache.is_empty());
}

#[test]
fn invalid_requests_are_rejected() {
    let oracle = Arc::new(CountingOracle::new());
    let cache = YearCache::new(oracle.clone(), sun_only()).unwrap();

    let bad_location = GeoLocation::from_lat_lon(95.0, 0.0);
    assert!(matches!(
        cache.get_or_compute(2024, bad_location, 12.0),
        Err(SearchError::InvalidConfig(_))
    ));
    assert!(matches!(
        cache.get_or_compute(2024, nyc(), 0.0),
        Err(SearchError::InvalidConfig(_))
    ));
    assert!(matches!(
        cache.get_or_compute(20_000, nyc(), 12.0),
        Err(SearchError::InvalidTime(_))
    ));
    assert_eq!(oracle.calls(), 0);

    assert!(YearCache::with_capacity(oracle, sun_only(), 0).is_err());
}

#[test]
fn clear_empties_cache() {
    let oracle = Arc::new(CountingOracle::new());
    let cache = YearCache::new(oracle, sun_only()).unwrap();
    cache.get_or_compute(2024, nyc(), 24.0).unwrap();
    assert!(!cache.is_empty());
    cache.clear();
    assert!(cache.is_empty());
    assert!(!cache.get_or_compute(2024, nyc(), 24.0).unwrap().cached);
}

#[test]
fn concurrent_misses_share_one_stored_result() {
    let oracle = Arc::new(CountingOracle::new());
    let cache = YearCache::new(oracle, sun_only()).unwrap();

    let outcomes: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| cache.get_or_compute(2024, nyc(), 12.0).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(cache.len(), 1);
    let stored = cache.get_or_compute(2024, nyc(), 12.0).unwrap();
    for outcome in outcomes {
        assert!(Arc::ptr_eq(&outcome.result, &stored.result));
    }
}

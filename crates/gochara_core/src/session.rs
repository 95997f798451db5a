//! Per-computation query context.
//!
//! A `QuerySession` binds one oracle to one observation location for the
//! whole of a computation. The location is fixed at construction and passed
//! explicitly on every call, so concurrent computations for different
//! locations can share an oracle without interleaving location state.

use std::cell::Cell;

use gochara_time::Instant;
use serde::Serialize;

use crate::angle::normalize_360;
use crate::{Body, EclipticPosition, GeoLocation, OracleError, PositionOracle};

/// Telemetry from one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryStats {
    /// Oracle calls issued, successful or not.
    pub oracle_calls: u64,
    /// Calls that returned an error.
    pub failures: u64,
}

/// Immutable oracle + location binding for a single computation.
///
/// Not `Sync`: a session belongs to the thread running its computation.
pub struct QuerySession<'a> {
    oracle: &'a dyn PositionOracle,
    location: GeoLocation,
    topocentric: bool,
    stats: Cell<QueryStats>,
}

impl std::fmt::Debug for QuerySession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuerySession")
            .field("oracle", &self.oracle.name())
            .field("location", &self.location)
            .field("topocentric", &self.topocentric)
            .field("stats", &self.stats.get())
            .finish()
    }
}

impl<'a> QuerySession<'a> {
    pub fn new(oracle: &'a dyn PositionOracle, location: GeoLocation, topocentric: bool) -> Self {
        Self {
            oracle,
            location,
            topocentric,
            stats: Cell::new(QueryStats::default()),
        }
    }

    pub fn location(&self) -> &GeoLocation {
        &self.location
    }

    pub fn topocentric(&self) -> bool {
        self.topocentric
    }

    pub fn stats(&self) -> QueryStats {
        self.stats.get()
    }

    /// Full ecliptic position of `body` at `instant`.
    pub fn position(&self, instant: Instant, body: Body) -> Result<EclipticPosition, OracleError> {
        let mut stats = self.stats.get();
        stats.oracle_calls += 1;
        let result = self
            .oracle
            .position_at(instant, body, &self.location, self.topocentric)
            .and_then(|pos| {
                if pos.longitude_deg.is_finite() {
                    Ok(pos)
                } else {
                    Err(OracleError::NonFinite { body })
                }
            });
        if result.is_err() {
            stats.failures += 1;
        }
        self.stats.set(stats);
        result
    }

    /// Ecliptic longitude of `body` at `instant`, normalized to [0, 360).
    pub fn longitude(&self, instant: Instant, body: Body) -> Result<f64, OracleError> {
        self.position(instant, body)
            .map(|pos| normalize_360(pos.longitude_deg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedOracle;

    impl PositionOracle for FixedOracle {
        fn position_at(
            &self,
            instant: Instant,
            body: Body,
            location: &GeoLocation,
            _topocentric: bool,
        ) -> Result<EclipticPosition, OracleError> {
            if body == Body::Pluto {
                return Err(OracleError::OutOfRange {
                    body,
                    jd: instant.jd(),
                });
            }
            Ok(EclipticPosition {
                longitude_deg: -10.0 + location.longitude_deg,
                latitude_deg: 0.0,
                distance_au: 1.0,
            })
        }
    }

    #[test]
    fn longitude_is_normalized_and_uses_session_location() {
        let oracle = FixedOracle;
        let session = QuerySession::new(&oracle, GeoLocation::from_lat_lon(0.0, 5.0), false);
        let t = Instant::year_start(2024).unwrap();
        let lon = session.longitude(t, Body::Sun).unwrap();
        assert!((lon - 355.0).abs() < 1e-12);
    }

    #[test]
    fn stats_count_calls_and_failures() {
        let oracle = FixedOracle;
        let session = QuerySession::new(&oracle, GeoLocation::from_lat_lon(0.0, 0.0), true);
        let t = Instant::year_start(2024).unwrap();
        assert!(session.longitude(t, Body::Mars).is_ok());
        assert!(session.longitude(t, Body::Pluto).is_err());
        assert_eq!(
            session.stats(),
            QueryStats {
                oracle_calls: 2,
                failures: 1
            }
        );
    }
}

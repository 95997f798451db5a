//! Position sampler: longitudes on an even grid across a time span.
//!
//! The oracle is queried for longitude only. Speed is the wrap-normalized
//! chord between consecutive samples of the same body. A body with no
//! predecessor sample gets a ±1 minute central difference instead, and a
//! speed of 0 when that also fails.

use gochara_core::{Body, QuerySession};
use gochara_time::Instant;
use tracing::{debug, warn};

use crate::error::SearchError;
use crate::sample_types::{BodySample, SampleFrame};
use crate::search_util::{chord_speed, speed_at};

/// Half-width of the fallback central difference.
const FALLBACK_STEP_SECONDS: f64 = 60.0;

/// Default spacing of the sample grid, in hours.
pub const DEFAULT_SAMPLE_INTERVAL_HOURS: f64 = 12.0;
/// Finest accepted sample spacing (one minute).
pub const MIN_SAMPLE_INTERVAL_HOURS: f64 = 1.0 / 60.0;
/// Coarsest accepted sample spacing (one week).
pub const MAX_SAMPLE_INTERVAL_HOURS: f64 = 24.0 * 7.0;
/// Largest grid one call will build (a year at one-minute spacing is ~527k).
const MAX_GRID_POINTS: f64 = 10_000_000.0;

/// Validate a requested sample interval.
pub fn validate_sample_interval(hours: f64) -> Result<(), &'static str> {
    if !hours.is_finite() || !(MIN_SAMPLE_INTERVAL_HOURS..=MAX_SAMPLE_INTERVAL_HOURS).contains(&hours)
    {
        return Err("sample_interval_hours must be between one minute and one week");
    }
    Ok(())
}

/// Sample `bodies` from 00:00 UTC on January 1st of `year` to the start of
/// the following year, every `sample_interval_hours`.
///
/// Fails with [`SearchError::NoSamples`] when no frame holds any sample.
pub fn sample_year(
    session: &QuerySession<'_>,
    year: i32,
    sample_interval_hours: f64,
    bodies: &[Body],
) -> Result<Vec<SampleFrame>, SearchError> {
    let start = Instant::year_start(year)?;
    let end = Instant::year_start(year + 1)?;
    let frames = sample_range(session, start, end, sample_interval_hours, bodies)?;
    if frames.is_empty() {
        return Err(SearchError::NoSamples { year });
    }
    Ok(frames)
}

/// Sample `bodies` at `start + k * interval` for every grid point up to and
/// including `end`.
///
/// Frames in which every query failed are dropped; the result may be empty.
pub fn sample_range(
    session: &QuerySession<'_>,
    start: Instant,
    end: Instant,
    sample_interval_hours: f64,
    bodies: &[Body],
) -> Result<Vec<SampleFrame>, SearchError> {
    validate_sample_interval(sample_interval_hours).map_err(SearchError::InvalidConfig)?;
    if end < start {
        return Err(SearchError::InvalidConfig("end must not precede start"));
    }

    let interval_days = sample_interval_hours / 24.0;
    let grid_steps = (end.days_since(start) / interval_days + 1e-9).floor();
    if grid_steps.is_nan() || grid_steps >= MAX_GRID_POINTS {
        return Err(SearchError::InvalidConfig("sample grid too large"));
    }
    let steps = grid_steps as usize;

    // Previous grid point's (longitude) per body, None when absent there.
    let mut previous: Vec<Option<f64>> = vec![None; bodies.len()];
    let mut frames = Vec::with_capacity(steps + 1);
    let mut failures = 0usize;

    for k in 0..=steps {
        let instant = start.add_days(k as f64 * interval_days);
        let mut samples = Vec::with_capacity(bodies.len());

        for (slot, &body) in previous.iter_mut().zip(bodies) {
            let longitude = match session.longitude(instant, body) {
                Ok(lon) => lon,
                Err(err) => {
                    failures += 1;
                    debug!(%body, %instant, error = %err, "sample dropped");
                    *slot = None;
                    continue;
                }
            };
            let speed = match *slot {
                Some(prev_lon) => chord_speed(prev_lon, longitude, interval_days),
                None => speed_at(session, body, instant, FALLBACK_STEP_SECONDS).unwrap_or_else(
                    |err| {
                        warn!(%body, %instant, error = %err, "speed fallback failed; using 0");
                        0.0
                    },
                ),
            };
            *slot = Some(longitude);
            samples.push(BodySample {
                instant,
                body,
                longitude_deg: longitude,
                speed_deg_per_day: speed,
            });
        }

        let frame = SampleFrame { instant, samples };
        if !frame.is_empty() {
            frames.push(frame);
        }
    }

    debug!(
        frames = frames.len(),
        bodies = bodies.len(),
        failures,
        "sampling complete"
    );
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gochara_core::{EclipticPosition, GeoLocation, OracleError, PositionOracle};

    /// Sun at 1°/day from 350° at 2024-01-01; Mars fails before 2024-01-02.
    struct LinearOracle {
        t0: Instant,
    }

    impl PositionOracle for LinearOracle {
        fn position_at(
            &self,
            instant: Instant,
            body: Body,
            _location: &GeoLocation,
            _topocentric: bool,
        ) -> Result<EclipticPosition, OracleError> {
            let days = instant.days_since(self.t0);
            if body == Body::Mars && days < 1.0 {
                return Err(OracleError::Unavailable {
                    body,
                    reason: "test gap".into(),
                });
            }
            let rate = if body == Body::Mars { -0.25 } else { 1.0 };
            Ok(EclipticPosition {
                longitude_deg: 350.0 + rate * days,
                latitude_deg: 0.0,
                distance_au: 1.0,
            })
        }
    }

    fn session_for(oracle: &LinearOracle) -> QuerySession<'_> {
        QuerySession::new(oracle, GeoLocation::from_lat_lon(0.0, 0.0), false)
    }

    #[test]
    fn grid_includes_end_when_aligned() {
        let t0 = Instant::year_start(2024).unwrap();
        let oracle = LinearOracle { t0 };
        let session = session_for(&oracle);
        let frames = sample_range(&session, t0, t0.add_days(2.0), 12.0, &[Body::Sun]).unwrap();
        assert_eq!(frames.len(), 5);
        assert!(frames.windows(2).all(|w| w[0].instant < w[1].instant));
    }

    #[test]
    fn speed_is_chord_and_wraps() {
        let t0 = Instant::year_start(2024).unwrap();
        let oracle = LinearOracle { t0 };
        let session = session_for(&oracle);
        let frames = sample_range(&session, t0, t0.add_days(20.0), 12.0, &[Body::Sun]).unwrap();
        for frame in &frames {
            let s = frame.sample(Body::Sun).unwrap();
            assert!((s.speed_deg_per_day - 1.0).abs() < 1e-6, "{}", s.speed_deg_per_day);
            assert!((0.0..360.0).contains(&s.longitude_deg));
        }
    }

    #[test]
    fn failed_body_absent_only_in_its_frames() {
        let t0 = Instant::year_start(2024).unwrap();
        let oracle = LinearOracle { t0 };
        let session = session_for(&oracle);
        let frames =
            sample_range(&session, t0, t0.add_days(2.0), 12.0, &[Body::Sun, Body::Mars]).unwrap();
        assert_eq!(frames.len(), 5);
        assert!(frames[0].sample(Body::Mars).is_none());
        assert!(frames[1].sample(Body::Mars).is_none());
        // No predecessor, and the -1 min sample falls in the gap.
        let first_mars = frames[2].sample(Body::Mars).unwrap();
        assert_eq!(first_mars.speed_deg_per_day, 0.0);
        let second_mars = frames[3].sample(Body::Mars).unwrap();
        assert!((second_mars.speed_deg_per_day + 0.25).abs() < 1e-6);
        assert!(frames.iter().all(|f| f.sample(Body::Sun).is_some()));
    }

    #[test]
    fn all_failed_frames_are_dropped() {
        let t0 = Instant::year_start(2024).unwrap();
        let oracle = LinearOracle { t0 };
        let session = session_for(&oracle);
        let frames = sample_range(&session, t0, t0.add_hours(12.0), 6.0, &[Body::Mars]).unwrap();
        assert!(frames.is_empty());
    }

    #[test]
    fn rejects_non_positive_interval() {
        let t0 = Instant::year_start(2024).unwrap();
        let oracle = LinearOracle { t0 };
        let session = session_for(&oracle);
        let err = sample_range(&session, t0, t0.add_days(1.0), 0.0, &[Body::Sun]).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_degenerate_grids_without_querying() {
        let t0 = Instant::year_start(2024).unwrap();
        let oracle = LinearOracle { t0 };
        let session = session_for(&oracle);
        for hours in [1e-300, f64::MIN_POSITIVE, 1e-4, f64::NAN, 1e9] {
            let err =
                sample_range(&session, t0, t0.add_days(1.0), hours, &[Body::Sun]).unwrap_err();
            assert!(matches!(err, SearchError::InvalidConfig(_)), "{hours}");
            assert!(matches!(
                sample_year(&session, 2024, hours, &[Body::Sun]),
                Err(SearchError::InvalidConfig(_))
            ));
        }
        // A valid interval over an enormous span.
        let far = t0.add_days(1e12);
        let err = sample_range(&session, t0, far, 1.0, &[Body::Sun]).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));
        assert_eq!(session.stats().oracle_calls, 0);
    }
}

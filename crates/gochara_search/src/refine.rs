//! Event refiner: narrow a candidate's bracket to an exact instant.
//!
//! - Ingress: bisection on the signed distance to the shared sign edge.
//! - Station: bisection on sign(speed), then a coarse and a fine scan of
//!   |speed| over a widened window, since the true extremum can lie
//!   outside the sampled bracket.
//! - Aspect: hour, minute, second scans of |separation − angle|. The
//!   deviation is not monotonic near its minimum, so no bisection. The hour
//!   window grows until its minimum is interior, for pairs slow enough to
//!   enter orb days before exactness.
//!
//! An oracle failure anywhere in a refinement abandons it; the event is
//! reported at the bracket's end sample with the sampled longitudes.

use gochara_core::{
    Body, OracleError, QuerySession, ZodiacSign, angular_separation, normalize_to_pm180,
};
use gochara_time::Instant;
use tracing::warn;

use crate::event_types::{
    AspectEvent, Bracket, CandidateEvent, Event, IngressEvent, StationEvent, StationType,
};
use crate::scanner::is_retrograde_crossing;
use crate::search_types::{AspectKind, RefineConfig};
use crate::search_util::{align_down, bisect_zero, scan_minimum, speed_at};

/// Fraction of the bracket to step inside when the endpoint speeds agree.
const STATION_PROBE_FRACTION: f64 = 0.1;

/// Refine one candidate into an event. Never fails: see module docs.
pub fn refine(
    session: &QuerySession<'_>,
    candidate: &CandidateEvent,
    config: &RefineConfig,
) -> Event {
    match *candidate {
        CandidateEvent::Ingress {
            body,
            from_sign,
            to_sign,
            bracket,
            start_longitude,
            end_longitude,
        } => {
            let is_retrograde = is_retrograde_crossing(start_longitude, end_longitude);
            let boundary = if is_retrograde {
                from_sign.start_longitude()
            } else {
                to_sign.start_longitude()
            };
            let (instant, longitude_deg) =
                refine_ingress(session, body, bracket, boundary, config).unwrap_or_else(|err| {
                    warn!(%body, error = %err, "ingress refinement failed; using sample instant");
                    (bracket.end, end_longitude)
                });
            Event::Ingress(IngressEvent {
                body,
                from_sign,
                to_sign,
                instant,
                longitude_deg,
                is_retrograde,
            })
        }
        CandidateEvent::Station {
            body,
            bracket,
            start_speed,
            end_longitude,
            ..
        } => {
            let station_type = if start_speed > 0.0 {
                StationType::Retrograde
            } else {
                StationType::Direct
            };
            let (instant, longitude_deg) = refine_station(session, body, bracket, config)
                .unwrap_or_else(|err| {
                    warn!(%body, error = %err, "station refinement failed; using sample instant");
                    (bracket.end, end_longitude)
                });
            Event::Station(StationEvent {
                body,
                station_type,
                instant,
                longitude_deg,
                sign: ZodiacSign::from_longitude(longitude_deg),
            })
        }
        CandidateEvent::Aspect {
            body_a,
            body_b,
            aspect,
            bracket,
            end_longitude_a,
            end_longitude_b,
        } => Event::Aspect(
            refine_aspect(session, body_a, body_b, aspect, bracket, config).unwrap_or_else(
                |err| {
                    warn!(%body_a, %body_b, %aspect, error = %err,
                        "aspect refinement failed; using sample instant");
                    AspectEvent {
                        body_a,
                        body_b,
                        aspect,
                        instant: bracket.end,
                        orb_deg: (angular_separation(end_longitude_a, end_longitude_b)
                            - aspect.angle_deg())
                        .abs(),
                        longitude_a: end_longitude_a,
                        longitude_b: end_longitude_b,
                    }
                },
            ),
        ),
    }
}

// ---------------------------------------------------------------------------
// Ingress
// ---------------------------------------------------------------------------

/// Returns the crossing instant and the longitude there.
fn refine_ingress(
    session: &QuerySession<'_>,
    body: Body,
    bracket: Bracket,
    boundary: f64,
    config: &RefineConfig,
) -> Result<(Instant, f64), OracleError> {
    let offset = |t: Instant| -> Result<f64, OracleError> {
        Ok(normalize_to_pm180(session.longitude(t, body)? - boundary))
    };
    let f_start = offset(bracket.start)?;
    let t = bisect_zero(
        bracket.start,
        f_start,
        bracket.end,
        config.max_iterations,
        config.convergence_seconds,
        offset,
    )?;
    Ok((t, session.longitude(t, body)?))
}

// ---------------------------------------------------------------------------
// Station
// ---------------------------------------------------------------------------

/// Returns the station instant and the longitude there.
fn refine_station(
    session: &QuerySession<'_>,
    body: Body,
    bracket: Bracket,
    config: &RefineConfig,
) -> Result<(Instant, f64), OracleError> {
    let speed = |t: Instant| speed_at(session, body, t, config.derivative_step_seconds);

    // (i) sign bisection
    let bisected = bisect_station(bracket, config, &speed)?;
    let mut best = match bisected {
        Some(t) => Some((t, speed(t)?.abs())),
        None => None,
    };

    if config.multi_stage {
        // (ii) coarse |speed| scan over the padded bracket. Chord speeds
        // place the sign change up to half an interval before the bracket.
        let pad_hours = config.station_window_hours.max(0.5 * bracket.width_hours());
        let (t_coarse, v_coarse) = scan_minimum(
            bracket.start.add_hours(-pad_hours),
            bracket.end.add_hours(pad_hours),
            config.station_coarse_step_seconds,
            |t| speed(t).map(f64::abs),
        )?;
        let wide_seconds = config.station_wide_radius_minutes * 60.0;
        let radius_seconds = match bisected {
            Some(t_bis) if t_coarse.seconds_since(t_bis).abs() > wide_seconds => wide_seconds,
            _ => config.station_fine_radius_minutes * 60.0,
        };
        if best.is_none_or(|(_, v)| v_coarse < v) {
            best = Some((t_coarse, v_coarse));
        }

        // (iii) fine scan around the best so far
        let center = best.map_or(t_coarse, |(t, _)| t);
        let (t_fine, v_fine) = scan_minimum(
            center.add_seconds(-radius_seconds),
            center.add_seconds(radius_seconds),
            config.station_fine_step_seconds,
            |t| speed(t).map(f64::abs),
        )?;
        if best.is_none_or(|(_, v)| v_fine < v) {
            best = Some((t_fine, v_fine));
        }
    }

    let t = best.map_or_else(|| bracket.start.midpoint(bracket.end), |(t, _)| t);
    Ok((t, session.longitude(t, body)?))
}

/// Bisect on the sign of speed, probing inside the bracket when the
/// endpoint speeds agree. `None` when no opposite-signed pair is found.
fn bisect_station<F>(
    bracket: Bracket,
    config: &RefineConfig,
    speed: &F,
) -> Result<Option<Instant>, OracleError>
where
    F: Fn(Instant) -> Result<f64, OracleError>,
{
    let inset_seconds = bracket.end.seconds_since(bracket.start) * STATION_PROBE_FRACTION;
    let attempts = [
        (bracket.start, bracket.end),
        (
            bracket.start.add_seconds(inset_seconds),
            bracket.end.add_seconds(-inset_seconds),
        ),
    ];
    for (t_a, t_b) in attempts {
        let v_a = speed(t_a)?;
        let v_b = speed(t_b)?;
        if v_a * v_b < 0.0 {
            let root = bisect_zero(
                t_a,
                v_a,
                t_b,
                config.max_iterations,
                config.convergence_seconds,
                speed,
            )?;
            return Ok(Some(root));
        }
    }
    Ok(None)
}

// ---------------------------------------------------------------------------
// Aspect
// ---------------------------------------------------------------------------

const HOUR_SECONDS: f64 = 3600.0;
const MINUTE_SECONDS: f64 = 60.0;
/// Times the hour scan may grow by its padding on one side.
const MAX_ASPECT_WINDOW_EXTENSIONS: usize = 8;

fn refine_aspect(
    session: &QuerySession<'_>,
    body_a: Body,
    body_b: Body,
    aspect: AspectKind,
    bracket: Bracket,
    config: &RefineConfig,
) -> Result<AspectEvent, OracleError> {
    let angle = aspect.angle_deg();
    let deviation = |t: Instant| -> Result<f64, OracleError> {
        let lon_a = session.longitude(t, body_a)?;
        let lon_b = session.longitude(t, body_b)?;
        Ok((angular_separation(lon_a, lon_b) - angle).abs())
    };

    let pad_hours = config.aspect_window_hours.max(2.0 * bracket.width_hours());
    let mut window_start = align_down(bracket.start.add_hours(-pad_hours), HOUR_SECONDS);
    let mut window_end = bracket.end.add_hours(pad_hours);

    // Stage 1: whole hours across the window, widened by the padding while
    // the minimum sits on an edge.
    let (mut best_t, mut best_v) =
        scan_minimum(window_start, window_end, HOUR_SECONDS, deviation)?;
    for _ in 0..MAX_ASPECT_WINDOW_EXTENSIONS {
        if best_t == window_start {
            let new_start = window_start.add_hours(-pad_hours);
            let (t, v) = scan_minimum(new_start, window_start, HOUR_SECONDS, deviation)?;
            window_start = new_start;
            if v < best_v {
                (best_t, best_v) = (t, v);
            }
        } else if window_end.seconds_since(best_t) < HOUR_SECONDS {
            let edge = best_t;
            window_end = window_end.add_hours(pad_hours);
            let (t, v) = scan_minimum(edge, window_end, HOUR_SECONDS, deviation)?;
            if v < best_v {
                (best_t, best_v) = (t, v);
            }
        } else {
            break;
        }
    }

    // Stage 2: every minute of the best hour and its neighbours.
    (best_t, _) = scan_minimum(
        best_t.add_seconds(-HOUR_SECONDS),
        best_t.add_seconds(HOUR_SECONDS),
        MINUTE_SECONDS,
        deviation,
    )?;

    // Stage 3: every second of the best minute and its neighbours.
    if config.multi_stage {
        (best_t, _) = scan_minimum(
            best_t.add_seconds(-MINUTE_SECONDS),
            best_t.add_seconds(MINUTE_SECONDS),
            1.0,
            deviation,
        )?;
    }

    let longitude_a = session.longitude(best_t, body_a)?;
    let longitude_b = session.longitude(best_t, body_b)?;
    Ok(AspectEvent {
        body_a,
        body_b,
        aspect,
        instant: best_t,
        orb_deg: (angular_separation(longitude_a, longitude_b) - angle).abs(),
        longitude_a,
        longitude_b,
    })
}

//! Numerical primitives shared by the refiners.

use gochara_core::{Body, OracleError, QuerySession, normalize_to_pm180};
use gochara_time::{Instant, SECONDS_PER_DAY};

/// Bisect to find the zero crossing of a scalar function between `t_a` and `t_b`.
///
/// `f_a` is the function value at `t_a`. Each step keeps the half whose
/// endpoint signs differ. Stops when the bracket is narrower than
/// `convergence_seconds` or after `max_iter` halvings, and returns the
/// midpoint of the final bracket.
pub(crate) fn bisect_zero<F, E>(
    mut t_a: Instant,
    mut f_a: f64,
    mut t_b: Instant,
    max_iter: u32,
    convergence_seconds: f64,
    mut f_at: F,
) -> Result<Instant, E>
where
    F: FnMut(Instant) -> Result<f64, E>,
{
    for _ in 0..max_iter {
        let t_mid = t_a.midpoint(t_b);
        let f_mid = f_at(t_mid)?;

        if f_a * f_mid <= 0.0 {
            t_b = t_mid;
        } else {
            t_a = t_mid;
            f_a = f_mid;
        }

        if t_b.seconds_since(t_a).abs() < convergence_seconds {
            break;
        }
    }

    Ok(t_a.midpoint(t_b))
}

/// Most grid points [`scan_minimum`] evaluates after `start`.
const MAX_SCAN_STEPS: f64 = 1_000_000.0;

/// Evaluate `f_at` on the grid `start + k * step_seconds` up to and including
/// `end`, returning the grid point with the smallest value.
///
/// Ties keep the earliest point. `start` is always evaluated, even when it
/// lies after `end`. A step that is not positive, or too small for the span,
/// is widened so the grid holds at most `MAX_SCAN_STEPS` points.
pub(crate) fn scan_minimum<F, E>(
    start: Instant,
    end: Instant,
    step_seconds: f64,
    mut f_at: F,
) -> Result<(Instant, f64), E>
where
    F: FnMut(Instant) -> Result<f64, E>,
{
    let span = end.seconds_since(start).max(0.0);
    let raw_steps = span / step_seconds;
    let (step_seconds, steps) = if span == 0.0 {
        (0.0, 0)
    } else if raw_steps.is_finite() && (0.0..=MAX_SCAN_STEPS).contains(&raw_steps) {
        (step_seconds, (raw_steps + 1e-9).floor() as u64)
    } else if span.is_finite() {
        (span / MAX_SCAN_STEPS, MAX_SCAN_STEPS as u64)
    } else {
        (0.0, 0)
    };

    let mut best = (start, f_at(start)?);
    for k in 1..=steps {
        let t = start.add_seconds(k as f64 * step_seconds);
        let value = f_at(t)?;
        if value < best.1 {
            best = (t, value);
        }
    }
    Ok(best)
}

/// Round `t` down to a multiple of `step_seconds` since UTC midnight.
///
/// `step_seconds` should divide a day (3600, 60, 1).
pub(crate) fn align_down(t: Instant, step_seconds: f64) -> Instant {
    let seconds_of_day = (t.jd() - 0.5).rem_euclid(1.0) * SECONDS_PER_DAY;
    t.add_seconds(-seconds_of_day.rem_euclid(step_seconds))
}

/// Wrap-aware mean speed between two longitudes, in degrees per day.
pub(crate) fn chord_speed(lon_from: f64, lon_to: f64, elapsed_days: f64) -> f64 {
    normalize_to_pm180(lon_to - lon_from) / elapsed_days
}

/// Instantaneous longitude speed by central difference over `±step_seconds`.
pub(crate) fn speed_at(
    session: &QuerySession<'_>,
    body: Body,
    t: Instant,
    step_seconds: f64,
) -> Result<f64, OracleError> {
    let before = session.longitude(t.add_seconds(-step_seconds), body)?;
    let after = session.longitude(t.add_seconds(step_seconds), body)?;
    Ok(chord_speed(before, after, 2.0 * step_seconds / SECONDS_PER_DAY))
}

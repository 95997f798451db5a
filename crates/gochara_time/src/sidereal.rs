//! Greenwich mean and local sidereal time.
//!
//! UT1 is approximated by UTC; the difference (< 0.9 s) is far below what the
//! topocentric correction that consumes these angles can resolve.
//!
//! Source: IAU 1982 GMST expression in degrees (Meeus, Astronomical
//! Algorithms, Eq. 12.4). Public domain.

use crate::instant::Instant;
use crate::julian::J2000_JD;

/// Greenwich Mean Sidereal Time in degrees [0, 360).
pub fn gmst_deg(instant: Instant) -> f64 {
    let d = instant.jd() - J2000_JD;
    let t = d / 36_525.0;
    let gmst = 280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;
    gmst.rem_euclid(360.0)
}

/// Local Sidereal Time in degrees [0, 360) for an east-positive longitude.
pub fn local_sidereal_time_deg(instant: Instant, longitude_east_deg: f64) -> f64 {
    (gmst_deg(instant) + longitude_east_deg).rem_euclid(360.0)
}

//! Angle normalization helpers shared by the oracle and the search engine.

/// Normalize an angle to [0, 360) degrees.
pub fn normalize_360(deg: f64) -> f64 {
    let r = deg % 360.0;
    // `r + 360.0` can round up to exactly 360.0 for tiny negative `r`.
    if r < 0.0 {
        let wrapped = r + 360.0;
        if wrapped >= 360.0 { 0.0 } else { wrapped }
    } else {
        r
    }
}

/// Normalize an angle to (-180, +180].
pub fn normalize_to_pm180(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}

/// Shortest arc between two longitudes, in [0, 180].
pub fn angular_separation(lon_a: f64, lon_b: f64) -> f64 {
    normalize_to_pm180(lon_a - lon_b).abs()
}

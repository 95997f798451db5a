//! Diurnal parallax: shift a geocentric ecliptic position to an observer
//! on the Earth's surface.

use gochara_core::{GeoLocation, normalize_360};
use gochara_time::{Instant, local_sidereal_time_deg};

/// Equatorial radius of the Earth (WGS-84) in km.
const EARTH_RADIUS_KM: f64 = 6_378.137;
/// Astronomical unit in km (IAU 2012).
pub(crate) const AU_KM: f64 = 149_597_870.7;

/// Mean obliquity of the ecliptic in degrees (linear term of IAU 1980).
pub(crate) fn mean_obliquity_deg(t: f64) -> f64 {
    23.439_291 - 0.013_004_2 * t
}

/// Convert geocentric `(lon, lat, dist_au)` to topocentric for `location`.
///
/// The Earth is treated as a sphere; flattening changes the Moon's
/// parallax by under 0.2′.
pub(crate) fn apply_parallax(
    lon_deg: f64,
    lat_deg: f64,
    dist_au: f64,
    instant: Instant,
    location: &GeoLocation,
) -> (f64, f64, f64) {
    let eps = mean_obliquity_deg(instant.centuries_since_j2000()).to_radians();
    let (se, ce) = eps.sin_cos();

    let (sl, cl) = lon_deg.to_radians().sin_cos();
    let (sb, cb) = lat_deg.to_radians().sin_cos();
    // ecliptic → equatorial
    let x = dist_au * cb * cl;
    let y = dist_au * (cb * sl * ce - sb * se);
    let z = dist_au * (cb * sl * se + sb * ce);

    let rho = (EARTH_RADIUS_KM + location.altitude_m / 1_000.0) / AU_KM;
    let theta = local_sidereal_time_deg(instant, location.longitude_deg).to_radians();
    let (sphi, cphi) = location.latitude_deg.to_radians().sin_cos();
    let xt = x - rho * cphi * theta.cos();
    let yt = y - rho * cphi * theta.sin();
    let zt = z - rho * sphi;

    // equatorial → ecliptic
    let ye = yt * ce + zt * se;
    let ze = -yt * se + zt * ce;
    let dist = (xt * xt + ye * ye + ze * ze).sqrt();
    let lon = normalize_360(ye.atan2(xt).to_degrees());
    let lat = (ze / dist).asin().to_degrees();
    (lon, lat, dist)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distant_body_barely_moves() {
        let t = Instant::year_start(2024).unwrap();
        let loc = GeoLocation::from_lat_lon(40.0, -74.0);
        let (lon, lat, _) = apply_parallax(123.0, 1.0, 30.0, t, &loc);
        assert!((lon - 123.0).abs() < 1e-4);
        assert!((lat - 1.0).abs() < 1e-4);
    }

    #[test]
    fn moon_parallax_under_one_and_a_half_degrees() {
        let t = Instant::year_start(2024).unwrap();
        let loc = GeoLocation::from_lat_lon(51.5, 0.0);
        let dist = 384_400.0 / AU_KM;
        let (lon, lat, d) = apply_parallax(200.0, 0.0, dist, t, &loc);
        assert!((d - dist).abs() < 7_000.0 / AU_KM);
        let shift = ((lon - 200.0).powi(2) + lat.powi(2)).sqrt();
        assert!(shift < 1.5, "shift = {shift}");
    }
}

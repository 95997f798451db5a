//! Truncated lunar theory.
//!
//! Largest periodic terms of the ELP-2000/82 series as tabulated in Meeus,
//! Astronomical Algorithms, ch. 47 (terms ≥ 0.03° in longitude). Accuracy is
//! a few hundredths of a degree in longitude, which is adequate for sign and
//! aspect timing to within minutes.

use gochara_core::normalize_360;

/// `(D, M, M', F, coefficient_deg)` for Σ coefficient · sin(argument).
const LONGITUDE_TERMS: [(f64, f64, f64, f64, f64); 13] = [
    (0.0, 0.0, 1.0, 0.0, 6.288_774),
    (2.0, 0.0, -1.0, 0.0, 1.274_027),
    (2.0, 0.0, 0.0, 0.0, 0.658_314),
    (0.0, 0.0, 2.0, 0.0, 0.213_618),
    (0.0, 1.0, 0.0, 0.0, -0.185_116),
    (0.0, 0.0, 0.0, 2.0, -0.114_332),
    (2.0, 0.0, -2.0, 0.0, 0.058_793),
    (2.0, -1.0, -1.0, 0.0, 0.057_066),
    (2.0, 0.0, 1.0, 0.0, 0.053_322),
    (2.0, -1.0, 0.0, 0.0, 0.045_758),
    (0.0, 1.0, -1.0, 0.0, -0.040_923),
    (1.0, 0.0, 0.0, 0.0, -0.034_720),
    (0.0, 1.0, 1.0, 0.0, -0.030_383),
];

const LATITUDE_TERMS: [(f64, f64, f64, f64, f64); 4] = [
    (0.0, 0.0, 0.0, 1.0, 5.128_122),
    (0.0, 0.0, 1.0, 1.0, 0.280_602),
    (0.0, 0.0, 1.0, -1.0, 0.277_693),
    (2.0, 0.0, 0.0, -1.0, 0.173_237),
];

/// `(D, M, M', F, coefficient_km)` for Σ coefficient · cos(argument).
const DISTANCE_TERMS: [(f64, f64, f64, f64, f64); 4] = [
    (0.0, 0.0, 1.0, 0.0, -20_905.355),
    (2.0, 0.0, -1.0, 0.0, -3_699.111),
    (2.0, 0.0, 0.0, 0.0, -2_955.968),
    (0.0, 0.0, 2.0, 0.0, -569.925),
];

const MEAN_DISTANCE_KM: f64 = 385_000.56;

/// Geocentric `(longitude_deg, latitude_deg, distance_km)` of the Moon,
/// referred to the mean equinox of date, at `t` Julian centuries.
pub(crate) fn geocentric_moon(t: f64) -> (f64, f64, f64) {
    let mean_lon = 218.316_447_7 + 481_267.881_234_21 * t;
    let elongation = 297.850_192_1 + 445_267.111_403_4 * t;
    let sun_anomaly = 357.529_109_2 + 35_999.050_290_9 * t;
    let moon_anomaly = 134.963_396_4 + 477_198.867_505_5 * t;
    let arg_latitude = 93.272_095_0 + 483_202.017_523_3 * t;

    let argument = |&(d, m, mp, f, _): &(f64, f64, f64, f64, f64)| {
        (d * elongation + m * sun_anomaly + mp * moon_anomaly + f * arg_latitude).to_radians()
    };

    let lon: f64 = LONGITUDE_TERMS
        .iter()
        .map(|term| term.4 * argument(term).sin())
        .sum();
    let lat: f64 = LATITUDE_TERMS
        .iter()
        .map(|term| term.4 * argument(term).sin())
        .sum();
    let dist: f64 = DISTANCE_TERMS
        .iter()
        .map(|term| term.4 * argument(term).cos())
        .sum();

    (normalize_360(mean_lon + lon), lat, MEAN_DISTANCE_KM + dist)
}

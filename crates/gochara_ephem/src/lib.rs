//! Analytic low-precision position oracle.
//!
//! [`MeanElementOracle`] evaluates mean Keplerian elements for the planets
//! and a truncated lunar series for the Moon. Geocentric longitudes are good
//! to roughly 0.01° for the Sun and a few arcminutes for the planets within
//! 1800–2050, degrading slowly outside. It needs no kernel files, which
//! makes it the default backend for the CLI, tests and benches.
//!
//! Time argument is UTC treated as dynamical time (ΔT ignored, about a
//! minute of lunar motion in the current era).

mod elements;
mod moon;
mod topocentric;

use gochara_core::{
    Body, EclipticPosition, GeoLocation, OracleError, PositionOracle, normalize_360,
};
use gochara_time::Instant;

use elements::{OrbitalElements, heliocentric_position};

/// General precession in longitude, degrees per Julian century.
const PRECESSION_DEG_PER_CENTURY: f64 = 1.396_971_3;

/// Default coverage either side of J2000, in Julian centuries.
pub const DEFAULT_COVERAGE_CENTURIES: f64 = 30.0;

/// Position oracle built on mean orbital elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanElementOracle {
    coverage_centuries: f64,
}

impl Default for MeanElementOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl MeanElementOracle {
    pub fn new() -> Self {
        Self {
            coverage_centuries: DEFAULT_COVERAGE_CENTURIES,
        }
    }

    /// Oracle answering only within `centuries` of J2000.
    ///
    /// Queries outside the window fail with [`OracleError::OutOfRange`].
    pub fn with_coverage(centuries: f64) -> Self {
        Self {
            coverage_centuries: centuries.abs(),
        }
    }

    pub fn coverage_centuries(&self) -> f64 {
        self.coverage_centuries
    }

    fn geocentric(&self, body: Body, t: f64) -> (f64, f64, f64) {
        if body == Body::Moon {
            let (lon, lat, dist_km) = moon::geocentric_moon(t);
            return (lon, lat, dist_km / topocentric::AU_KM);
        }

        let earth = heliocentric_position(&elements::EARTH_MOON_BARYCENTER, t);
        let [x, y, z] = match planet_elements(body) {
            Some(el) => {
                let p = heliocentric_position(el, t);
                [p[0] - earth[0], p[1] - earth[1], p[2] - earth[2]]
            }
            None => [-earth[0], -earth[1], -earth[2]],
        };
        let dist = (x * x + y * y + z * z).sqrt();
        let lon = normalize_360(y.atan2(x).to_degrees() + PRECESSION_DEG_PER_CENTURY * t);
        let lat = (z / dist).asin().to_degrees();
        (lon, lat, dist)
    }
}

fn planet_elements(body: Body) -> Option<&'static OrbitalElements> {
    match body {
        Body::Mercury => Some(&elements::MERCURY),
        Body::Venus => Some(&elements::VENUS),
        Body::Mars => Some(&elements::MARS),
        Body::Jupiter => Some(&elements::JUPITER),
        Body::Saturn => Some(&elements::SATURN),
        Body::Uranus => Some(&elements::URANUS),
        Body::Neptune => Some(&elements::NEPTUNE),
        Body::Pluto => Some(&elements::PLUTO),
        Body::Sun | Body::Moon => None,
    }
}

impl PositionOracle for MeanElementOracle {
    fn name(&self) -> &'static str {
        "mean-elements"
    }

    fn position_at(
        &self,
        instant: Instant,
        body: Body,
        location: &GeoLocation,
        topocentric: bool,
    ) -> Result<EclipticPosition, OracleError> {
        let t = instant.centuries_since_j2000();
        if t.abs() > self.coverage_centuries {
            return Err(OracleError::OutOfRange {
                body,
                jd: instant.jd(),
            });
        }

        let (mut lon, mut lat, mut dist) = self.geocentric(body, t);
        if topocentric {
            (lon, lat, dist) = topocentric::apply_parallax(lon, lat, dist, instant, location);
        }
        if !(lon.is_finite() && lat.is_finite() && dist.is_finite()) {
            return Err(OracleError::NonFinite { body });
        }
        Ok(EclipticPosition {
            longitude_deg: lon,
            latitude_deg: lat,
            distance_au: dist,
        })
    }
}

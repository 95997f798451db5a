//! Bodies, observer locations and the position-oracle seam.
//!
//! The transit engine never computes positions itself. It asks a
//! [`PositionOracle`] for ecliptic coordinates through a [`QuerySession`],
//! which pins the observation location for the lifetime of one computation.

pub mod angle;
pub mod session;
pub mod zodiac;

use std::sync::Arc;

use gochara_time::Instant;
use serde::Serialize;
use thiserror::Error;

pub use angle::{angular_separation, normalize_360, normalize_to_pm180};
pub use session::{QuerySession, QueryStats};
pub use zodiac::{ALL_SIGNS, SIGN_WIDTH_DEG, ZodiacSign};

/// Bodies the engine can track.
///
/// Earth is absent: every query is made from an Earth-bound observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

/// All trackable bodies in traditional order.
pub const ALL_BODIES: [Body; 10] = [
    Body::Sun,
    Body::Moon,
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
    Body::Pluto,
];

impl Body {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sun => "Sun",
            Self::Moon => "Moon",
            Self::Mercury => "Mercury",
            Self::Venus => "Venus",
            Self::Mars => "Mars",
            Self::Jupiter => "Jupiter",
            Self::Saturn => "Saturn",
            Self::Uranus => "Uranus",
            Self::Neptune => "Neptune",
            Self::Pluto => "Pluto",
        }
    }

    /// Case-insensitive lookup by English name.
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_BODIES
            .iter()
            .copied()
            .find(|b| b.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Whether the body shows apparent retrograde motion from Earth.
    ///
    /// The Sun and Moon always advance eastward geocentrically.
    pub const fn can_retrograde(self) -> bool {
        !matches!(self, Self::Sun | Self::Moon)
    }
}

impl std::fmt::Display for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Geographic observation point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoLocation {
    /// Geodetic latitude in degrees, north positive. Range: [-90, 90].
    #[serde(rename = "latitude")]
    pub latitude_deg: f64,
    /// Geodetic longitude in degrees, east positive. Range: [-180, 180].
    #[serde(rename = "longitude")]
    pub longitude_deg: f64,
    /// Altitude above mean sea level in meters.
    #[serde(rename = "altitude")]
    pub altitude_m: f64,
}

impl GeoLocation {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        }
    }

    /// Sea-level location from latitude/longitude.
    pub fn from_lat_lon(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self::new(latitude_deg, longitude_deg, 0.0)
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.latitude_deg.is_finite() || !(-90.0..=90.0).contains(&self.latitude_deg) {
            return Err("latitude must be in [-90, 90]");
        }
        if !self.longitude_deg.is_finite() || !(-180.0..=180.0).contains(&self.longitude_deg) {
            return Err("longitude must be in [-180, 180]");
        }
        if !self.altitude_m.is_finite() {
            return Err("altitude must be finite");
        }
        Ok(())
    }
}

/// Ecliptic coordinates returned by an oracle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EclipticPosition {
    /// Ecliptic longitude in degrees.
    pub longitude_deg: f64,
    /// Ecliptic latitude in degrees.
    pub latitude_deg: f64,
    /// Distance from the observer in astronomical units.
    pub distance_au: f64,
}

/// Failure of a single oracle query.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum OracleError {
    /// The oracle could not answer (backend failure, missing data).
    #[error("position of {body} unavailable: {reason}")]
    Unavailable { body: Body, reason: String },
    /// The requested instant lies outside the oracle's coverage.
    #[error("instant JD {jd} outside oracle coverage for {body}")]
    OutOfRange { body: Body, jd: f64 },
    /// The oracle returned a non-finite coordinate.
    #[error("oracle returned a non-finite longitude for {body}")]
    NonFinite { body: Body },
}

/// External ephemeris: ecliptic position of a body at an instant.
///
/// Calls are synchronous and assumed expensive; callers should keep the
/// count low. Implementations must be shareable across threads because one
/// oracle serves every concurrent year computation.
pub trait PositionOracle: Send + Sync {
    /// Short identifier used in log output.
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn position_at(
        &self,
        instant: Instant,
        body: Body,
        location: &GeoLocation,
        topocentric: bool,
    ) -> Result<EclipticPosition, OracleError>;
}

impl<T: PositionOracle + ?Sized> PositionOracle for &T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn position_at(
        &self,
        instant: Instant,
        body: Body,
        location: &GeoLocation,
        topocentric: bool,
    ) -> Result<EclipticPosition, OracleError> {
        (**self).position_at(instant, body, location, topocentric)
    }
}

impl<T: PositionOracle + ?Sized> PositionOracle for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn position_at(
        &self,
        instant: Instant,
        body: Body,
        location: &GeoLocation,
        topocentric: bool,
    ) -> Result<EclipticPosition, OracleError> {
        (**self).position_at(instant, body, location, topocentric)
    }
}

//! Sampled positions over a year.

use gochara_core::{Body, ZodiacSign};
use gochara_time::Instant;
use serde::Serialize;

/// One body's longitude and estimated speed at a sample instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodySample {
    /// Same as the owning frame's instant.
    #[serde(skip)]
    pub instant: Instant,
    pub body: Body,
    /// Ecliptic longitude in degrees [0, 360).
    #[serde(rename = "longitude")]
    pub longitude_deg: f64,
    /// Signed longitude speed in degrees per day.
    #[serde(rename = "speed")]
    pub speed_deg_per_day: f64,
}

impl BodySample {
    pub fn zodiac_sign(&self) -> ZodiacSign {
        ZodiacSign::from_longitude(self.longitude_deg)
    }
}

/// Every available body sample at one grid instant.
///
/// A body whose oracle query failed at this instant is simply absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleFrame {
    pub instant: Instant,
    pub samples: Vec<BodySample>,
}

impl SampleFrame {
    /// Sample for `body`, if the oracle answered for it at this instant.
    pub fn sample(&self, body: Body) -> Option<&BodySample> {
        self.samples.iter().find(|s| s.body == body)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

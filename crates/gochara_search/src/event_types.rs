//! Candidate and refined event types.

use gochara_core::{Body, ZodiacSign};
use gochara_time::Instant;
use serde::Serialize;

use crate::search_types::AspectKind;

/// Pair of adjacent sample instants enclosing a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bracket {
    pub start: Instant,
    pub end: Instant,
}

impl Bracket {
    pub fn width_hours(&self) -> f64 {
        self.end.days_since(self.start) * 24.0
    }
}

/// A transition between two adjacent frames, awaiting refinement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CandidateEvent {
    /// The body's sign differs between the two samples.
    Ingress {
        body: Body,
        from_sign: ZodiacSign,
        to_sign: ZodiacSign,
        bracket: Bracket,
        start_longitude: f64,
        end_longitude: f64,
    },
    /// The body's sampled speed changed sign.
    Station {
        body: Body,
        bracket: Bracket,
        start_speed: f64,
        end_speed: f64,
        end_longitude: f64,
    },
    /// The pair entered or sat at a local minimum within orb of `aspect`.
    Aspect {
        body_a: Body,
        body_b: Body,
        aspect: AspectKind,
        bracket: Bracket,
        end_longitude_a: f64,
        end_longitude_b: f64,
    },
}

impl CandidateEvent {
    pub fn bracket(&self) -> Bracket {
        match self {
            Self::Ingress { bracket, .. }
            | Self::Station { bracket, .. }
            | Self::Aspect { bracket, .. } => *bracket,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::Ingress { .. } => EventKind::Ingress,
            Self::Station { .. } => EventKind::Station,
            Self::Aspect { .. } => EventKind::Aspect,
        }
    }
}

/// Event discriminant, ordered for tie-breaking in the final event list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Ingress,
    Station,
    Aspect,
}

/// Station type: retrograde or direct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StationType {
    /// Longitude speed crosses from positive to negative.
    Retrograde,
    /// Longitude speed crosses from negative to positive.
    Direct,
}

/// A body crossing from one sign into another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressEvent {
    #[serde(rename = "planet")]
    pub body: Body,
    pub from_sign: ZodiacSign,
    pub to_sign: ZodiacSign,
    #[serde(rename = "exactTimeUtc")]
    pub instant: Instant,
    /// Longitude at the event instant.
    #[serde(rename = "degree")]
    pub longitude_deg: f64,
    /// The crossing runs against the order of the signs.
    pub is_retrograde: bool,
}

/// A body's longitude speed changing sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationEvent {
    #[serde(rename = "planet")]
    pub body: Body,
    pub station_type: StationType,
    #[serde(rename = "exactTimeUtc")]
    pub instant: Instant,
    #[serde(rename = "degree")]
    pub longitude_deg: f64,
    #[serde(rename = "signName")]
    pub sign: ZodiacSign,
}

/// Two bodies at (or closest to) an aspect angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AspectEvent {
    #[serde(rename = "planet1")]
    pub body_a: Body,
    #[serde(rename = "planet2")]
    pub body_b: Body,
    #[serde(rename = "aspectName")]
    pub aspect: AspectKind,
    #[serde(rename = "exactTimeUtc")]
    pub instant: Instant,
    /// Remaining deviation from the exact angle, in degrees.
    #[serde(rename = "orb")]
    pub orb_deg: f64,
    #[serde(rename = "position1")]
    pub longitude_a: f64,
    #[serde(rename = "position2")]
    pub longitude_b: f64,
}

/// A refined transit event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Event {
    Ingress(IngressEvent),
    Station(StationEvent),
    Aspect(AspectEvent),
}

impl Event {
    pub fn instant(&self) -> Instant {
        match self {
            Self::Ingress(e) => e.instant,
            Self::Station(e) => e.instant,
            Self::Aspect(e) => e.instant,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::Ingress(_) => EventKind::Ingress,
            Self::Station(_) => EventKind::Station,
            Self::Aspect(_) => EventKind::Aspect,
        }
    }

    /// Bodies involved; the second is present for aspects only.
    pub fn bodies(&self) -> (Body, Option<Body>) {
        match self {
            Self::Ingress(e) => (e.body, None),
            Self::Station(e) => (e.body, None),
            Self::Aspect(e) => (e.body_a, Some(e.body_b)),
        }
    }

    /// Whether `body` takes part in this event.
    pub fn involves(&self, body: Body) -> bool {
        let (a, b) = self.bodies();
        a == body || b == Some(body)
    }
}

/// Chronological order; simultaneous events by kind, then bodies.
pub(crate) fn chronological(a: &Event, b: &Event) -> std::cmp::Ordering {
    a.instant()
        .cmp(&b.instant())
        .then_with(|| a.kind().cmp(&b.kind()))
        .then_with(|| a.bodies().cmp(&b.bodies()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t() -> Instant {
        Instant::from_calendar(2024, 3, 20, 3.0, 6.0, 0.0).unwrap()
    }

    #[test]
    fn ingress_json_shape() {
        let e = Event::Ingress(IngressEvent {
            body: Body::Sun,
            from_sign: ZodiacSign::Pisces,
            to_sign: ZodiacSign::Aries,
            instant: t(),
            longitude_deg: 0.0,
            is_retrograde: false,
        });
        let json = serde_json::to_value(e).unwrap();
        assert_eq!(json["type"], "ingress");
        assert_eq!(json["planet"], "Sun");
        assert_eq!(json["fromSign"], "Pisces");
        assert_eq!(json["toSign"], "Aries");
        assert_eq!(json["exactTimeUtc"], "2024-03-20T03:06:00Z");
        assert_eq!(json["isRetrograde"], false);
    }

    #[test]
    fn station_and_aspect_json_shape() {
        let s = Event::Station(StationEvent {
            body: Body::Mercury,
            station_type: StationType::Retrograde,
            instant: t(),
            longitude_deg: 27.2,
            sign: ZodiacSign::Aries,
        });
        let json = serde_json::to_value(s).unwrap();
        assert_eq!(json["type"], "station");
        assert_eq!(json["stationType"], "retrograde");
        assert_eq!(json["signName"], "Aries");

        let a = Event::Aspect(AspectEvent {
            body_a: Body::Sun,
            body_b: Body::Moon,
            aspect: AspectKind::Opposition,
            instant: t(),
            orb_deg: 0.01,
            longitude_a: 0.0,
            longitude_b: 180.01,
        });
        let json = serde_json::to_value(a).unwrap();
        assert_eq!(json["type"], "aspect");
        assert_eq!(json["planet1"], "Sun");
        assert_eq!(json["planet2"], "Moon");
        assert_eq!(json["aspectName"], "opposition");
        assert!(json.get("position2").is_some());
    }

    #[test]
    fn ties_order_by_kind_then_body() {
        let ingress = Event::Ingress(IngressEvent {
            body: Body::Mars,
            from_sign: ZodiacSign::Leo,
            to_sign: ZodiacSign::Virgo,
            instant: t(),
            longitude_deg: 150.0,
            is_retrograde: false,
        });
        let station = Event::Station(StationEvent {
            body: Body::Sun,
            station_type: StationType::Direct,
            instant: t(),
            longitude_deg: 10.0,
            sign: ZodiacSign::Aries,
        });
        let mut v = vec![station, ingress];
        v.sort_by(chronological);
        assert_eq!(v[0].kind(), EventKind::Ingress);
        assert!(v[1].involves(Body::Sun));
    }
}

//! UTC calendar date/time with sub-second precision.
//!
//! `UtcTime` is the broken-down form of an [`Instant`]; the two convert
//! losslessly to within a millisecond.

use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::TimeError;
use crate::instant::Instant;

/// UTC calendar date with sub-second precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtcTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

impl UtcTime {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Convert to an [`Instant`], validating every component.
    pub fn to_instant(&self) -> Result<Instant, TimeError> {
        Instant::from_calendar(
            self.year,
            self.month,
            self.day,
            self.hour as f64,
            self.minute as f64,
            self.second,
        )
    }

    /// Broken-down calendar form of `instant`.
    pub fn from_instant(instant: Instant) -> Self {
        instant.to_calendar()
    }
}

impl std::fmt::Display for UtcTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let whole = self.second as u32;
        let frac = self.second - whole as f64;
        if frac.abs() < 1e-9 {
            write!(
                f,
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
                self.year, self.month, self.day, self.hour, self.minute, whole
            )
        } else {
            write!(
                f,
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:09.6}Z",
                self.year, self.month, self.day, self.hour, self.minute, self.second
            )
        }
    }
}

impl FromStr for UtcTime {
    type Err = TimeError;

    /// Parse `"YYYY-MM-DDThh:mm:ssZ"`, `"YYYY-MM-DDThh:mm:ss"` or `"YYYY-MM-DD"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_end_matches('Z');
        let (date, time) = match s.split_once('T') {
            Some((d, t)) => (d, Some(t)),
            None => (s, None),
        };

        // A leading '-' belongs to the year, not the separator.
        let (sign, date_body) = match date.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, date),
        };
        let date_parts: Vec<&str> = date_body.split('-').collect();
        if date_parts.len() != 3 {
            return Err(TimeError::Parse(format!("expected YYYY-MM-DD, got {s}")));
        }
        let year: i32 = parse_field(date_parts[0], "year")?;
        let month: u32 = parse_field(date_parts[1], "month")?;
        let day: u32 = parse_field(date_parts[2], "day")?;

        let (hour, minute, second) = match time {
            None => (0, 0, 0.0),
            Some(t) => {
                let time_parts: Vec<&str> = t.split(':').collect();
                if time_parts.len() != 3 {
                    return Err(TimeError::Parse(format!("expected hh:mm:ss, got {t}")));
                }
                (
                    parse_field(time_parts[0], "hour")?,
                    parse_field(time_parts[1], "minute")?,
                    parse_field(time_parts[2], "second")?,
                )
            }
        };

        let utc = Self::new(sign * year, month, day, hour, minute, second);
        // Reject impossible dates at parse time rather than on first use.
        utc.to_instant()?;
        Ok(utc)
    }
}

fn parse_field<T: FromStr>(raw: &str, name: &str) -> Result<T, TimeError> {
    raw.parse()
        .map_err(|_| TimeError::Parse(format!("invalid {name}: {raw:?}")))
}

impl Serialize for UtcTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_constructor() {
        let t = UtcTime::new(2024, 3, 20, 12, 30, 45.5);
        assert_eq!(t.year, 2024);
        assert_eq!(t.month, 3);
        assert_eq!(t.day, 20);
        assert_eq!(t.hour, 12);
        assert_eq!(t.minute, 30);
        assert!((t.second - 45.5).abs() < 1e-12);
    }

    #[test]
    fn display_whole_seconds() {
        let t = UtcTime::new(2024, 1, 15, 0, 0, 0.0);
        assert_eq!(t.to_string(), "2024-01-15T00:00:00Z");
    }

    #[test]
    fn display_fractional_seconds() {
        let t = UtcTime::new(2024, 1, 15, 12, 30, 45.123);
        let s = t.to_string();
        assert!(s.contains("12:30:"), "got: {s}");
    }

    #[test]
    fn parse_full() {
        let t: UtcTime = "2024-03-20T03:06:12Z".parse().unwrap();
        assert_eq!(t, UtcTime::new(2024, 3, 20, 3, 6, 12.0));
    }

    #[test]
    fn parse_date_only() {
        let t: UtcTime = "2024-12-31".parse().unwrap();
        assert_eq!(t, UtcTime::new(2024, 12, 31, 0, 0, 0.0));
    }

    #[test]
    fn parse_negative_year() {
        let t: UtcTime = "-0500-06-01T00:00:00Z".parse().unwrap();
        assert_eq!(t.year, -500);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("2024/03/20".parse::<UtcTime>().is_err());
        assert!("2024-03-20T12:00".parse::<UtcTime>().is_err());
        assert!("2023-02-29T00:00:00Z".parse::<UtcTime>().is_err());
        assert!("2024-xx-01".parse::<UtcTime>().is_err());
    }

    #[test]
    fn instant_roundtrip() {
        let t = UtcTime::new(1969, 7, 20, 20, 17, 40.25);
        let back = UtcTime::from_instant(t.to_instant().unwrap());
        assert_eq!((back.year, back.month, back.day), (1969, 7, 20));
        assert_eq!((back.hour, back.minute), (20, 17));
        assert!((back.second - 40.25).abs() < 1e-3);
    }
}

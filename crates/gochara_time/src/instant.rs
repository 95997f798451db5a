//! The engine's continuous time coordinate.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};

use crate::error::TimeError;
use crate::julian::{
    MAX_JD, MAX_YEAR, MIN_JD, MIN_YEAR, SECONDS_PER_DAY, UNIX_EPOCH_JD, civil_from_days,
    clamped_day_count, days_from_civil, days_in_month, jd_to_centuries,
};
use crate::utc_time::UtcTime;

/// A UTC instant stored as a Julian Date.
///
/// Construction rejects non-finite values and dates outside the supported
/// years, so every constructed `Instant` is finite and the ordering below is
/// total. Arithmetic on finite instants with finite
/// durations stays finite for any span the engine works with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instant {
    jd: f64,
}

impl Instant {
    /// Create an instant from a Julian Date (UTC) within `MIN_JD..=MAX_JD`.
    pub fn from_jd(jd: f64) -> Result<Self, TimeError> {
        if !jd.is_finite() {
            return Err(TimeError::InvalidTime("julian date must be finite"));
        }
        if !(MIN_JD..=MAX_JD).contains(&jd) {
            return Err(TimeError::InvalidTime("julian date outside supported years"));
        }
        Ok(Self { jd })
    }

    /// Create an instant from calendar components.
    ///
    /// Hour, minute and second may carry fractions (`hour = 6.5` is 06:30).
    /// `hour = 24.0` denotes the end of the given day.
    pub fn from_calendar(
        year: i32,
        month: u32,
        day: u32,
        hour: f64,
        minute: f64,
        second: f64,
    ) -> Result<Self, TimeError> {
        if !(hour.is_finite() && minute.is_finite() && second.is_finite()) {
            return Err(TimeError::InvalidTime("time components must be finite"));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(TimeError::InvalidTime("year out of supported range"));
        }
        if !(1..=12).contains(&month) {
            return Err(TimeError::InvalidTime("month must be in 1..=12"));
        }
        if day == 0 || day > days_in_month(year, month) {
            return Err(TimeError::InvalidTime("day out of range for month"));
        }
        if !(0.0..=24.0).contains(&hour) {
            return Err(TimeError::InvalidTime("hour must be in [0, 24]"));
        }
        if !(0.0..60.0).contains(&minute) {
            return Err(TimeError::InvalidTime("minute must be in [0, 60)"));
        }
        if !(0.0..61.0).contains(&second) {
            return Err(TimeError::InvalidTime("second must be in [0, 61)"));
        }

        let seconds_of_day = hour * 3600.0 + minute * 60.0 + second;
        let days = days_from_civil(year, month, day) as f64;
        Ok(Self {
            jd: UNIX_EPOCH_JD + days + seconds_of_day / SECONDS_PER_DAY,
        })
    }

    /// 00:00 UTC on January 1st of `year`.
    pub fn year_start(year: i32) -> Result<Self, TimeError> {
        Self::from_calendar(year, 1, 1, 0.0, 0.0, 0.0)
    }

    /// Julian Date (UTC).
    pub fn jd(self) -> f64 {
        self.jd
    }

    /// Julian centuries since J2000.0.
    pub fn centuries_since_j2000(self) -> f64 {
        jd_to_centuries(self.jd)
    }

    pub fn add_days(self, days: f64) -> Self {
        Self { jd: self.jd + days }
    }

    pub fn add_hours(self, hours: f64) -> Self {
        self.add_days(hours / 24.0)
    }

    pub fn add_seconds(self, seconds: f64) -> Self {
        self.add_days(seconds / SECONDS_PER_DAY)
    }

    /// Signed elapsed days from `earlier` to `self`.
    pub fn days_since(self, earlier: Instant) -> f64 {
        self.jd - earlier.jd
    }

    /// Signed elapsed seconds from `earlier` to `self`.
    pub fn seconds_since(self, earlier: Instant) -> f64 {
        self.days_since(earlier) * SECONDS_PER_DAY
    }

    /// Instant halfway between `self` and `other`.
    pub fn midpoint(self, other: Instant) -> Self {
        Self {
            jd: 0.5 * (self.jd + other.jd),
        }
    }

    /// Convert to UTC calendar components.
    ///
    /// Seconds are resolved to the microsecond; a value that rounds up to
    /// midnight rolls over into the next day. Instants pushed past the
    /// supported years by arithmetic clamp to the range ends.
    pub fn to_calendar(self) -> UtcTime {
        let since_epoch = self.jd - UNIX_EPOCH_JD;
        let mut days = since_epoch.floor();
        let mut micros = ((since_epoch - days) * SECONDS_PER_DAY * 1e6).round();
        if micros >= SECONDS_PER_DAY * 1e6 {
            days += 1.0;
            micros -= SECONDS_PER_DAY * 1e6;
        }
        let (year, month, day) = civil_from_days(clamped_day_count(days));
        let total_seconds = micros / 1e6;
        let hour = (total_seconds / 3600.0).floor();
        let minute = ((total_seconds - hour * 3600.0) / 60.0).floor();
        let second = total_seconds - hour * 3600.0 - minute * 60.0;
        UtcTime::new(year, month, day, hour as u32, minute as u32, second)
    }

    /// ISO-8601 UTC string rounded to the nearest whole second.
    pub fn to_iso_string(self) -> String {
        let rounded = self.add_seconds(0.5).to_calendar();
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            rounded.year,
            rounded.month,
            rounded.day,
            rounded.hour,
            rounded.minute,
            rounded.second.floor() as u32
        )
    }
}

impl Eq for Instant {}

impl PartialOrd for Instant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Instant {
    fn cmp(&self, other: &Self) -> Ordering {
        self.jd.total_cmp(&other.jd)
    }
}

impl Display for Instant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}

impl Serialize for Instant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::julian::J2000_JD;

    #[test]
    fn j2000_from_calendar() {
        let t = Instant::from_calendar(2000, 1, 1, 12.0, 0.0, 0.0).unwrap();
        assert!((t.jd() - J2000_JD).abs() < 1e-9);
        assert!(t.centuries_since_j2000().abs() < 1e-12);
    }

    #[test]
    fn fractional_hours() {
        let a = Instant::from_calendar(2024, 3, 20, 6.5, 0.0, 0.0).unwrap();
        let b = Instant::from_calendar(2024, 3, 20, 6.0, 30.0, 0.0).unwrap();
        assert!(a.seconds_since(b).abs() < 1e-3);
    }

    #[test]
    fn rejects_non_finite() {
        assert!(Instant::from_jd(f64::NAN).is_err());
        assert!(Instant::from_jd(f64::INFINITY).is_err());
        assert!(Instant::from_calendar(2024, 1, 1, f64::NAN, 0.0, 0.0).is_err());
        assert!(Instant::from_calendar(2024, 1, 1, 0.0, 0.0, f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn rejects_julian_dates_outside_supported_years() {
        assert!(matches!(Instant::from_jd(1e300), Err(TimeError::InvalidTime(_))));
        assert!(matches!(Instant::from_jd(1e13), Err(TimeError::InvalidTime(_))));
        assert!(Instant::from_jd(-1e13).is_err());
        assert!(Instant::from_jd(MAX_JD + 1.0).is_err());

        let first = Instant::from_jd(MIN_JD).unwrap().to_calendar();
        assert_eq!((first.year, first.month, first.day), (MIN_YEAR, 1, 1));
        let last = Instant::from_jd(MAX_JD - 0.5).unwrap().to_calendar();
        assert_eq!((last.year, last.month, last.day, last.hour), (MAX_YEAR, 12, 31, 12));
    }

    #[test]
    fn arithmetic_past_range_does_not_panic() {
        let far = Instant::year_start(2024).unwrap().add_days(1e300);
        assert_eq!(far.to_calendar().year, MAX_YEAR + 1);
    }

    #[test]
    fn rejects_out_of_range_components() {
        assert!(Instant::from_calendar(2023, 2, 29, 0.0, 0.0, 0.0).is_err());
        assert!(Instant::from_calendar(2024, 13, 1, 0.0, 0.0, 0.0).is_err());
        assert!(Instant::from_calendar(2024, 1, 0, 0.0, 0.0, 0.0).is_err());
        assert!(Instant::from_calendar(2024, 1, 1, 25.0, 0.0, 0.0).is_err());
        assert!(Instant::from_calendar(2024, 1, 1, 0.0, 60.0, 0.0).is_err());
        assert!(Instant::from_calendar(10_000, 1, 1, 0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn end_of_day_rolls_to_next_date() {
        let t = Instant::from_calendar(2024, 12, 31, 24.0, 0.0, 0.0).unwrap();
        let cal = t.to_calendar();
        assert_eq!((cal.year, cal.month, cal.day, cal.hour), (2025, 1, 1, 0));
    }

    #[test]
    fn calendar_roundtrip_sub_millisecond() {
        let t = Instant::from_calendar(2024, 2, 29, 23.0, 59.0, 59.999).unwrap();
        let cal = t.to_calendar();
        let back = cal.to_instant().unwrap();
        assert!(back.seconds_since(t).abs() < 1e-3);
    }

    #[test]
    fn ordering_and_arithmetic() {
        let a = Instant::year_start(2024).unwrap();
        let b = a.add_hours(12.0);
        assert!(a < b);
        assert!((b.days_since(a) - 0.5).abs() < 1e-12);
        assert!((a.midpoint(b).seconds_since(a) - 21_600.0).abs() < 1e-3);
        assert_eq!(a.add_seconds(30.0).max(a), a.add_seconds(30.0));
    }

    #[test]
    fn iso_string_rounds_to_second() {
        let t = Instant::from_calendar(2024, 3, 20, 3.0, 6.0, 11.6).unwrap();
        assert_eq!(t.to_iso_string(), "2024-03-20T03:06:12Z");
        assert_eq!(t.to_string(), "2024-03-20T03:06:12Z");
    }
}

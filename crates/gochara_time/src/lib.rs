//! Time coordinate for the gochara transit engine.
//!
//! This crate provides:
//! - [`Instant`], a totally ordered continuous UTC time coordinate (Julian Date)
//! - [`UtcTime`], its calendar form, with ISO-8601 display and parsing
//! - Proleptic Gregorian calendar ↔ Julian Date conversions
//! - Greenwich and local sidereal time

pub mod error;
pub mod instant;
pub mod julian;
pub mod sidereal;
pub mod utc_time;

pub use error::TimeError;
pub use instant::Instant;
pub use julian::{
    DAYS_PER_CENTURY, J2000_JD, MAX_JD, MAX_YEAR, MIN_JD, MIN_YEAR, SECONDS_PER_DAY,
    UNIX_EPOCH_JD, calendar_to_jd, days_in_month, is_leap_year, jd_to_calendar, jd_to_centuries,
};
pub use sidereal::{gmst_deg, local_sidereal_time_deg};
pub use utc_time::UtcTime;

/// Calendar components → instant. Alias of [`Instant::from_calendar`].
pub fn to_instant(
    year: i32,
    month: u32,
    day: u32,
    hour: f64,
    minute: f64,
    second: f64,
) -> Result<Instant, TimeError> {
    Instant::from_calendar(year, month, day, hour, minute, second)
}

/// Instant → calendar components. Alias of [`Instant::to_calendar`].
pub fn to_calendar(instant: Instant) -> UtcTime {
    instant.to_calendar()
}

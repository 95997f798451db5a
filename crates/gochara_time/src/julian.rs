//! Julian Date ↔ proleptic Gregorian calendar conversion.
//!
//! Day counting uses integer era arithmetic (400-year Gregorian cycles of
//! 146 097 days) anchored at the Unix epoch, so every representable date maps
//! to a unique day number with no floating-point drift in the date part.

/// Julian Date of J2000.0 (2000-Jan-01 12:00).
pub const J2000_JD: f64 = 2_451_545.0;

/// Julian Date of 1970-Jan-01 00:00 UTC.
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Seconds in one civil day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Days in one Julian century.
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Earliest and latest supported calendar years.
pub const MIN_YEAR: i32 = -9999;
pub const MAX_YEAR: i32 = 9999;

/// Julian Date of `MIN_YEAR`-01-01 00:00 UTC.
pub const MIN_JD: f64 = UNIX_EPOCH_JD + days_from_civil(MIN_YEAR, 1, 1) as f64;
/// Julian Date of the midnight ending `MAX_YEAR`-12-31.
pub const MAX_JD: f64 = UNIX_EPOCH_JD + days_from_civil(MAX_YEAR + 1, 1, 1) as f64;

/// Gregorian leap-year rule.
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`. Returns 0 for an invalid month.
pub const fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Days from 1970-01-01 to the given civil date.
pub(crate) const fn days_from_civil(year: i32, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year as i64 - 1 } else { year as i64 };
    let era = (if y >= 0 { y } else { y - 399 }) / 400;
    let yoe = y - era * 400;
    let mp = (month as i64 + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Day count since 1970-01-01 for a floored day value, clamped to the
/// supported calendar range.
pub(crate) fn clamped_day_count(days: f64) -> i64 {
    let lo = days_from_civil(MIN_YEAR, 1, 1);
    let hi = days_from_civil(MAX_YEAR + 1, 1, 1);
    (days as i64).clamp(lo, hi)
}

/// Civil date for a day count since 1970-01-01.
pub(crate) fn civil_from_days(days: i64) -> (i32, u32, u32) {
    let z = days + 719_468;
    let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year as i32, month, day)
}

/// Convert a calendar date with fractional day to a Julian Date.
///
/// `day_frac` is 1-based: `1.5` is noon on the first of the month. Values
/// past the end of the month roll into the following month.
pub fn calendar_to_jd(year: i32, month: u32, day_frac: f64) -> f64 {
    UNIX_EPOCH_JD + days_from_civil(year, month, 1) as f64 + (day_frac - 1.0)
}

/// Convert a Julian Date to `(year, month, day_frac)`.
///
/// Dates outside `MIN_JD..=MAX_JD` clamp to the nearest end of the range.
pub fn jd_to_calendar(jd: f64) -> (i32, u32, f64) {
    let since_epoch = jd.clamp(MIN_JD, MAX_JD) - UNIX_EPOCH_JD;
    let whole = since_epoch.floor();
    let (year, month, day) = civil_from_days(clamped_day_count(whole));
    (year, month, day as f64 + (since_epoch - whole))
}

/// Julian centuries elapsed since J2000.0.
pub fn jd_to_centuries(jd: f64) -> f64 {
    (jd - J2000_JD) / DAYS_PER_CENTURY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn j2000_noon() {
        assert!((calendar_to_jd(2000, 1, 1.5) - J2000_JD).abs() < 1e-9);
    }

    #[test]
    fn unix_epoch() {
        assert!((calendar_to_jd(1970, 1, 1.0) - UNIX_EPOCH_JD).abs() < 1e-9);
    }

    #[test]
    fn meeus_sputnik_example() {
        // Meeus, Astronomical Algorithms, Example 7.a: 1957-Oct-04.81 → JD 2436116.31
        assert!((calendar_to_jd(1957, 10, 4.81) - 2_436_116.31).abs() < 1e-6);
    }

    #[test]
    fn inverse_of_calendar_to_jd() {
        let (y, m, d) = jd_to_calendar(2_436_116.31);
        assert_eq!((y, m), (1957, 10));
        assert!((d - 4.81).abs() < 1e-6);
    }

    #[test]
    fn civil_day_count_roundtrip() {
        for days in (-3_000_000..3_000_000).step_by(9_973) {
            let (y, m, d) = civil_from_days(days);
            assert_eq!(days_from_civil(y, m, d), days, "{y}-{m}-{d}");
        }
    }

    #[test]
    fn supported_range_bounds() {
        assert_eq!(jd_to_calendar(MIN_JD), (MIN_YEAR, 1, 1.0));
        assert_eq!(jd_to_calendar(MAX_JD), (MAX_YEAR + 1, 1, 1.0));
        assert!(MIN_JD < J2000_JD && J2000_JD < MAX_JD);
    }

    #[test]
    fn huge_julian_dates_clamp_without_overflow() {
        assert_eq!(jd_to_calendar(1e300).0, MAX_YEAR + 1);
        assert_eq!(jd_to_calendar(-1e300).0, MIN_YEAR);
        assert_eq!(jd_to_calendar(1e13).0, MAX_YEAR + 1);
    }

    #[test]
    fn leap_years() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 13), 0);
    }

    #[test]
    fn day_overflow_rolls_forward() {
        let a = calendar_to_jd(2024, 1, 32.0);
        let b = calendar_to_jd(2024, 2, 1.0);
        assert!((a - b).abs() < 1e-9);
    }
}

//! Calendar arithmetic that rolls over instead of rejecting.
//!
//! Out-of-range parts carry into the next unit the way a wall calendar would:
//! day 31 of a 30-day month is the 1st of the next month, month 13 is January
//! of the next year, day 0 is the last day of the previous month, and hour 25
//! is 01:00 the next day. `None` only when the result leaves chrono's range.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Builds a date from a 1-based `month` and `day`, rolling over out-of-range values.
///
/// ```
/// # use chrono::NaiveDate;
/// # use nalja_core::dates::roll_date;
/// assert_eq!(roll_date(2025, 2, 31), NaiveDate::from_ymd_opt(2025, 3, 3));
/// assert_eq!(roll_date(2025, 13, 1), NaiveDate::from_ymd_opt(2026, 1, 1));
/// ```
pub fn roll_date(year: i32, month: i64, day: i64) -> Option<NaiveDate> {
    let month0 = month - 1;
    let year = i32::try_from(i64::from(year) + month0.div_euclid(12)).ok()?;
    let month = u32::try_from(month0.rem_euclid(12) + 1).ok()?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_signed(Duration::try_days(day - 1)?)
}

/// `from`'s day at `hour:minute`, rolling over past 23:59.
///
/// Seconds and sub-seconds are carried over from `from`.
pub fn at_clock(from: NaiveDateTime, hour: i64, minute: i64) -> Option<NaiveDateTime> {
    let carry = from.time() - from.time().with_second(0)?.with_nanosecond(0)?;
    let offset = Duration::try_hours(hour)?
        .checked_add(&Duration::try_minutes(minute)?)?
        .checked_add(&carry)?;
    from.date().and_time(NaiveTime::MIN).checked_add_signed(offset)
}

/// `from` shifted by `days`, keeping its time of day.
pub fn shift_days(from: NaiveDateTime, days: i64) -> Option<NaiveDateTime> {
    from.checked_add_signed(Duration::try_days(days)?)
}

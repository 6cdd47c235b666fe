//! Calendar utilities for aggregation bucketing
//!
//! All bucketing is calendar-based in UTC: weeks start on Monday, months
//! are calendar months, days are `%Y-%m-%d` keys.

use chrono::{Datelike, Duration, NaiveDate};

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Chart label for a week bucket, e.g. "Jan 06 - Jan 12"
pub fn week_label(start: NaiveDate) -> String {
    let end = start + Duration::days(6);
    format!("{} - {}", start.format("%b %d"), end.format("%b %d"))
}

/// First day of a month and first day of the following month
///
/// Returns None for an out-of-range month number.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next))
}

/// Day bucket key, e.g. "2026-02-01"
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Weekday names in bucket order (weeks start Monday)
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

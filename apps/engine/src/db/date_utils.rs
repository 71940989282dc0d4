//! Date utilities for study-day boundaries and SQLite text columns.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, SecondsFormat, TimeZone, Timelike, Utc};

use super::error::DbError;

/// Get adjusted "today" based on daily_reset_hour.
///
/// If the current hour is before the reset hour, "today" is actually "yesterday"
/// from a study perspective, so late-night sessions count towards the
/// previous day.
pub fn get_adjusted_today(daily_reset_hour: u32) -> NaiveDate {
    adjusted_date(Local::now(), daily_reset_hour)
}

/// Study day for an arbitrary instant in any timezone.
pub fn adjusted_date<Tz: TimeZone>(now: DateTime<Tz>, daily_reset_hour: u32) -> NaiveDate {
    if now.hour() < daily_reset_hour {
        (now - Duration::days(1)).date_naive()
    } else {
        now.date_naive()
    }
}

/// Calendar date as a day number (days since 0001-01-01 is day 1).
///
/// Stored as INTEGER so SQL comparisons follow date order for every year.
pub fn date_to_day(date: NaiveDate) -> i32 {
    date.num_days_from_ce()
}

pub fn day_to_date(day: i32) -> Result<NaiveDate, DbError> {
    NaiveDate::from_num_days_from_ce_opt(day)
        .ok_or_else(|| DbError::InvalidData(format!("day number out of range: {day}")))
}

/// Fixed-width RFC 3339 (microseconds, `Z` suffix) so stored timestamps sort lexically.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::InvalidData(format!("bad timestamp {value:?}: {e}")))
}

//! Calendar-unit boundaries, evaluated in an optional IANA zone.
//!
//! `start_of_unit` truncates an instant to the containing hour, day, week
//! (Monday start), month, or year; `end_of_unit` returns the exclusive
//! upper bound, i.e. the start of the next unit. Both operate on the wall
//! clock of the given zone (UTC when absent) and convert back through the
//! zone database, so a unit spanning a DST transition keeps exact edges.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::zone::resolve_local;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarUnit {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl CalendarUnit {
    pub fn name(&self) -> &'static str {
        match self {
            CalendarUnit::Hour => "hour",
            CalendarUnit::Day => "day",
            CalendarUnit::Week => "week",
            CalendarUnit::Month => "month",
            CalendarUnit::Year => "year",
        }
    }
}

/// Start of the unit containing `at`, on the wall clock of `zone`
/// (UTC when `None`). Weeks start Monday.
pub fn start_of_unit(at: DateTime<Utc>, unit: CalendarUnit, zone: Option<Tz>) -> DateTime<Utc> {
    let tz = zone.unwrap_or(Tz::UTC);
    let local = at.with_timezone(&tz).naive_local();
    resolve_local(truncate(local, unit), tz)
}

/// Exclusive end of the unit containing `at`: the start of the next unit.
pub fn end_of_unit(at: DateTime<Utc>, unit: CalendarUnit, zone: Option<Tz>) -> DateTime<Utc> {
    let tz = zone.unwrap_or(Tz::UTC);
    let local = at.with_timezone(&tz).naive_local();
    resolve_local(advance(truncate(local, unit), unit), tz)
}

/// Truncate a local datetime to its containing unit.
fn truncate(local: NaiveDateTime, unit: CalendarUnit) -> NaiveDateTime {
    let date = local.date();
    match unit {
        CalendarUnit::Hour => {
            let hour = local.time().hour();
            date.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN))
        }
        CalendarUnit::Day => date.and_time(NaiveTime::MIN),
        CalendarUnit::Week => monday_of(date).and_time(NaiveTime::MIN),
        CalendarUnit::Month => first_of_month(date.year(), date.month()).and_time(NaiveTime::MIN),
        CalendarUnit::Year => first_of_month(date.year(), 1).and_time(NaiveTime::MIN),
    }
}

/// Step a truncated local datetime forward by one unit. Calendar-exact:
/// months and years move by civil date, never by an averaged duration.
fn advance(truncated: NaiveDateTime, unit: CalendarUnit) -> NaiveDateTime {
    match unit {
        CalendarUnit::Hour => truncated + Duration::hours(1),
        CalendarUnit::Day => next_date(truncated.date()).and_time(NaiveTime::MIN),
        CalendarUnit::Week => (truncated.date() + Duration::days(7)).and_time(NaiveTime::MIN),
        CalendarUnit::Month => {
            let date = truncated.date();
            let (year, month) = if date.month() == 12 {
                (date.year() + 1, 1)
            } else {
                (date.year(), date.month() + 1)
            };
            first_of_month(year, month).and_time(NaiveTime::MIN)
        }
        CalendarUnit::Year => first_of_month(truncated.date().year() + 1, 1).and_time(NaiveTime::MIN),
    }
}

/// The Monday beginning the ISO week that contains `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn next_date(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or(NaiveDate::MAX)
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    // Day 1 of a 1..=12 month is always representable.
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MAX)
}

//! Wall-clock times and DST-correct local→UTC conversion.
//!
//! Conversion consults the zone database at the *target* local instant, so
//! each occurrence of a recurring rule picks up the offset in force on its
//! own day. Two documented, stable choices cover the transition hours:
//!
//! - **Fall-back** (the same wall time exists twice): the later UTC instant
//!   wins.
//! - **Spring-forward** (the wall time is skipped): the wall time resolves
//!   with the offset in force one hour before the gap, which lands the
//!   instant just past the transition.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimeError};

/// A wall-clock time of day in 24-hour `HH:MM` form.
///
/// Only meaningful when paired with a civil date and an IANA zone; see
/// [`local_time_to_utc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalTime {
    hour: u8,
    minute: u8,
}

impl LocalTime {
    /// `00:00`, the start of the wall-clock day.
    pub const MIDNIGHT: LocalTime = LocalTime { hour: 0, minute: 0 };

    pub fn new(hour: u8, minute: u8) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(TimeError::InvalidLocalTime(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub(crate) fn to_naive(self) -> NaiveTime {
        // Fields are validated on construction, so this cannot fail.
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl FromStr for LocalTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || TimeError::InvalidLocalTime(s.to_string());
        let (hh, mm) = s.split_once(':').ok_or_else(invalid)?;
        if hh.len() != 2 || mm.len() != 2 {
            return Err(invalid());
        }
        let hour: u8 = hh.parse().map_err(|_| invalid())?;
        let minute: u8 = mm.parse().map_err(|_| invalid())?;
        LocalTime::new(hour, minute).map_err(|_| invalid())
    }
}

impl fmt::Display for LocalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Parse a `YYYY-MM-DD` civil date.
pub fn parse_civil_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::from_str(s).map_err(|_| TimeError::InvalidDate(s.to_string()))
}

/// The civil date containing `at` when viewed in `tz`.
pub fn civil_date_in(at: DateTime<Utc>, tz: Tz) -> NaiveDate {
    at.with_timezone(&tz).date_naive()
}

/// Convert a civil date plus wall time in an IANA zone to the UTC instant.
///
/// Total over all inputs; the transition-hour choices are documented at the
/// module level and pinned by tests on both sides of a US DST transition.
pub fn local_time_to_utc(date: NaiveDate, time: LocalTime, tz: Tz) -> DateTime<Utc> {
    resolve_local(date.and_time(time.to_naive()), tz)
}

/// Resolve a naive local datetime in `tz` to UTC.
pub(crate) fn resolve_local(naive: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        // Fall-back hour: two instants share this wall time; the later wins.
        LocalResult::Ambiguous(_, latest) => latest.with_timezone(&Utc),
        LocalResult::None => resolve_gap(naive, tz),
    }
}

/// A wall time inside a spring-forward gap: apply the offset in force
/// before the gap, which yields an instant just past the transition.
fn resolve_gap(naive: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    // Zone-database gaps are at most a few hours wide (the widest on record
    // skipped two), so a short backwards probe always escapes the gap.
    for probe_hours in 1..=4i64 {
        let probe = naive - Duration::hours(probe_hours);
        match tz.from_local_datetime(&probe) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                return (dt + Duration::hours(probe_hours)).with_timezone(&Utc);
            }
            LocalResult::None => continue,
        }
    }
    // Unreachable with a real zone database; fall back to reading the wall
    // time as UTC rather than failing the whole expansion.
    Utc.from_utc_datetime(&naive)
}

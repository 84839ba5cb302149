//! Usage windows: the time region within which usage is counted.
//!
//! A window is resolved against a reference instant into a concrete
//! half-open interval, and (for the recurring kinds) can report the next
//! instant at which usage resets. Calendar windows are computed with exact
//! civil-date arithmetic; only sliding windows go through the 30-day month
//! approximation of [`DurationSpec`].

use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::duration::DurationSpec;
use crate::interval::Interval;
use crate::unit::{end_of_unit, start_of_unit, CalendarUnit};

/// The time region within which usage is counted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WindowSpec {
    /// The calendar unit containing the reference instant, on the wall
    /// clock of `zone` (UTC when absent).
    Calendar {
        unit: CalendarUnit,
        #[serde(default)]
        zone: Option<Tz>,
    },
    /// The trailing `duration` ending at the reference instant.
    Sliding { duration: DurationSpec },
    /// All of representable time; never resets.
    Lifetime,
    /// A caller-chosen interval, used verbatim.
    Fixed {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// The interval used to count lifetime usage:
/// `[1970-01-01T00:00:00Z, 9999-12-31T23:59:59.999Z)`.
pub fn lifetime_interval() -> Interval {
    Interval::new(DateTime::UNIX_EPOCH, far_future())
}

fn far_future() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59)
        .single()
        .map(|dt| dt + Duration::milliseconds(999))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Resolve a window against a reference instant.
pub fn resolve_window(spec: &WindowSpec, at: DateTime<Utc>) -> Interval {
    match spec {
        WindowSpec::Calendar { unit, zone } => Interval::new(
            start_of_unit(at, *unit, *zone),
            end_of_unit(at, *unit, *zone),
        ),
        WindowSpec::Sliding { duration } => {
            Interval::new(at - Duration::milliseconds(duration.to_millis()), at)
        }
        WindowSpec::Lifetime => lifetime_interval(),
        WindowSpec::Fixed { start, end } => Interval::new(*start, *end),
    }
}

/// The next instant at which usage counted in this window resets.
///
/// `None` for lifetime and fixed windows, which never reset.
pub fn next_reset(spec: &WindowSpec, at: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match spec {
        WindowSpec::Calendar { unit, zone } => Some(end_of_unit(at, *unit, *zone)),
        WindowSpec::Sliding { duration } => {
            Some(at + Duration::milliseconds(duration.to_millis()))
        }
        WindowSpec::Lifetime | WindowSpec::Fixed { .. } => None,
    }
}

/// Human description of a window, for dashboards and reasons.
pub fn describe_window(spec: Option<&WindowSpec>) -> String {
    match spec {
        None => "lifetime".to_string(),
        Some(WindowSpec::Lifetime) => "lifetime".to_string(),
        Some(WindowSpec::Calendar { unit, zone }) => match zone {
            Some(tz) => format!("per calendar {} ({})", unit.name(), tz.name()),
            None => format!("per calendar {}", unit.name()),
        },
        Some(WindowSpec::Sliding { duration }) => {
            format!("in a sliding window of {}", duration.describe())
        }
        Some(WindowSpec::Fixed { .. }) => "within a fixed window".to_string(),
    }
}

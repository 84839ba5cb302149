//! Duration inputs for sliding windows and configuration fields.
//!
//! A duration is either raw milliseconds or a structured parts object. The
//! parts form approximates a month as 30 days; the approximation is only
//! ever applied to sliding windows and human descriptions. Calendar-unit
//! arithmetic in [`crate::unit`] never goes through this module.

use serde::{Deserialize, Serialize};

pub(crate) const MS_PER_HOUR: i64 = 3_600_000;
pub(crate) const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;
const MS_PER_WEEK: i64 = 7 * MS_PER_DAY;
const MS_PER_MONTH: i64 = 30 * MS_PER_DAY;

/// A duration given either as raw milliseconds or as structured parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationSpec {
    Millis(i64),
    Parts {
        #[serde(default)]
        hours: i64,
        #[serde(default)]
        days: i64,
        #[serde(default)]
        weeks: i64,
        #[serde(default)]
        months: i64,
    },
}

impl DurationSpec {
    pub fn to_millis(&self) -> i64 {
        match *self {
            DurationSpec::Millis(ms) => ms,
            DurationSpec::Parts {
                hours,
                days,
                weeks,
                months,
            } => {
                hours * MS_PER_HOUR + days * MS_PER_DAY + weeks * MS_PER_WEEK + months * MS_PER_MONTH
            }
        }
    }

    /// Human rendering for dashboards. A raw millisecond duration is
    /// described in hours.
    pub fn describe(&self) -> String {
        match *self {
            DurationSpec::Millis(ms) => plural(ms / MS_PER_HOUR, "hour"),
            DurationSpec::Parts {
                hours,
                days,
                weeks,
                months,
            } => {
                let mut parts = Vec::new();
                if months != 0 {
                    parts.push(plural(months, "month"));
                }
                if weeks != 0 {
                    parts.push(plural(weeks, "week"));
                }
                if days != 0 {
                    parts.push(plural(days, "day"));
                }
                if hours != 0 {
                    parts.push(plural(hours, "hour"));
                }
                if parts.is_empty() {
                    "0 hours".to_string()
                } else {
                    parts.join(" ")
                }
            }
        }
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

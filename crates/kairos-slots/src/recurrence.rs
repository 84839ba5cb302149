//! Recurrence expansion: structured rules → concrete UTC intervals.
//!
//! The expander walks civil dates one at a time (with a day of slack on
//! both sides of the query range for zone offsets) and derives each
//! occurrence's edges through the zone database, so local wall times stay
//! fixed across DST transitions while their UTC images shift.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use kairos_time::{civil_date_in, local_time_to_utc, monday_of, Interval, LocalTime};

use crate::model::DayOfWeek;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    /// Every other ISO week, counted from the anchor date.
    Biweekly,
    Monthly,
}

/// A recurring event pattern in a single IANA zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    /// Weekday filter. Required for weekly and biweekly; optional for daily.
    #[serde(default)]
    pub days: Option<Vec<DayOfWeek>>,
    /// Day of month for monthly rules.
    #[serde(default)]
    pub day_of_month: Option<u32>,
    pub start_time: LocalTime,
    pub end_time: LocalTime,
    pub zone: Tz,
    /// Parity anchor for biweekly rules; defaults to the query range start.
    #[serde(default)]
    pub anchor: Option<DateTime<Utc>>,
    /// No occurrence starts after this instant.
    #[serde(default)]
    pub until: Option<DateTime<Utc>>,
    /// At most this many occurrences are emitted.
    #[serde(default)]
    pub count: Option<u32>,
    /// Civil dates (in the rule zone) to skip.
    #[serde(default)]
    pub exclude: Vec<NaiveDate>,
}

/// Expand a recurrence rule to the occurrences whose start falls inside
/// `range` (inclusive lower, exclusive upper bound), ordered by start.
pub fn expand_recurrence(rule: &RecurrenceRule, range: &Interval) -> Vec<Interval> {
    if range.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();

    let scan_cap = match rule.until {
        Some(until) => (range.end + Duration::days(1)).min(until + Duration::days(1)),
        None => range.end + Duration::days(1),
    };
    let first = (range.start - Duration::days(1)).date_naive();
    let last = scan_cap.date_naive();

    let anchor_date = civil_date_in(rule.anchor.unwrap_or(range.start), rule.zone);

    let mut day = first;
    while day <= last {
        if !occurs_on(rule, day, anchor_date) || rule.exclude.contains(&day) {
            day = day + Duration::days(1);
            continue;
        }

        let occurrence = occurrence_window(rule, day);
        let starts_in_range = range.contains_instant(occurrence.start);
        let before_until = rule.until.is_none_or(|u| occurrence.start <= u);
        if starts_in_range && before_until {
            out.push(occurrence);
            if rule.count.is_some_and(|c| out.len() >= c as usize) {
                break;
            }
        }

        day = day + Duration::days(1);
    }

    out
}

fn occurs_on(rule: &RecurrenceRule, date: NaiveDate, anchor_date: NaiveDate) -> bool {
    let weekday = DayOfWeek::from(date.weekday());
    let in_days = |days: &Option<Vec<DayOfWeek>>| days.as_ref().is_some_and(|d| d.contains(&weekday));

    match rule.frequency {
        // Daily runs every day unless a weekday filter narrows it.
        Frequency::Daily => rule.days.as_ref().is_none_or(|d| d.contains(&weekday)),
        Frequency::Weekly => in_days(&rule.days),
        Frequency::Biweekly => in_days(&rule.days) && even_week_distance(date, anchor_date),
        Frequency::Monthly => rule.day_of_month == Some(date.day()),
    }
}

/// Whether `date` lies an even number of ISO weeks from the anchor.
fn even_week_distance(date: NaiveDate, anchor_date: NaiveDate) -> bool {
    let weeks = (monday_of(date) - monday_of(anchor_date)).num_days() / 7;
    weeks % 2 == 0
}

fn occurrence_window(rule: &RecurrenceRule, date: NaiveDate) -> Interval {
    let start = local_time_to_utc(date, rule.start_time, rule.zone);
    let end = if rule.end_time > rule.start_time {
        local_time_to_utc(date, rule.end_time, rule.zone)
    } else {
        local_time_to_utc(date + Duration::days(1), rule.end_time, rule.zone)
    };
    Interval::new(start, end)
}

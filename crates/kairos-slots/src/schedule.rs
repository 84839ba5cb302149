//! Schedule expansion: recurring rules plus overrides → UTC availability.
//!
//! Each civil date touching the query range is expanded through the zone
//! database, so a rule's window on a DST transition day comes out shorter
//! or longer exactly as the wall clock does. The combine order is: merge
//! rule windows, subtract unavailable overrides, merge in added windows,
//! then clip everything to the query range.

use chrono::{Datelike, Duration, NaiveDate};
use chrono_tz::Tz;

use kairos_time::{local_time_to_utc, merge_intervals, subtract_intervals, Interval, LocalTime};

use crate::model::{DayOfWeek, Schedule, ScheduleOverride, ScheduleRule};

/// Expand a schedule into sorted, disjoint UTC availability inside `range`.
pub fn expand_schedule(schedule: &Schedule, range: &Interval) -> Vec<Interval> {
    if range.is_empty() {
        return Vec::new();
    }

    let mut working = Vec::new();

    // One day of slack on both sides: a zone far from UTC can push a local
    // date's window across the UTC date line in either direction.
    let first = range.start.date_naive() - Duration::days(1);
    let last = range.end.date_naive() + Duration::days(1);

    let mut day = first;
    while day <= last {
        for rule in &schedule.rules {
            if rule_applies_on(rule, day) {
                working.push(rule_window(rule, day));
            }
        }
        day = day + Duration::days(1);
    }

    let primary = schedule.primary_zone();
    let mut removals = Vec::new();
    let mut additions = Vec::new();
    for ov in &schedule.overrides {
        apply_override(ov, primary, &mut removals, &mut additions);
    }

    let merged = merge_intervals(&working);
    let mut combined = subtract_intervals(&merged, &removals);
    combined.extend(additions);

    merge_intervals(&combined)
        .iter()
        .filter_map(|iv| iv.clip(range))
        .collect()
}

fn rule_applies_on(rule: &ScheduleRule, date: NaiveDate) -> bool {
    if !rule.days.contains(&DayOfWeek::from(date.weekday())) {
        return false;
    }
    if let Some(from) = rule.effective_from {
        if date < from {
            return false;
        }
    }
    if let Some(until) = rule.effective_until {
        if date >= until {
            return false;
        }
    }
    true
}

/// The rule's UTC window on a civil date. Both edges go through the zone
/// database; a window whose end is not after its start crosses midnight and
/// ends on the following day.
fn rule_window(rule: &ScheduleRule, date: NaiveDate) -> Interval {
    let start = local_time_to_utc(date, rule.start_time, rule.zone);
    let end = if rule.end_time > rule.start_time {
        local_time_to_utc(date, rule.end_time, rule.zone)
    } else {
        local_time_to_utc(date + Duration::days(1), rule.end_time, rule.zone)
    };
    Interval::new(start, end)
}

fn apply_override(
    ov: &ScheduleOverride,
    primary: Tz,
    removals: &mut Vec<Interval>,
    additions: &mut Vec<Interval>,
) {
    let window = match (ov.start_time, ov.end_time) {
        (Some(start), Some(end)) => Interval::new(
            local_time_to_utc(ov.date, start, primary),
            local_time_to_utc(ov.date, end, primary),
        ),
        // Without a complete time pair the override covers the whole local day.
        _ => whole_day(ov.date, primary),
    };

    if ov.available {
        // Adding requires explicit times; a bare `available = true` is a no-op.
        if ov.start_time.is_some() && ov.end_time.is_some() {
            additions.push(window);
        }
    } else {
        removals.push(window);
    }
}

fn whole_day(date: NaiveDate, tz: Tz) -> Interval {
    Interval::new(
        local_time_to_utc(date, LocalTime::MIDNIGHT, tz),
        local_time_to_utc(date + Duration::days(1), LocalTime::MIDNIGHT, tz),
    )
}

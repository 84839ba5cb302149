//! Tests for schedule expansion: weekly rules, overrides, and DST edges.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use kairos_slots::{expand_schedule, DayOfWeek, Schedule, ScheduleOverride, ScheduleRule};
use kairos_time::{Interval, LocalTime};

// ── Helpers ─────────────────────────────────────────────────────────────────

const NEW_YORK: Tz = chrono_tz::America::New_York;

fn t(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

fn iv(start: &str, end: &str) -> Interval {
    Interval::new(t(start), t(end))
}

fn lt(s: &str) -> LocalTime {
    s.parse().unwrap()
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn rule(days: &[DayOfWeek], start: &str, end: &str, zone: Tz) -> ScheduleRule {
    ScheduleRule {
        days: days.to_vec(),
        start_time: lt(start),
        end_time: lt(end),
        zone,
        effective_from: None,
        effective_until: None,
    }
}

fn schedule(rules: Vec<ScheduleRule>, overrides: Vec<ScheduleOverride>) -> Schedule {
    Schedule {
        id: "work-hours".to_string(),
        rules,
        overrides,
    }
}

const WEEKDAYS: [DayOfWeek; 5] = [
    DayOfWeek::Mon,
    DayOfWeek::Tue,
    DayOfWeek::Wed,
    DayOfWeek::Thu,
    DayOfWeek::Fri,
];

// ── Basic expansion ─────────────────────────────────────────────────────────

#[test]
fn weekday_rule_expands_within_range() {
    // 2024-01-01 is a Monday.
    let s = schedule(vec![rule(&WEEKDAYS, "09:00", "17:00", Tz::UTC)], vec![]);
    let range = iv("2024-01-01T00:00:00Z", "2024-01-08T00:00:00Z");

    let expanded = expand_schedule(&s, &range);

    // Mon-Fri only; Sat 06 and Sun 07 contribute nothing.
    assert_eq!(expanded.len(), 5);
    assert_eq!(expanded[0], iv("2024-01-01T09:00:00Z", "2024-01-01T17:00:00Z"));
    assert_eq!(expanded[4], iv("2024-01-05T09:00:00Z", "2024-01-05T17:00:00Z"));
}

#[test]
fn empty_rule_set_yields_nothing() {
    let s = schedule(vec![], vec![]);
    let range = iv("2024-01-01T00:00:00Z", "2024-01-08T00:00:00Z");
    assert!(expand_schedule(&s, &range).is_empty());
}

#[test]
fn results_are_clipped_to_the_range() {
    let s = schedule(vec![rule(&WEEKDAYS, "09:00", "17:00", Tz::UTC)], vec![]);
    let range = iv("2024-01-01T10:00:00Z", "2024-01-01T12:00:00Z");
    assert_eq!(
        expand_schedule(&s, &range),
        vec![iv("2024-01-01T10:00:00Z", "2024-01-01T12:00:00Z")]
    );
}

#[test]
fn overlapping_rules_merge() {
    let s = schedule(
        vec![
            rule(&[DayOfWeek::Mon], "09:00", "13:00", Tz::UTC),
            rule(&[DayOfWeek::Mon], "12:00", "17:00", Tz::UTC),
        ],
        vec![],
    );
    let range = iv("2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z");
    assert_eq!(
        expand_schedule(&s, &range),
        vec![iv("2024-01-01T09:00:00Z", "2024-01-01T17:00:00Z")]
    );
}

#[test]
fn zone_rule_lands_on_utc_offsets() {
    // 09:00-17:00 New York in January is 14:00-22:00 UTC.
    let s = schedule(vec![rule(&[DayOfWeek::Mon], "09:00", "17:00", NEW_YORK)], vec![]);
    let range = iv("2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z");
    assert_eq!(
        expand_schedule(&s, &range),
        vec![iv("2024-01-01T14:00:00Z", "2024-01-01T22:00:00Z")]
    );
}

#[test]
fn cross_midnight_rule_spills_into_next_day() {
    // 22:00-02:00 wraps; Monday's window ends Tuesday 02:00.
    let s = schedule(vec![rule(&[DayOfWeek::Mon], "22:00", "02:00", Tz::UTC)], vec![]);
    let range = iv("2024-01-01T00:00:00Z", "2024-01-03T00:00:00Z");
    assert_eq!(
        expand_schedule(&s, &range),
        vec![iv("2024-01-01T22:00:00Z", "2024-01-02T02:00:00Z")]
    );
}

// ── Effective bounds ────────────────────────────────────────────────────────

#[test]
fn effective_bounds_are_half_open_on_dates() {
    let mut r = rule(&WEEKDAYS, "09:00", "17:00", Tz::UTC);
    r.effective_from = Some(date("2024-01-02"));
    r.effective_until = Some(date("2024-01-04"));
    let s = schedule(vec![r], vec![]);
    let range = iv("2024-01-01T00:00:00Z", "2024-01-08T00:00:00Z");

    let expanded = expand_schedule(&s, &range);

    // Tue 02 and Wed 03 only: from is inclusive, until exclusive.
    assert_eq!(
        expanded,
        vec![
            iv("2024-01-02T09:00:00Z", "2024-01-02T17:00:00Z"),
            iv("2024-01-03T09:00:00Z", "2024-01-03T17:00:00Z"),
        ]
    );
}

// ── DST transitions ─────────────────────────────────────────────────────────

#[test]
fn spring_forward_shortens_a_window_spanning_the_gap() {
    // 2024-03-10 is a Sunday; 01:00-04:00 New York nominally spans three
    // hours but the 02:00-03:00 gap removes one: [06:00Z, 08:00Z).
    let s = schedule(vec![rule(&[DayOfWeek::Sun], "01:00", "04:00", NEW_YORK)], vec![]);
    let range = iv("2024-03-10T00:00:00Z", "2024-03-11T00:00:00Z");
    let expanded = expand_schedule(&s, &range);
    assert_eq!(expanded, vec![iv("2024-03-10T06:00:00Z", "2024-03-10T08:00:00Z")]);
    assert_eq!(expanded[0].duration().num_hours(), 2);
}

#[test]
fn fall_back_lengthens_a_window_spanning_the_repeat() {
    // 2024-11-03 is a Sunday; 00:00-04:00 New York includes the repeated
    // hour: [04:00Z, 09:00Z) is five hours of real time.
    let s = schedule(vec![rule(&[DayOfWeek::Sun], "00:00", "04:00", NEW_YORK)], vec![]);
    let range = iv("2024-11-03T00:00:00Z", "2024-11-04T00:00:00Z");
    let expanded = expand_schedule(&s, &range);
    assert_eq!(expanded, vec![iv("2024-11-03T04:00:00Z", "2024-11-03T09:00:00Z")]);
    assert_eq!(expanded[0].duration().num_hours(), 5);
}

#[test]
fn local_wall_time_is_stable_across_the_transition() {
    // Same 09:00-17:00 New York rule on the Fridays before and after the
    // spring transition: wall time holds, UTC image shifts one hour.
    let s = schedule(vec![rule(&[DayOfWeek::Fri], "09:00", "17:00", NEW_YORK)], vec![]);
    let range = iv("2024-03-08T00:00:00Z", "2024-03-16T00:00:00Z");
    let expanded = expand_schedule(&s, &range);
    assert_eq!(
        expanded,
        vec![
            iv("2024-03-08T14:00:00Z", "2024-03-08T22:00:00Z"),
            iv("2024-03-15T13:00:00Z", "2024-03-15T21:00:00Z"),
        ]
    );
}

// ── Overrides ───────────────────────────────────────────────────────────────

#[test]
fn unavailable_override_removes_the_whole_day() {
    let s = schedule(
        vec![rule(&WEEKDAYS, "09:00", "17:00", Tz::UTC)],
        vec![ScheduleOverride {
            date: date("2024-01-02"),
            available: false,
            start_time: None,
            end_time: None,
        }],
    );
    let range = iv("2024-01-01T00:00:00Z", "2024-01-04T00:00:00Z");
    assert_eq!(
        expand_schedule(&s, &range),
        vec![
            iv("2024-01-01T09:00:00Z", "2024-01-01T17:00:00Z"),
            iv("2024-01-03T09:00:00Z", "2024-01-03T17:00:00Z"),
        ]
    );
}

#[test]
fn unavailable_override_with_times_removes_a_window() {
    let s = schedule(
        vec![rule(&WEEKDAYS, "09:00", "17:00", Tz::UTC)],
        vec![ScheduleOverride {
            date: date("2024-01-01"),
            available: false,
            start_time: Some(lt("12:00")),
            end_time: Some(lt("13:00")),
        }],
    );
    let range = iv("2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z");
    assert_eq!(
        expand_schedule(&s, &range),
        vec![
            iv("2024-01-01T09:00:00Z", "2024-01-01T12:00:00Z"),
            iv("2024-01-01T13:00:00Z", "2024-01-01T17:00:00Z"),
        ]
    );
}

#[test]
fn available_override_with_times_adds_a_window() {
    // Saturday has no base availability; the override opens a morning.
    let s = schedule(
        vec![rule(&WEEKDAYS, "09:00", "17:00", Tz::UTC)],
        vec![ScheduleOverride {
            date: date("2024-01-06"),
            available: true,
            start_time: Some(lt("10:00")),
            end_time: Some(lt("12:00")),
        }],
    );
    let range = iv("2024-01-06T00:00:00Z", "2024-01-07T00:00:00Z");
    assert_eq!(
        expand_schedule(&s, &range),
        vec![iv("2024-01-06T10:00:00Z", "2024-01-06T12:00:00Z")]
    );
}

#[test]
fn available_override_without_times_is_a_noop() {
    let s = schedule(
        vec![rule(&WEEKDAYS, "09:00", "17:00", Tz::UTC)],
        vec![ScheduleOverride {
            date: date("2024-01-06"),
            available: true,
            start_time: None,
            end_time: None,
        }],
    );
    let range = iv("2024-01-06T00:00:00Z", "2024-01-07T00:00:00Z");
    assert!(expand_schedule(&s, &range).is_empty());
}

#[test]
fn unavailable_override_on_a_free_day_is_a_noop() {
    let s = schedule(
        vec![rule(&WEEKDAYS, "09:00", "17:00", Tz::UTC)],
        vec![ScheduleOverride {
            date: date("2024-01-06"),
            available: false,
            start_time: None,
            end_time: None,
        }],
    );
    let range = iv("2024-01-01T00:00:00Z", "2024-01-08T00:00:00Z");
    assert_eq!(expand_schedule(&s, &range).len(), 5);
}

#[test]
fn override_dates_use_the_primary_zone() {
    // Rule zone is New York, so the override's civil date is matched there:
    // removing 2024-01-01 clears the window that runs 14:00Z-22:00Z.
    let s = schedule(
        vec![rule(&[DayOfWeek::Mon], "09:00", "17:00", NEW_YORK)],
        vec![ScheduleOverride {
            date: date("2024-01-01"),
            available: false,
            start_time: None,
            end_time: None,
        }],
    );
    let range = iv("2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z");
    assert!(expand_schedule(&s, &range).is_empty());
}

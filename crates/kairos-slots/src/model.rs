//! Value types for the slot core.
//!
//! Everything here is plain data created by the caller and consumed once per
//! query; the engine never mutates its inputs. Durations stored in
//! configuration are `i64` milliseconds.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use kairos_time::{Interval, LocalTime};

/// Day of week, Monday-first per ISO-8601.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayOfWeek::Mon,
            Weekday::Tue => DayOfWeek::Tue,
            Weekday::Wed => DayOfWeek::Wed,
            Weekday::Thu => DayOfWeek::Thu,
            Weekday::Fri => DayOfWeek::Fri,
            Weekday::Sat => DayOfWeek::Sat,
            Weekday::Sun => DayOfWeek::Sun,
        }
    }
}

/// A recurring weekly availability rule in a single IANA zone.
///
/// The rule applies on a civil date when the date's weekday is in `days`
/// and the date falls in `[effective_from, effective_until)` (compared as
/// civil dates in the rule's zone). A window whose `end_time` is not after
/// `start_time` crosses midnight and ends on the following day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRule {
    pub days: Vec<DayOfWeek>,
    pub start_time: LocalTime,
    pub end_time: LocalTime,
    pub zone: Tz,
    #[serde(default)]
    pub effective_from: Option<NaiveDate>,
    #[serde(default)]
    pub effective_until: Option<NaiveDate>,
}

/// A dated exception to a schedule, matched in the schedule's primary zone.
///
/// `available = false` subtracts the given times (or the whole local day
/// when times are absent); `available = true` with both times adds an extra
/// window; `available = true` without times is a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOverride {
    pub date: NaiveDate,
    pub available: bool,
    #[serde(default)]
    pub start_time: Option<LocalTime>,
    #[serde(default)]
    pub end_time: Option<LocalTime>,
}

/// A named schedule: recurring rules plus dated overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub rules: Vec<ScheduleRule>,
    #[serde(default)]
    pub overrides: Vec<ScheduleOverride>,
}

impl Schedule {
    /// The zone in which override dates are interpreted: the first rule's
    /// zone, else UTC.
    pub fn primary_zone(&self) -> Tz {
        self.rules.first().map(|r| r.zone).unwrap_or(Tz::UTC)
    }
}

/// A bookable host and its named schedules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostSchedules {
    pub host_id: String,
    pub schedules: BTreeMap<String, Schedule>,
}

/// The shape of what is being booked: length, buffers, placement grid,
/// notice and lead-time limits, and per-day/per-week caps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventType {
    pub id: String,
    /// Slot length in milliseconds.
    pub length_ms: i64,
    /// Key into [`HostSchedules::schedules`]; defaults to `"default"`.
    #[serde(default)]
    pub schedule_key: Option<String>,
    #[serde(default)]
    pub buffer_before_ms: Option<i64>,
    #[serde(default)]
    pub buffer_after_ms: Option<i64>,
    /// Grid step between candidate starts; defaults to `length_ms`.
    #[serde(default)]
    pub slot_interval_ms: Option<i64>,
    #[serde(default)]
    pub minimum_notice_ms: Option<i64>,
    #[serde(default)]
    pub maximum_lead_time_ms: Option<i64>,
    #[serde(default)]
    pub max_per_day: Option<u32>,
    #[serde(default)]
    pub max_per_week: Option<u32>,
    /// Per-host partial overrides; a present field wins over the base.
    #[serde(default)]
    pub host_overrides: BTreeMap<String, EventTypeOverride>,
}

/// A partial per-host override of [`EventType`] fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventTypeOverride {
    #[serde(default)]
    pub length_ms: Option<i64>,
    #[serde(default)]
    pub schedule_key: Option<String>,
    #[serde(default)]
    pub buffer_before_ms: Option<i64>,
    #[serde(default)]
    pub buffer_after_ms: Option<i64>,
    #[serde(default)]
    pub slot_interval_ms: Option<i64>,
    #[serde(default)]
    pub minimum_notice_ms: Option<i64>,
    #[serde(default)]
    pub maximum_lead_time_ms: Option<i64>,
    #[serde(default)]
    pub max_per_day: Option<u32>,
    #[serde(default)]
    pub max_per_week: Option<u32>,
}

/// The event-type configuration in force for one host, after the
/// field-by-field override merge and derived defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEventType {
    pub length_ms: i64,
    pub schedule_key: String,
    pub buffer_before_ms: i64,
    pub buffer_after_ms: i64,
    pub slot_interval_ms: i64,
    pub minimum_notice_ms: i64,
    pub maximum_lead_time_ms: Option<i64>,
    pub max_per_day: Option<u32>,
    pub max_per_week: Option<u32>,
}

impl EventType {
    /// Resolve the configuration for `host_id`: override fields win when
    /// present; `slot_interval` falls back to the length and buffers and
    /// notice to zero.
    pub fn resolve_for_host(&self, host_id: &str) -> ResolvedEventType {
        let ov = self.host_overrides.get(host_id);
        let pick_i64 = |o: Option<i64>, b: Option<i64>| o.or(b);
        let pick_u32 = |o: Option<u32>, b: Option<u32>| o.or(b);

        let length_ms = ov.and_then(|o| o.length_ms).unwrap_or(self.length_ms);
        ResolvedEventType {
            length_ms,
            schedule_key: ov
                .and_then(|o| o.schedule_key.clone())
                .or_else(|| self.schedule_key.clone())
                .unwrap_or_else(|| "default".to_string()),
            buffer_before_ms: pick_i64(ov.and_then(|o| o.buffer_before_ms), self.buffer_before_ms)
                .unwrap_or(0),
            buffer_after_ms: pick_i64(ov.and_then(|o| o.buffer_after_ms), self.buffer_after_ms)
                .unwrap_or(0),
            slot_interval_ms: pick_i64(ov.and_then(|o| o.slot_interval_ms), self.slot_interval_ms)
                .unwrap_or(length_ms),
            minimum_notice_ms: pick_i64(
                ov.and_then(|o| o.minimum_notice_ms),
                self.minimum_notice_ms,
            )
            .unwrap_or(0),
            maximum_lead_time_ms: pick_i64(
                ov.and_then(|o| o.maximum_lead_time_ms),
                self.maximum_lead_time_ms,
            ),
            max_per_day: pick_u32(ov.and_then(|o| o.max_per_day), self.max_per_day),
            max_per_week: pick_u32(ov.and_then(|o| o.max_per_week), self.max_per_week),
        }
    }
}

/// An existing commitment on a host's timeline. Counted against caps when
/// its event type matches the queried one; inflated by its *own* event
/// type's buffers when subtracting busy time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub host_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub event_type_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

/// An opaque busy period on a host's timeline. Never inflated, never
/// counted against caps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub host_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Prep and wrap-up buffers attached to an event type, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferPolicy {
    #[serde(default)]
    pub before_ms: i64,
    #[serde(default)]
    pub after_ms: i64,
}

/// A bookable window emitted by the slot generator.
///
/// `end - start` equals the resolved event length; the buffer intervals are
/// informational and present only when the respective buffer is positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub host_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub buffer_before: Option<Interval>,
    #[serde(default)]
    pub buffer_after: Option<Interval>,
}

/// Fully-materialized input for one slot query.
#[derive(Debug, Clone)]
pub struct SlotQuery {
    pub event_type: EventType,
    pub hosts: Vec<HostSchedules>,
    pub bookings: Vec<Booking>,
    pub blocks: Vec<Block>,
    pub range: Interval,
    /// Buffer table keyed by event-type id, used to inflate existing
    /// bookings by their own event type's buffers.
    pub buffers: BTreeMap<String, BufferPolicy>,
}

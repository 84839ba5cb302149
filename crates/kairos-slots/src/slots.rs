//! The slot generator: schedules minus busy time, placed on a grid.
//!
//! Per host the pipeline is: resolve the event-type config, expand the
//! schedule, subtract buffer-inflated bookings and blocks, clip to the
//! notice/lead-time horizon, place candidates on the slot-interval grid,
//! and admit them through per-day/per-week caps. Hosts never interact;
//! the final list is the per-host results sorted by `(start, host_id)`.
//!
//! The buffer model is asymmetric on purpose: an existing booking occupies
//! `[start - its own type's buffer_before, end + its own buffer_after)`,
//! while a candidate slot of the queried type must fit
//! `[start - buffer_before, end + buffer_after)` entirely inside one free
//! interval.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use tracing::debug;

use kairos_time::{merge_intervals, subtract_intervals, Interval};

use crate::model::{Booking, HostSchedules, ResolvedEventType, Slot, SlotQuery};
use crate::schedule::expand_schedule;

/// Compute all bookable slots for the query. `now` is the caller's
/// evaluation instant; the wall clock is used when absent.
pub fn get_available_slots(query: &SlotQuery, now: Option<DateTime<Utc>>) -> Vec<Slot> {
    let now = now.unwrap_or_else(Utc::now);

    let mut slots: Vec<Slot> = Vec::new();
    for host in &query.hosts {
        slots.extend(host_slots(query, host, now));
    }

    slots.sort_by(|a, b| (a.start, &a.host_id).cmp(&(b.start, &b.host_id)));
    slots
}

fn host_slots(query: &SlotQuery, host: &HostSchedules, now: DateTime<Utc>) -> Vec<Slot> {
    let config = query.event_type.resolve_for_host(&host.host_id);

    if config.length_ms <= 0 || config.slot_interval_ms <= 0 {
        debug!(host = %host.host_id, "non-positive length or grid, skipping host");
        return Vec::new();
    }
    let Some(schedule) = host.schedules.get(&config.schedule_key) else {
        debug!(host = %host.host_id, key = %config.schedule_key, "unknown schedule key, skipping host");
        return Vec::new();
    };

    let available = expand_schedule(schedule, &query.range);
    let busy = busy_intervals(query, &host.host_id);
    let free = subtract_intervals(&available, &busy);
    let free = clip_to_horizon(free, &config, now);

    debug!(
        host = %host.host_id,
        free_intervals = free.len(),
        "placing candidates"
    );
    place_candidates(query, &host.host_id, &config, &free)
}

/// Busy time for one host: bookings inflated by their own event type's
/// buffers plus blocks verbatim.
fn busy_intervals(query: &SlotQuery, host_id: &str) -> Vec<Interval> {
    let mut busy = Vec::new();

    for booking in query.bookings.iter().filter(|b| b.host_id == host_id) {
        let policy = booking
            .event_type_id
            .as_deref()
            .and_then(|id| query.buffers.get(id))
            .copied()
            .unwrap_or_default();
        busy.push(Interval::new(
            booking.start - Duration::milliseconds(policy.before_ms),
            booking.end + Duration::milliseconds(policy.after_ms),
        ));
    }

    for block in query.blocks.iter().filter(|b| b.host_id == host_id) {
        busy.push(Interval::new(block.start, block.end));
    }

    merge_intervals(&busy)
}

/// Clip free intervals to `[now + minimum_notice, now + maximum_lead_time]`.
fn clip_to_horizon(
    free: Vec<Interval>,
    config: &ResolvedEventType,
    now: DateTime<Utc>,
) -> Vec<Interval> {
    let not_before = now + Duration::milliseconds(config.minimum_notice_ms);
    let not_after = config
        .maximum_lead_time_ms
        .map(|ms| now + Duration::milliseconds(ms));

    free.into_iter()
        .filter_map(|iv| {
            let start = iv.start.max(not_before);
            let end = match not_after {
                Some(cap) => iv.end.min(cap),
                None => iv.end,
            };
            (start < end).then(|| Interval::new(start, end))
        })
        .collect()
}

fn place_candidates(
    query: &SlotQuery,
    host_id: &str,
    config: &ResolvedEventType,
    free: &[Interval],
) -> Vec<Slot> {
    let length = Duration::milliseconds(config.length_ms);
    let step = Duration::milliseconds(config.slot_interval_ms);
    let before = Duration::milliseconds(config.buffer_before_ms);
    let after = Duration::milliseconds(config.buffer_after_ms);

    let mut caps = CapCounter::seed(query, host_id, config);
    let mut slots = Vec::new();

    for interval in free {
        let mut start = interval.start + before;
        // Stop as soon as the inflated candidate no longer fits the free
        // interval; a candidate ending exactly at the boundary is admitted.
        while start + length + after <= interval.end {
            if caps.admit(start) {
                slots.push(build_slot(host_id, start, length, before, after));
            }
            start += step;
        }
    }

    slots
}

fn build_slot(
    host_id: &str,
    start: DateTime<Utc>,
    length: Duration,
    before: Duration,
    after: Duration,
) -> Slot {
    let end = start + length;
    Slot {
        host_id: host_id.to_string(),
        start,
        end,
        buffer_before: (before > Duration::zero()).then(|| Interval::new(start - before, start)),
        buffer_after: (after > Duration::zero()).then(|| Interval::new(end, end + after)),
    }
}

/// Day and ISO-week admission counters, seeded with existing bookings of
/// the queried event type on the same host.
struct CapCounter {
    max_per_day: Option<u32>,
    max_per_week: Option<u32>,
    per_day: HashMap<NaiveDate, u32>,
    per_week: HashMap<(i32, u32), u32>,
}

impl CapCounter {
    fn seed(query: &SlotQuery, host_id: &str, config: &ResolvedEventType) -> Self {
        let mut counter = CapCounter {
            max_per_day: config.max_per_day,
            max_per_week: config.max_per_week,
            per_day: HashMap::new(),
            per_week: HashMap::new(),
        };
        if counter.unlimited() {
            return counter;
        }

        let same_type = |b: &&Booking| {
            b.host_id == host_id && b.event_type_id.as_deref() == Some(query.event_type.id.as_str())
        };
        for booking in query.bookings.iter().filter(same_type) {
            counter.record(booking.start);
        }
        counter
    }

    fn unlimited(&self) -> bool {
        self.max_per_day.is_none() && self.max_per_week.is_none()
    }

    /// Keys are derived from the UTC instant: civil date and ISO week-year
    /// plus week number (Monday-based).
    fn keys(start: DateTime<Utc>) -> (NaiveDate, (i32, u32)) {
        let week = start.iso_week();
        (start.date_naive(), (week.year(), week.week()))
    }

    fn record(&mut self, start: DateTime<Utc>) {
        let (day, week) = Self::keys(start);
        *self.per_day.entry(day).or_insert(0) += 1;
        *self.per_week.entry(week).or_insert(0) += 1;
    }

    /// Admit the candidate when both counters stay below their caps, and
    /// record it on admission.
    fn admit(&mut self, start: DateTime<Utc>) -> bool {
        if self.unlimited() {
            return true;
        }

        let (day, week) = Self::keys(start);
        if let Some(max) = self.max_per_day {
            if self.per_day.get(&day).copied().unwrap_or(0) >= max {
                return false;
            }
        }
        if let Some(max) = self.max_per_week {
            if self.per_week.get(&week).copied().unwrap_or(0) >= max {
                return false;
            }
        }

        self.record(start);
        true
    }
}

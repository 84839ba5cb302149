//! Adapter-backed engine facade over the slot generator.
//!
//! A [`SlotProvider`] supplies the materialized facts (event types, host
//! schedules, bookings, blocks, buffer table); the engine stitches one
//! query's inputs together and delegates to
//! [`get_available_slots`](crate::slots::get_available_slots). Provider
//! errors pass through untouched.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use kairos_time::Interval;

use crate::error::{Result, SlotError};
use crate::model::{Block, Booking, BufferPolicy, EventType, HostSchedules, Slot, SlotQuery};
use crate::slots::get_available_slots;

/// The availability adapter: caller-provided lookups for the facts a slot
/// query needs. `blocks` and `event_type_buffers` are optional concerns
/// with neutral defaults.
pub trait SlotProvider {
    fn event_type(&self, event_type_id: &str) -> Result<Option<EventType>>;

    /// Hosts assigned to the event type, optionally restricted to
    /// `host_ids`.
    fn hosts(&self, host_ids: Option<&[String]>, event_type_id: &str) -> Result<Vec<HostSchedules>>;

    fn bookings(&self, host_ids: &[String], range: &Interval) -> Result<Vec<Booking>>;

    fn blocks(&self, _host_ids: &[String], _range: &Interval) -> Result<Vec<Block>> {
        Ok(Vec::new())
    }

    /// Per-event-type buffer table for the given ids. `None` means the
    /// provider does not model per-type buffers; the engine then falls
    /// back to the queried event type's own buffers for its bookings.
    fn event_type_buffers(
        &self,
        _event_type_ids: &[String],
    ) -> Result<Option<BTreeMap<String, BufferPolicy>>> {
        Ok(None)
    }
}

/// Stateless facade binding a [`SlotProvider`] to the slot pipeline.
pub struct SlotEngine<P> {
    provider: P,
}

impl<P: SlotProvider> SlotEngine<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Compute bookable slots for an event type over `range`.
    pub fn available_slots(
        &self,
        event_type_id: &str,
        host_ids: Option<&[String]>,
        range: Interval,
        now: Option<DateTime<Utc>>,
    ) -> Result<Vec<Slot>> {
        let event_type = self
            .provider
            .event_type(event_type_id)?
            .ok_or_else(|| SlotError::UnknownEventType(event_type_id.to_string()))?;

        let hosts = self.provider.hosts(host_ids, event_type_id)?;
        let ids: Vec<String> = hosts.iter().map(|h| h.host_id.clone()).collect();

        let bookings = self.provider.bookings(&ids, &range)?;
        let blocks = self.provider.blocks(&ids, &range)?;

        let mut referenced: Vec<String> = bookings
            .iter()
            .filter_map(|b| b.event_type_id.clone())
            .collect();
        referenced.sort();
        referenced.dedup();

        let buffers = match self.provider.event_type_buffers(&referenced)? {
            Some(table) => table,
            None => fallback_buffers(&event_type),
        };

        let query = SlotQuery {
            event_type,
            hosts,
            bookings,
            blocks,
            range,
            buffers,
        };
        Ok(get_available_slots(&query, now))
    }
}

/// Without a buffer table, bookings of the queried event type inherit that
/// type's own buffers; bookings of any other type get zero.
fn fallback_buffers(event_type: &EventType) -> BTreeMap<String, BufferPolicy> {
    let mut table = BTreeMap::new();
    table.insert(
        event_type.id.clone(),
        BufferPolicy {
            before_ms: event_type.buffer_before_ms.unwrap_or(0),
            after_ms: event_type.buffer_after_ms.unwrap_or(0),
        },
    );
    table
}

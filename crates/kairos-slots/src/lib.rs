//! # kairos-slots
//!
//! Deterministic bookable-slot computation for scheduling systems.
//!
//! Given recurring schedules in local time, dated overrides, existing
//! bookings with per-event-type buffers, opaque busy blocks, and an event
//! type's constraints (length, grid, notice, lead time, caps), the engine
//! answers one question: which concrete UTC windows can still be booked?
//! Everything is a pure function over caller-supplied values; the only
//! clock is the `now` instant passed in.
//!
//! ## Modules
//!
//! - [`model`] — schedule, event-type, booking, block, and slot values
//! - [`schedule`] — recurring rules + overrides → merged UTC availability
//! - [`slots`] — the per-host slot pipeline (subtract, clip, place, cap)
//! - [`recurrence`] — structured recurrence rules → concrete occurrences
//! - [`engine`] — adapter trait and engine facade
//! - [`error`] — error types

pub mod engine;
pub mod error;
pub mod model;
pub mod recurrence;
pub mod schedule;
pub mod slots;

pub use kairos_time::{intersect_intervals, merge_intervals, subtract_intervals, Interval};

pub use engine::{SlotEngine, SlotProvider};
pub use error::{Result, SlotError};
pub use model::{
    Block, Booking, BufferPolicy, DayOfWeek, EventType, EventTypeOverride, HostSchedules,
    ResolvedEventType, Schedule, ScheduleOverride, ScheduleRule, Slot, SlotQuery,
};
pub use recurrence::{expand_recurrence, Frequency, RecurrenceRule};
pub use schedule::expand_schedule;
pub use slots::get_available_slots;

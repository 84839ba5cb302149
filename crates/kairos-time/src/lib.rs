//! # kairos-time
//!
//! Shared time primitives for the kairos decision engines.
//!
//! Everything here is a pure function over caller-supplied instants: no I/O,
//! no wall clock, no global state. All instants are `chrono::DateTime<Utc>`
//! and every `(start, end)` pair denotes a half-open interval `[start, end)`.
//!
//! ## Modules
//!
//! - [`interval`] — half-open intervals with merge / subtract / intersect
//! - [`duration`] — duration inputs (raw milliseconds or structured parts)
//! - [`zone`] — `HH:MM` wall times and DST-correct local→UTC conversion
//! - [`unit`] — calendar-unit boundaries (hour/day/week/month/year)
//! - [`window`] — usage windows: resolution, reset instants, descriptions
//! - [`error`] — error types

pub mod duration;
pub mod error;
pub mod interval;
pub mod unit;
pub mod window;
pub mod zone;

pub use duration::DurationSpec;
pub use error::{Result, TimeError};
pub use interval::{intersect_intervals, merge_intervals, subtract_intervals, Interval};
pub use unit::{end_of_unit, monday_of, start_of_unit, CalendarUnit};
pub use window::{describe_window, lifetime_interval, next_reset, resolve_window, WindowSpec};
pub use zone::{civil_date_in, local_time_to_utc, parse_civil_date, LocalTime};

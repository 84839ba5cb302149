//! Error types for kairos-time operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimeError {
    /// A wall time string was not `HH:MM` in 24-hour form.
    #[error("invalid local time {0:?}: expected HH:MM in 24-hour form")]
    InvalidLocalTime(String),

    /// A civil date string was not `YYYY-MM-DD`.
    #[error("invalid civil date {0:?}: expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A zone identifier was not found in the IANA database.
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),
}

pub type Result<T> = std::result::Result<T, TimeError>;

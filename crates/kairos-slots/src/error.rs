//! Error types for kairos-slots operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    /// The provider has no event type under this id.
    #[error("unknown event type: {0}")]
    UnknownEventType(String),

    /// A provider call failed; the underlying error is passed through
    /// untouched.
    #[error(transparent)]
    Adapter(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, SlotError>;

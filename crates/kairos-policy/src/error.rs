//! Error types for kairos-policy operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolicyError {
    /// The fact graph contains a dependency cycle through the named fact.
    #[error("fact dependency cycle involving {0:?}")]
    FactCycle(String),

    /// A fact declared a dependency that no definition provides.
    #[error("unknown fact dependency {0:?}")]
    UnknownFact(String),

    /// A fact value could not be represented as JSON.
    #[error("fact serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A loader or adapter call failed; the underlying error is passed
    /// through untouched.
    #[error(transparent)]
    Adapter(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, PolicyError>;

//! Limit math: the exact arithmetic behind quota decisions.
//!
//! Pure functions over `(limit, used, window)`. The consume obligation is
//! only emitted when the check passes; a failed check reports what is
//! left without committing anything.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kairos_time::{describe_window, next_reset, WindowSpec};

use crate::decision::Obligation;

/// A usage ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Limit {
    Unlimited,
    Finite(u64),
}

/// Uses left under a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Remaining {
    Unlimited,
    Finite(u64),
}

/// The verdict of a single limit check.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitCheck {
    pub allowed: bool,
    pub remaining: Remaining,
    /// Present only on an allowed finite check: the consume the caller
    /// should record.
    pub obligation: Option<Obligation>,
}

/// When an at-limit actor can act again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Availability {
    /// Usable right now.
    Now,
    /// Usable again at a known instant.
    At { at: DateTime<Utc>, reason: String },
    /// Never usable again under this entitlement.
    Never { reason: String },
    /// At limit with a window whose reset cannot be computed.
    Unknown { reason: String },
}

/// Would consuming `consume` more uses stay within the limit?
pub fn check_limit(limit: Limit, used: u64, consume: u64) -> LimitCheck {
    match limit {
        Limit::Unlimited => LimitCheck {
            allowed: true,
            remaining: Remaining::Unlimited,
            obligation: None,
        },
        Limit::Finite(max) => {
            if used + consume > max {
                LimitCheck {
                    allowed: false,
                    remaining: Remaining::Finite(max.saturating_sub(used)),
                    obligation: None,
                }
            } else {
                LimitCheck {
                    allowed: true,
                    remaining: Remaining::Finite(max - used - consume),
                    obligation: Some(Obligation::consume(consume)),
                }
            }
        }
    }
}

/// When the actor can next act, given current usage and the window.
pub fn available_at(
    limit: Limit,
    used: u64,
    window: Option<&WindowSpec>,
    at: DateTime<Utc>,
) -> Availability {
    let max = match limit {
        Limit::Unlimited => return Availability::Now,
        Limit::Finite(max) => max,
    };
    if used < max {
        return Availability::Now;
    }

    match window {
        None | Some(WindowSpec::Lifetime) | Some(WindowSpec::Fixed { .. }) => Availability::Never {
            reason: format!(
                "limit of {max} exhausted and the {} window never resets",
                describe_window(window)
            ),
        },
        Some(spec) => match next_reset(spec, at) {
            Some(reset) => Availability::At {
                at: reset,
                reason: format!("limit of {max} reached; usage resets {}", describe_window(window)),
            },
            None => Availability::Unknown {
                reason: format!("limit of {max} reached with no computable reset"),
            },
        },
    }
}

/// Uses left without consuming anything.
pub fn remaining_quota(limit: Limit, used: u64) -> Remaining {
    match limit {
        Limit::Unlimited => Remaining::Unlimited,
        Limit::Finite(max) => Remaining::Finite(max.saturating_sub(used)),
    }
}

//! Decision values: the structured result of one policy evaluation.
//!
//! Reasons are the product, not just the outcome: every rule contributes
//! exactly one reason in list order, whether it allowed, denied, or
//! skipped.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A declarative side effect attached to an allow result. Opaque to the
/// engine; the caller executes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obligation {
    pub kind: String,
    #[serde(default)]
    pub params: Value,
}

impl Obligation {
    pub fn new(kind: impl Into<String>, params: Value) -> Self {
        Self {
            kind: kind.into(),
            params,
        }
    }

    /// The consume obligation emitted by limit checks.
    pub fn consume(amount: u64) -> Self {
        Self::new("consume", serde_json::json!({ "amount": amount }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleOutcome {
    Allow,
    Deny,
    Skip,
}

/// One rule's verdict with its explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reason {
    pub rule_id: String,
    pub outcome: RuleOutcome,
    pub explanation: String,
    #[serde(default)]
    pub metadata: Option<Value>,
}

/// Evaluation metadata: when, how long, and over which facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub evaluated_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Snapshot of the loaded fact map; its keys are exactly the policy's
    /// fact definitions.
    pub facts: BTreeMap<String, Value>,
}

/// The result of evaluating a policy: a resolver-chosen outcome plus the
/// full account of how it was reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision<T> {
    pub outcome: T,
    /// One reason per rule, in rule-list order.
    pub reasons: Vec<Reason>,
    /// Obligations of every allow result, concatenated in rule order.
    pub obligations: Vec<Obligation>,
    pub trace: Trace,
}

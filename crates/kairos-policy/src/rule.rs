//! Predicate rules and their results.
//!
//! A rule is a pure function over the input and the loaded facts. It must
//! return one of allow / deny / skip with an explanation; allow may carry
//! obligations, and any result may attach metadata for the reason.

use serde_json::Value;

use crate::decision::{Obligation, RuleOutcome};
use crate::fact::FactMap;

/// What one rule concluded.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleResult {
    pub outcome: RuleOutcome,
    pub explanation: String,
    pub obligations: Vec<Obligation>,
    pub metadata: Option<Value>,
}

impl RuleResult {
    pub fn allow(explanation: impl Into<String>) -> Self {
        Self {
            outcome: RuleOutcome::Allow,
            explanation: explanation.into(),
            obligations: Vec::new(),
            metadata: None,
        }
    }

    pub fn allow_with(explanation: impl Into<String>, obligations: Vec<Obligation>) -> Self {
        Self {
            obligations,
            ..Self::allow(explanation)
        }
    }

    pub fn deny(explanation: impl Into<String>) -> Self {
        Self {
            outcome: RuleOutcome::Deny,
            explanation: explanation.into(),
            obligations: Vec::new(),
            metadata: None,
        }
    }

    pub fn skip(explanation: impl Into<String>) -> Self {
        Self {
            outcome: RuleOutcome::Skip,
            explanation: explanation.into(),
            obligations: Vec::new(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

type RuleFn<I> = Box<dyn Fn(&I, &FactMap) -> RuleResult + Send + Sync>;

/// A named predicate rule.
pub struct Rule<I> {
    id: String,
    eval: RuleFn<I>,
}

impl<I> Rule<I> {
    pub fn new(
        id: impl Into<String>,
        eval: impl Fn(&I, &FactMap) -> RuleResult + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            eval: Box::new(eval),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn evaluate(&self, input: &I, facts: &FactMap) -> RuleResult {
        (self.eval)(input, facts)
    }
}

/// One rule's result paired with the rule id, as handed to resolvers.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEvaluation {
    pub rule_id: String,
    pub result: RuleResult,
}

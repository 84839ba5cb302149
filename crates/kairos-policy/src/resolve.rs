//! Resolvers: fold the ordered rule results into the decision outcome.
//!
//! A resolver is any function value over `(results, input, facts)`; the
//! built-ins cover the common combinators. Skips never count against
//! either of the boolean resolvers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::decision::RuleOutcome;
use crate::fact::FactMap;
use crate::rule::RuleEvaluation;

/// The outcome-combining function of a policy.
pub type Resolver<I, T> = Box<dyn Fn(&[RuleEvaluation], &I, &FactMap) -> T + Send + Sync>;

/// Boolean outcome produced by the built-in boolean resolvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub allowed: bool,
}

/// Allowed iff no rule denied. Skips are allowed.
pub fn all_must_allow<I>() -> Resolver<I, Verdict> {
    Box::new(|evaluations, _, _| Verdict {
        allowed: !evaluations
            .iter()
            .any(|e| e.result.outcome == RuleOutcome::Deny),
    })
}

/// Allowed iff at least one rule allowed.
pub fn any_must_allow<I>() -> Resolver<I, Verdict> {
    Box::new(|evaluations, _, _| Verdict {
        allowed: evaluations
            .iter()
            .any(|e| e.result.outcome == RuleOutcome::Allow),
    })
}

/// Sum of the weights of allowing rules. Rules without a table entry
/// weigh zero.
pub fn weighted_score<I>(weights: BTreeMap<String, i64>) -> Resolver<I, i64> {
    Box::new(move |evaluations, _, _| {
        evaluations
            .iter()
            .filter(|e| e.result.outcome == RuleOutcome::Allow)
            .map(|e| weights.get(&e.rule_id).copied().unwrap_or(0))
            .sum()
    })
}

//! The policy evaluator: load facts, run every rule, resolve, explain.
//!
//! Evaluation is deterministic for a given policy and input (apart from
//! the trace's clock fields). There is no short-circuiting: every rule
//! runs so the decision carries a complete set of reasons. Loader errors
//! propagate unchanged; no partial decision is returned.

use std::time::Instant;

use chrono::Utc;
use tracing::debug;

use crate::decision::{Decision, Reason, RuleOutcome, Trace};
use crate::error::Result;
use crate::fact::{load_facts, FactDefinition};
use crate::resolve::Resolver;
use crate::rule::{Rule, RuleEvaluation};

/// Facts, rules, and a resolver: everything needed to evaluate.
pub struct Policy<I, T> {
    pub facts: Vec<FactDefinition<I>>,
    pub rules: Vec<Rule<I>>,
    pub resolver: Resolver<I, T>,
}

/// Evaluate the policy against one input.
pub fn evaluate<I, T>(policy: &Policy<I, T>, input: &I) -> Result<Decision<T>> {
    let evaluated_at = Utc::now();
    let started = Instant::now();

    let facts = load_facts(&policy.facts, input)?;
    debug!(
        facts = facts.len(),
        rules = policy.rules.len(),
        "facts loaded, evaluating rules"
    );

    let mut evaluations = Vec::with_capacity(policy.rules.len());
    for rule in &policy.rules {
        let result = rule.evaluate(input, &facts);
        evaluations.push(RuleEvaluation {
            rule_id: rule.id().to_string(),
            result,
        });
    }

    let outcome = (policy.resolver)(&evaluations, input, &facts);

    let reasons: Vec<Reason> = evaluations
        .iter()
        .map(|e| Reason {
            rule_id: e.rule_id.clone(),
            outcome: e.result.outcome,
            explanation: e.result.explanation.clone(),
            metadata: e.result.metadata.clone(),
        })
        .collect();

    let obligations = evaluations
        .into_iter()
        .filter(|e| e.result.outcome == RuleOutcome::Allow)
        .flat_map(|e| e.result.obligations)
        .collect();

    debug!(reasons = reasons.len(), "policy evaluated");
    Ok(Decision {
        outcome,
        reasons,
        obligations,
        trace: Trace {
            evaluated_at,
            duration_ms: started.elapsed().as_millis() as u64,
            facts,
        },
    })
}

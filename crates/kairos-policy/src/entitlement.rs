//! Entitlement queries: typed quota answers over an adapter.
//!
//! An entitlement is a `(limit, window)` pair keyed by action. The adapter
//! supplies entitlements and usage counts; every usage call receives the
//! exact interval to count over, which is always the resolved window (the
//! lifetime interval when there is no window).
//!
//! `check` is assembled as a real policy -- an entitlements fact, a usage
//! fact depending on it, one limit rule, and the all-must-allow resolver --
//! so its decision carries ordered reasons, the consume obligation, and a
//! trace whose snapshot holds the loaded entitlement map.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use kairos_time::{describe_window, lifetime_interval, next_reset, resolve_window, Interval, WindowSpec};

use crate::decision::{Decision, Obligation};
use crate::engine::{evaluate, Policy};
use crate::error::Result;
use crate::fact::{FactDefinition, FactMap};
use crate::limit::{available_at, check_limit, remaining_quota, Availability, Limit, Remaining};
use crate::resolve::{all_must_allow, Verdict};
use crate::rule::{Rule, RuleResult};

/// What an actor is entitled to for one action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entitlement {
    pub limit: Limit,
    /// Counting window; `None` means usage accumulates over the lifetime
    /// interval.
    #[serde(default)]
    pub window: Option<WindowSpec>,
}

/// The adapter supplying entitlements and usage counts.
pub trait EntitlementsProvider {
    fn entitlements(&self, actor_id: &str) -> Result<BTreeMap<String, Entitlement>>;

    /// Usage recorded for `(actor, action)` within `interval`.
    fn usage(&self, actor_id: &str, action: &str, interval: &Interval) -> Result<u64>;
}

/// A projected quota view for dashboards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotaState {
    pub name: String,
    pub limit: Limit,
    pub used: u64,
    pub remaining: Remaining,
    pub window: Option<WindowSpec>,
    /// Next reset instant, absent for windows that never reset.
    pub resets_at: Option<DateTime<Utc>>,
    /// The interval usage was counted over.
    pub interval: Interval,
}

/// Per-action capability classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ActionCapability {
    /// Usable now; `quota` is absent for unlimited entitlements.
    Available {
        quota: Option<QuotaState>,
        obligation: Obligation,
    },
    /// Entitled but out of uses.
    Exhausted {
        quota: QuotaState,
        reason: String,
        available_at: Option<DateTime<Utc>>,
    },
    /// No entitlement for this action.
    Unavailable { reason: String },
}

/// The capability map plus summary name lists, in query order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Capabilities {
    pub actions: BTreeMap<String, ActionCapability>,
    pub available: Vec<String>,
    pub exhausted: Vec<String>,
    pub unavailable: Vec<String>,
}

/// Answer to `remaining_uses`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemainingUses {
    pub uses: Remaining,
    /// The constraint that bounds `uses`; `None` when unlimited.
    pub limited_by: Option<String>,
}

/// Input threaded through the check policy; carries the adapter so facts
/// and rules stay plain functions over `(input, facts)`.
pub struct CheckInput<'a, P> {
    pub provider: &'a P,
    pub actor_id: &'a str,
    pub action: &'a str,
    pub consume: u64,
    pub at: DateTime<Utc>,
}

/// Stateless facade binding an [`EntitlementsProvider`] to the entitlement
/// queries. All queries accept an optional reference instant and fall back
/// to the wall clock.
pub struct EntitlementsEngine<P> {
    provider: P,
}

impl<P: EntitlementsProvider> EntitlementsEngine<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// May the actor perform `action` `consume` more times right now?
    ///
    /// An action without an entitlement is denied with a well-formed
    /// reason, not an error; the trace still carries the loaded
    /// entitlement map.
    pub fn check(
        &self,
        actor_id: &str,
        action: &str,
        consume: u64,
        at: Option<DateTime<Utc>>,
    ) -> Result<Decision<Verdict>> {
        let at = at.unwrap_or_else(Utc::now);
        let policy = check_policy::<P>();
        let input = CheckInput {
            provider: &self.provider,
            actor_id,
            action,
            consume,
            at,
        };
        evaluate(&policy, &input)
    }

    /// Classify each requested action as available, exhausted, or
    /// unavailable.
    pub fn capabilities(
        &self,
        actor_id: &str,
        actions: &[String],
        at: Option<DateTime<Utc>>,
    ) -> Result<Capabilities> {
        let at = at.unwrap_or_else(Utc::now);
        let entitlements = self.provider.entitlements(actor_id)?;

        let mut caps = Capabilities::default();
        for action in actions {
            let capability = match entitlements.get(action) {
                None => ActionCapability::Unavailable {
                    reason: "No entitlement defined".to_string(),
                },
                Some(ent) => self.classify(actor_id, action, ent, at)?,
            };

            match &capability {
                ActionCapability::Available { .. } => caps.available.push(action.clone()),
                ActionCapability::Exhausted { .. } => caps.exhausted.push(action.clone()),
                ActionCapability::Unavailable { .. } => caps.unavailable.push(action.clone()),
            }
            caps.actions.insert(action.clone(), capability);
        }
        Ok(caps)
    }

    /// When can the actor next perform `action`?
    pub fn available_at(
        &self,
        actor_id: &str,
        action: &str,
        at: Option<DateTime<Utc>>,
    ) -> Result<Availability> {
        let at = at.unwrap_or_else(Utc::now);
        let entitlements = self.provider.entitlements(actor_id)?;

        let Some(ent) = entitlements.get(action) else {
            return Ok(Availability::Never {
                reason: "No entitlement defined".to_string(),
            });
        };
        if ent.limit == Limit::Unlimited {
            return Ok(Availability::Now);
        }

        let used = self.usage_in_window(actor_id, action, ent, at)?;
        Ok(available_at(ent.limit, used, ent.window.as_ref(), at))
    }

    /// How many uses are left for `action`?
    pub fn remaining_uses(
        &self,
        actor_id: &str,
        action: &str,
        at: Option<DateTime<Utc>>,
    ) -> Result<RemainingUses> {
        let at = at.unwrap_or_else(Utc::now);
        let entitlements = self.provider.entitlements(actor_id)?;

        let Some(ent) = entitlements.get(action) else {
            return Ok(RemainingUses {
                uses: Remaining::Finite(0),
                limited_by: Some("no-entitlement".to_string()),
            });
        };
        if ent.limit == Limit::Unlimited {
            return Ok(RemainingUses {
                uses: Remaining::Unlimited,
                limited_by: None,
            });
        }

        let used = self.usage_in_window(actor_id, action, ent, at)?;
        Ok(RemainingUses {
            uses: remaining_quota(ent.limit, used),
            limited_by: Some(action.to_string()),
        })
    }

    /// Quota states for every entitled action.
    pub fn dashboard(
        &self,
        actor_id: &str,
        at: Option<DateTime<Utc>>,
    ) -> Result<BTreeMap<String, QuotaState>> {
        let at = at.unwrap_or_else(Utc::now);
        let entitlements = self.provider.entitlements(actor_id)?;

        let mut board = BTreeMap::new();
        for (action, ent) in &entitlements {
            board.insert(action.clone(), self.quota_state(actor_id, action, ent, at)?);
        }
        Ok(board)
    }

    fn usage_in_window(
        &self,
        actor_id: &str,
        action: &str,
        ent: &Entitlement,
        at: DateTime<Utc>,
    ) -> Result<u64> {
        let interval = window_interval(ent.window.as_ref(), at);
        self.provider.usage(actor_id, action, &interval)
    }

    fn quota_state(
        &self,
        actor_id: &str,
        action: &str,
        ent: &Entitlement,
        at: DateTime<Utc>,
    ) -> Result<QuotaState> {
        let interval = window_interval(ent.window.as_ref(), at);
        let used = self.provider.usage(actor_id, action, &interval)?;
        Ok(QuotaState {
            name: action.to_string(),
            limit: ent.limit,
            used,
            remaining: remaining_quota(ent.limit, used),
            window: ent.window,
            resets_at: ent.window.as_ref().and_then(|w| next_reset(w, at)),
            interval,
        })
    }

    fn classify(
        &self,
        actor_id: &str,
        action: &str,
        ent: &Entitlement,
        at: DateTime<Utc>,
    ) -> Result<ActionCapability> {
        if ent.limit == Limit::Unlimited {
            return Ok(ActionCapability::Available {
                quota: None,
                obligation: Obligation::consume(1),
            });
        }

        let quota = self.quota_state(actor_id, action, ent, at)?;
        let check = check_limit(ent.limit, quota.used, 1);
        if check.allowed {
            return Ok(ActionCapability::Available {
                obligation: check.obligation.unwrap_or_else(|| Obligation::consume(1)),
                quota: Some(quota),
            });
        }

        let (reason, when) = match available_at(ent.limit, quota.used, ent.window.as_ref(), at) {
            Availability::At { at, reason } => (reason, Some(at)),
            Availability::Never { reason } | Availability::Unknown { reason } => (reason, None),
            // An exhausted finite quota cannot be Now.
            Availability::Now => ("quota exhausted".to_string(), None),
        };
        Ok(ActionCapability::Exhausted {
            quota,
            reason,
            available_at: when,
        })
    }
}

/// The interval the adapter counts usage over: the resolved window, or the
/// lifetime interval when no window is set.
pub fn window_interval(window: Option<&WindowSpec>, at: DateTime<Utc>) -> Interval {
    match window {
        Some(spec) => resolve_window(spec, at),
        None => lifetime_interval(),
    }
}

/// The check policy: entitlements fact → usage fact → limit rule.
fn check_policy<'a, P: EntitlementsProvider>() -> Policy<CheckInput<'a, P>, Verdict> {
    Policy {
        facts: vec![
            FactDefinition::new("entitlements", |input: &CheckInput<'_, P>, _: &FactMap| {
                let map = input.provider.entitlements(input.actor_id)?;
                Ok(serde_json::to_value(map)?)
            }),
            FactDefinition::with_deps(
                "usage",
                &["entitlements"],
                |input: &CheckInput<'_, P>, facts: &FactMap| {
                    let Some(ent) = entitlement_from_facts(facts, input.action) else {
                        return Ok(Value::from(0u64));
                    };
                    let interval = window_interval(ent.window.as_ref(), input.at);
                    let used = input.provider.usage(input.actor_id, input.action, &interval)?;
                    Ok(Value::from(used))
                },
            ),
        ],
        rules: vec![Rule::new(
            "limit",
            |input: &CheckInput<'_, P>, facts: &FactMap| {
                let Some(ent) = entitlement_from_facts(facts, input.action) else {
                    return RuleResult::deny("No entitlement defined");
                };
                let used = facts.get("usage").and_then(Value::as_u64).unwrap_or(0);

                let check = check_limit(ent.limit, used, input.consume);
                let metadata = serde_json::json!({
                    "used": used,
                    "remaining": check.remaining,
                });
                if check.allowed {
                    let obligations = check.obligation.into_iter().collect();
                    RuleResult::allow_with(
                        format!("within the limit {}", describe_window(ent.window.as_ref())),
                        obligations,
                    )
                    .with_metadata(metadata)
                } else {
                    RuleResult::deny(format!(
                        "limit reached {}",
                        describe_window(ent.window.as_ref())
                    ))
                    .with_metadata(metadata)
                }
            },
        )],
        resolver: all_must_allow(),
    }
}

fn entitlement_from_facts(facts: &FactMap, action: &str) -> Option<Entitlement> {
    facts
        .get("entitlements")
        .and_then(|map| map.get(action))
        .and_then(|raw| serde_json::from_value(raw.clone()).ok())
}

//! # kairos-policy
//!
//! Deterministic policy evaluation and entitlement quotas.
//!
//! A policy is a fact graph, an ordered list of predicate rules, and a
//! resolver. Evaluation loads facts in dependency order, runs every rule
//! (no short-circuiting -- the reasons are the product), folds the results
//! through the resolver, and returns a [`Decision`] with reasons,
//! obligations, and a trace. On top sit the entitlement queries: typed
//! quota answers (check / capabilities / available-at / remaining-uses /
//! dashboard) over a calendar/sliding/lifetime/fixed window model whose
//! math is exact across DST.
//!
//! ## Modules
//!
//! - [`decision`] — decisions, reasons, obligations, traces
//! - [`fact`] — named fact definitions and the topological loader
//! - [`rule`] — predicate rules and result constructors
//! - [`resolve`] — built-in and custom resolvers
//! - [`engine`] — the evaluator
//! - [`limit`] — pure limit math
//! - [`entitlement`] — entitlement queries over an adapter
//! - [`error`] — error types

pub mod decision;
pub mod engine;
pub mod entitlement;
pub mod error;
pub mod fact;
pub mod limit;
pub mod resolve;
pub mod rule;

pub use decision::{Decision, Obligation, Reason, RuleOutcome, Trace};
pub use engine::{evaluate, Policy};
pub use entitlement::{
    ActionCapability, Capabilities, CheckInput, Entitlement, EntitlementsEngine,
    EntitlementsProvider, QuotaState, RemainingUses,
};
pub use error::{PolicyError, Result};
pub use fact::{load_facts, FactDefinition, FactMap};
pub use limit::{available_at, check_limit, remaining_quota, Availability, Limit, LimitCheck, Remaining};
pub use resolve::{all_must_allow, any_must_allow, weighted_score, Resolver, Verdict};
pub use rule::{Rule, RuleEvaluation, RuleResult};

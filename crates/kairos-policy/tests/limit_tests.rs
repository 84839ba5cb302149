//! Tests for the pure limit math.

use chrono::{DateTime, Utc};
use kairos_policy::{
    available_at, check_limit, remaining_quota, Availability, Limit, Remaining,
};
use kairos_time::{CalendarUnit, DurationSpec, WindowSpec};

fn t(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

// ── check_limit ─────────────────────────────────────────────────────────────

#[test]
fn unlimited_always_allows_without_obligation() {
    for (used, consume) in [(0, 1), (10, 5), (1_000_000, 999)] {
        let check = check_limit(Limit::Unlimited, used, consume);
        assert!(check.allowed);
        assert_eq!(check.remaining, Remaining::Unlimited);
        assert!(check.obligation.is_none());
    }
}

#[test]
fn within_limit_allows_with_a_consume_obligation() {
    let check = check_limit(Limit::Finite(100), 50, 1);
    assert!(check.allowed);
    assert_eq!(check.remaining, Remaining::Finite(49));

    let obligation = check.obligation.expect("allowed finite check carries a consume");
    assert_eq!(obligation.kind, "consume");
    assert_eq!(obligation.params["amount"], 1);
}

#[test]
fn consuming_the_last_use_is_allowed() {
    let check = check_limit(Limit::Finite(100), 99, 1);
    assert!(check.allowed);
    assert_eq!(check.remaining, Remaining::Finite(0));
}

#[test]
fn over_limit_denies_without_obligation() {
    let check = check_limit(Limit::Finite(100), 100, 1);
    assert!(!check.allowed);
    assert_eq!(check.remaining, Remaining::Finite(0));
    assert!(check.obligation.is_none());
}

#[test]
fn denied_remaining_never_goes_negative() {
    let check = check_limit(Limit::Finite(100), 150, 1);
    assert!(!check.allowed);
    assert_eq!(check.remaining, Remaining::Finite(0));
}

#[test]
fn bulk_consume_is_all_or_nothing() {
    // 3 left but 5 requested: deny, and report what is left.
    let check = check_limit(Limit::Finite(10), 7, 5);
    assert!(!check.allowed);
    assert_eq!(check.remaining, Remaining::Finite(3));

    let check = check_limit(Limit::Finite(10), 7, 3);
    assert!(check.allowed);
    assert_eq!(check.remaining, Remaining::Finite(0));
}

// ── available_at ────────────────────────────────────────────────────────────

#[test]
fn under_limit_is_available_now() {
    let window = WindowSpec::Calendar {
        unit: CalendarUnit::Month,
        zone: None,
    };
    let at = t("2024-01-15T12:00:00Z");
    assert_eq!(available_at(Limit::Finite(10), 3, Some(&window), at), Availability::Now);
    assert_eq!(available_at(Limit::Unlimited, 1_000, None, at), Availability::Now);
}

#[test]
fn exhausted_calendar_window_points_at_the_next_reset() {
    let window = WindowSpec::Calendar {
        unit: CalendarUnit::Month,
        zone: None,
    };
    let result = available_at(Limit::Finite(10), 10, Some(&window), t("2024-01-15T12:00:00Z"));
    match result {
        Availability::At { at, .. } => assert_eq!(at, t("2024-02-01T00:00:00Z")),
        other => panic!("expected At, got {other:?}"),
    }
}

#[test]
fn exhausted_sliding_window_points_one_duration_ahead() {
    let window = WindowSpec::Sliding {
        duration: DurationSpec::Millis(3_600_000),
    };
    let result = available_at(Limit::Finite(5), 5, Some(&window), t("2024-01-15T12:00:00Z"));
    match result {
        Availability::At { at, .. } => assert_eq!(at, t("2024-01-15T13:00:00Z")),
        other => panic!("expected At, got {other:?}"),
    }
}

#[test]
fn exhausted_without_a_resetting_window_is_never() {
    let at = t("2024-01-15T12:00:00Z");
    let fixed = WindowSpec::Fixed {
        start: t("2024-01-01T00:00:00Z"),
        end: t("2024-02-01T00:00:00Z"),
    };

    for window in [None, Some(WindowSpec::Lifetime), Some(fixed)] {
        match available_at(Limit::Finite(10), 10, window.as_ref(), at) {
            Availability::Never { reason } => assert!(!reason.is_empty()),
            other => panic!("expected Never, got {other:?}"),
        }
    }
}

// ── remaining_quota ─────────────────────────────────────────────────────────

#[test]
fn remaining_quota_saturates_at_zero() {
    assert_eq!(remaining_quota(Limit::Unlimited, 42), Remaining::Unlimited);
    assert_eq!(remaining_quota(Limit::Finite(10), 4), Remaining::Finite(6));
    assert_eq!(remaining_quota(Limit::Finite(10), 10), Remaining::Finite(0));
    assert_eq!(remaining_quota(Limit::Finite(10), 25), Remaining::Finite(0));
}

//! Integration tests for the policy engine's public surface.

use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use pythia::application::policy::{PolicyEngine, Violation};
use pythia::domain::id::MarketId;
use pythia::domain::limits::RiskLimits;

fn market(id: &str) -> MarketId {
    MarketId::new(id)
}

#[test]
fn position_limit_scenario() {
    let limits = RiskLimits {
        max_position_size: dec!(100),
        ..RiskLimits::default()
    };
    let policy = PolicyEngine::new(limits);

    policy.record_fill(&market("market1"), dec!(80), dec!(1.0), true, Decimal::ZERO);

    let verdict = policy.check_order(&market("market1"), dec!(30), dec!(1.0), true);
    assert!(matches!(verdict, Err(Violation::PositionLimit { .. })));
}

#[test]
fn cooldown_scenario() {
    let limits = RiskLimits {
        cooldown_after_loss: Duration::hours(1),
        ..RiskLimits::default()
    };
    let policy = PolicyEngine::new(limits);

    policy.record_fill(&market("market1"), dec!(10), dec!(1.0), false, dec!(-50));

    let verdict = policy.check_order(&market("market2"), dec!(10), dec!(1.0), true);
    assert!(matches!(verdict, Err(Violation::CooldownActive { .. })));
}

#[test]
fn verdicts_are_deterministic_given_ledger_state() {
    let policy = PolicyEngine::new(RiskLimits::default());
    let first = policy.check_order(&market("m"), dec!(10), dec!(0.5), true);
    let second = policy.check_order(&market("m"), dec!(10), dec!(0.5), true);
    assert_eq!(first, second);

    policy.record_fill(&market("m"), dec!(10), dec!(0.5), true, Decimal::ZERO);
    let third = policy.check_order(&market("m"), dec!(10), dec!(0.5), true);
    let fourth = policy.check_order(&market("m"), dec!(10), dec!(0.5), true);
    assert_eq!(third, fourth);
}

#[test]
fn exposure_tracks_fills_across_markets() {
    let policy = PolicyEngine::new(RiskLimits::default());

    policy.record_fill(&market("a"), dec!(100), dec!(0.40), true, Decimal::ZERO);
    policy.record_fill(&market("b"), dec!(50), dec!(0.60), true, Decimal::ZERO);

    assert_eq!(policy.total_exposure(), dec!(70.0));
    assert_eq!(policy.position(&market("a")), dec!(100));
    assert_eq!(policy.position(&market("b")), dec!(50));
}

#[test]
fn violations_expose_stable_kinds() {
    let mut limits = RiskLimits::default();
    limits.blocked_markets.insert(market("bad"));
    let policy = PolicyEngine::new(limits);

    let verdict = policy
        .check_order(&market("bad"), dec!(10), dec!(1.0), true)
        .unwrap_err();
    assert_eq!(verdict.kind(), "market_blocked");
    assert!(verdict.to_string().contains("bad"));
}

#[test]
fn slippage_is_relative_to_expected() {
    let limits = RiskLimits {
        max_slippage: dec!(0.02),
        ..RiskLimits::default()
    };
    let policy = PolicyEngine::new(limits);

    assert!(policy.check_slippage(dec!(0.50), dec!(0.51)).is_ok());
    assert!(policy.check_slippage(dec!(0.50), dec!(0.49)).is_ok());
    assert!(matches!(
        policy.check_slippage(dec!(0.50), dec!(0.55)),
        Err(Violation::SlippageExcessive { .. })
    ));
}

#[test]
fn session_reset_clears_counters_only() {
    let policy = PolicyEngine::new(RiskLimits::default());
    policy.record_order(&market("m"));
    policy.record_fill(&market("m"), dec!(20), dec!(0.5), true, dec!(-5));

    policy.reset_session();

    assert_eq!(policy.position(&market("m")), dec!(20));
    let status = policy.status();
    assert_eq!(status.open_orders, 0);
    assert_eq!(status.daily.orders, 0);
    assert!(!status.cooldown_active);
}

//! Risk limit configuration for the policy engine.

use std::collections::HashSet;

use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::id::MarketId;

/// Numeric risk limits enforced by the policy engine.
///
/// Created once at engine construction and never mutated for the life of
/// the session.
#[derive(Debug, Clone)]
pub struct RiskLimits {
    /// Maximum signed position per market, in shares.
    pub max_position_size: Decimal,
    /// Maximum total exposure across all markets, in dollars.
    pub max_total_exposure: Decimal,
    /// Maximum fraction of total exposure allowed in one market, in [0, 1].
    pub max_concentration: Decimal,
    /// Maximum notional for a single order.
    pub max_order_size: Decimal,
    /// Minimum notional for a single order.
    pub min_order_size: Decimal,
    /// Maximum simultaneously open orders.
    pub max_open_orders: u32,
    /// Maximum orders per calendar day.
    pub max_daily_orders: u32,
    /// Maximum notional volume per calendar day.
    pub max_daily_volume: Decimal,
    /// Maximum cumulative realized loss per calendar day.
    pub max_daily_loss: Decimal,
    /// Maximum relative slippage tolerated between expected and actual
    /// price, as a fraction.
    pub max_slippage: Decimal,
    /// How long to refuse orders after any realized loss. Zero disables
    /// the cooldown.
    pub cooldown_after_loss: Duration,
    /// How long a session may run before orders are refused.
    pub max_session_duration: Duration,
    /// When present, only these markets may be traded.
    pub allowed_markets: Option<HashSet<MarketId>>,
    /// Markets that may never be traded.
    pub blocked_markets: HashSet<MarketId>,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_position_size: dec!(500),
            max_total_exposure: dec!(5000),
            // The first fill in an empty book is always 100% concentrated,
            // so anything below 1 must be an explicit operator choice.
            max_concentration: Decimal::ONE,
            max_order_size: dec!(250),
            min_order_size: dec!(5),
            max_open_orders: 10,
            max_daily_orders: 50,
            max_daily_volume: dec!(2500),
            max_daily_loss: dec!(250),
            max_slippage: dec!(0.05),
            cooldown_after_loss: Duration::hours(1),
            max_session_duration: Duration::hours(24),
            allowed_markets: None,
            blocked_markets: HashSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_are_internally_consistent() {
        let limits = RiskLimits::default();
        assert!(limits.min_order_size < limits.max_order_size);
        assert!(limits.max_order_size <= limits.max_daily_volume);
        assert!(limits.max_concentration <= Decimal::ONE);
        assert!(limits.blocked_markets.is_empty());
        assert!(limits.allowed_markets.is_none());
    }
}

//! Risk-policy engine.
//!
//! A synchronous admission controller: every proposed order is validated
//! against the configured [`RiskLimits`] and the in-memory ledger of
//! recorded orders and fills. Checks run in a fixed order and the first
//! failing predicate determines the [`Violation`].
//!
//! Every public method takes the single ledger mutex; nothing blocks or
//! calls out while holding it, so the serialization cost is negligible at
//! the workflow's tick rate.

mod violation;

use std::collections::HashMap;

use chrono::{DateTime, Local, NaiveDate, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::domain::id::MarketId;
use crate::domain::limits::RiskLimits;
use crate::domain::money::{Notional, Price};

pub use violation::Violation;

/// Daily counters with their window anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyStats {
    pub orders: u32,
    pub volume: Decimal,
    pub loss: Decimal,
    /// Local calendar day the counters belong to.
    pub window: NaiveDate,
}

/// Read-only snapshot of the engine state.
#[derive(Debug, Clone)]
pub struct PolicyStatus {
    pub open_orders: u32,
    pub total_exposure: Decimal,
    /// Markets with a non-zero position.
    pub positions: usize,
    pub daily: DailyStats,
    pub session_start: DateTime<Utc>,
    pub cooldown_active: bool,
    pub session_expired: bool,
}

/// Mutable ledger guarded by the engine mutex.
struct Ledger {
    /// Signed position per market; positive means long YES. Never
    /// negative: sells clamp at zero.
    positions: HashMap<MarketId, Decimal>,
    /// Price of the last recorded fill per market, used for exposure.
    last_fill_price: HashMap<MarketId, Price>,
    open_orders: u32,
    daily_orders: u32,
    daily_volume: Decimal,
    daily_loss: Decimal,
    window: NaiveDate,
    last_loss_at: Option<DateTime<Utc>>,
    session_start: DateTime<Utc>,
}

impl Ledger {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            positions: HashMap::new(),
            last_fill_price: HashMap::new(),
            open_orders: 0,
            daily_orders: 0,
            daily_volume: Decimal::ZERO,
            daily_loss: Decimal::ZERO,
            window: local_day(now),
            last_loss_at: None,
            session_start: now,
        }
    }

    /// Zero the daily counters when the local calendar day has rolled.
    fn roll_window(&mut self, now: DateTime<Utc>) {
        let today = local_day(now);
        if today != self.window {
            debug!(from = %self.window, to = %today, "Daily window rolled");
            self.daily_orders = 0;
            self.daily_volume = Decimal::ZERO;
            self.daily_loss = Decimal::ZERO;
            self.window = today;
        }
    }

    fn total_exposure(&self) -> Decimal {
        self.positions
            .iter()
            .map(|(market, position)| {
                let price = self
                    .last_fill_price
                    .get(market)
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                *position * price
            })
            .sum()
    }

    fn market_exposure(&self, market: &MarketId) -> Decimal {
        let position = self.positions.get(market).copied().unwrap_or(Decimal::ZERO);
        let price = self
            .last_fill_price
            .get(market)
            .copied()
            .unwrap_or(Decimal::ZERO);
        position * price
    }
}

fn local_day(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&Local).date_naive()
}

/// The risk-policy admission engine.
pub struct PolicyEngine {
    limits: RiskLimits,
    ledger: Mutex<Ledger>,
}

impl PolicyEngine {
    /// Create an engine with the given limits. The limits are immutable
    /// for the life of the engine.
    #[must_use]
    pub fn new(limits: RiskLimits) -> Self {
        info!(
            max_position = %limits.max_position_size,
            max_exposure = %limits.max_total_exposure,
            max_daily_orders = limits.max_daily_orders,
            "Policy engine ready"
        );
        Self {
            limits,
            ledger: Mutex::new(Ledger::new(Utc::now())),
        }
    }

    /// The limits this engine enforces.
    #[must_use]
    pub fn limits(&self) -> &RiskLimits {
        &self.limits
    }

    /// Validate a proposed order against every limit.
    ///
    /// Read-only apart from daily-window bookkeeping; two identical calls
    /// without an intervening `record_*` return the same verdict.
    pub fn check_order(
        &self,
        market: &MarketId,
        size: Decimal,
        price: Price,
        is_buy: bool,
    ) -> Result<(), Violation> {
        self.check_order_at(market, size, price, is_buy, Utc::now())
    }

    fn check_order_at(
        &self,
        market: &MarketId,
        size: Decimal,
        price: Price,
        is_buy: bool,
        now: DateTime<Utc>,
    ) -> Result<(), Violation> {
        let mut ledger = self.ledger.lock();
        ledger.roll_window(now);

        if now - ledger.session_start > self.limits.max_session_duration {
            return Err(Violation::SessionExpired {
                started: ledger.session_start,
            });
        }

        if self.limits.cooldown_after_loss > chrono::Duration::zero() {
            if let Some(lost_at) = ledger.last_loss_at {
                if now - lost_at < self.limits.cooldown_after_loss {
                    return Err(Violation::CooldownActive {
                        until: lost_at + self.limits.cooldown_after_loss,
                    });
                }
            }
        }

        if ledger.daily_loss >= self.limits.max_daily_loss {
            return Err(Violation::DailyLossExceeded {
                loss: ledger.daily_loss,
                limit: self.limits.max_daily_loss,
            });
        }

        if self.limits.blocked_markets.contains(market) {
            return Err(Violation::MarketBlocked {
                market: market.clone(),
            });
        }

        if let Some(allowed) = &self.limits.allowed_markets {
            if !allowed.contains(market) {
                return Err(Violation::MarketNotAllowed {
                    market: market.clone(),
                });
            }
        }

        if ledger.open_orders >= self.limits.max_open_orders {
            return Err(Violation::TooManyOpenOrders {
                open: ledger.open_orders,
                limit: self.limits.max_open_orders,
            });
        }

        if ledger.daily_orders >= self.limits.max_daily_orders {
            return Err(Violation::DailyOrderLimit {
                orders: ledger.daily_orders,
                limit: self.limits.max_daily_orders,
            });
        }

        let notional: Notional = size * price;
        if notional > self.limits.max_order_size {
            return Err(Violation::OrderTooLarge {
                notional,
                limit: self.limits.max_order_size,
            });
        }
        if notional < self.limits.min_order_size {
            return Err(Violation::OrderTooSmall {
                notional,
                limit: self.limits.min_order_size,
            });
        }

        if ledger.daily_volume + notional > self.limits.max_daily_volume {
            return Err(Violation::DailyVolumeLimit {
                volume: ledger.daily_volume + notional,
                limit: self.limits.max_daily_volume,
            });
        }

        if is_buy {
            let position = ledger.positions.get(market).copied().unwrap_or(Decimal::ZERO);
            if position + size > self.limits.max_position_size {
                return Err(Violation::PositionLimit {
                    market: market.clone(),
                    position: position + size,
                    limit: self.limits.max_position_size,
                });
            }
        }

        let exposure = ledger.total_exposure();
        if exposure + notional > self.limits.max_total_exposure {
            return Err(Violation::ExposureLimit {
                exposure: exposure + notional,
                limit: self.limits.max_total_exposure,
            });
        }

        let post_total = exposure + notional;
        if post_total > Decimal::ZERO {
            let post_market = ledger.market_exposure(market) + notional;
            let concentration = post_market / post_total;
            if concentration > self.limits.max_concentration {
                return Err(Violation::ConcentrationLimit {
                    market: market.clone(),
                    concentration,
                    limit: self.limits.max_concentration,
                });
            }
        }

        Ok(())
    }

    /// Validate realized slippage between expected and actual price.
    ///
    /// An expected price of zero always passes; there is no meaningful
    /// relative measure against it.
    pub fn check_slippage(&self, expected: Price, actual: Price) -> Result<(), Violation> {
        if expected == Decimal::ZERO {
            return Ok(());
        }
        let relative = ((actual - expected) / expected).abs();
        if relative > self.limits.max_slippage {
            return Err(Violation::SlippageExcessive {
                expected,
                actual,
                limit: self.limits.max_slippage,
            });
        }
        Ok(())
    }

    /// Record a dispatched order.
    pub fn record_order(&self, market: &MarketId) {
        self.record_order_at(market, Utc::now());
    }

    fn record_order_at(&self, market: &MarketId, now: DateTime<Utc>) {
        let mut ledger = self.ledger.lock();
        ledger.roll_window(now);
        ledger.open_orders += 1;
        ledger.daily_orders += 1;
        debug!(
            market = %market,
            open_orders = ledger.open_orders,
            daily_orders = ledger.daily_orders,
            "Order recorded"
        );
    }

    /// Record an order cancellation. The daily counter is unchanged.
    pub fn record_order_canceled(&self) {
        let mut ledger = self.ledger.lock();
        ledger.open_orders = ledger.open_orders.saturating_sub(1);
    }

    /// Record a fill, updating positions, exposure inputs, and daily
    /// counters. A negative `realized_pnl` starts the loss cooldown.
    pub fn record_fill(
        &self,
        market: &MarketId,
        size: Decimal,
        price: Price,
        is_buy: bool,
        realized_pnl: Decimal,
    ) {
        self.record_fill_at(market, size, price, is_buy, realized_pnl, Utc::now());
    }

    fn record_fill_at(
        &self,
        market: &MarketId,
        size: Decimal,
        price: Price,
        is_buy: bool,
        realized_pnl: Decimal,
        now: DateTime<Utc>,
    ) {
        let mut ledger = self.ledger.lock();
        ledger.roll_window(now);
        ledger.open_orders = ledger.open_orders.saturating_sub(1);

        let position = ledger
            .positions
            .entry(market.clone())
            .or_insert(Decimal::ZERO);
        if is_buy {
            *position += size;
        } else {
            // Partial sells succeed; a full sell zeroes the position.
            *position = (*position - size).max(Decimal::ZERO);
        }
        ledger.last_fill_price.insert(market.clone(), price);
        ledger.daily_volume += size * price;

        if realized_pnl < Decimal::ZERO {
            ledger.daily_loss += -realized_pnl;
            ledger.last_loss_at = Some(now);
            warn!(
                market = %market,
                loss = %-realized_pnl,
                daily_loss = %ledger.daily_loss,
                "Loss recorded, cooldown started"
            );
        }
    }

    /// Current signed position in a market; zero when unknown.
    #[must_use]
    pub fn position(&self, market: &MarketId) -> Decimal {
        self.ledger
            .lock()
            .positions
            .get(market)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Total exposure: sum over markets of position times last fill price.
    #[must_use]
    pub fn total_exposure(&self) -> Decimal {
        self.ledger.lock().total_exposure()
    }

    /// Today's counters, rolling the window first.
    #[must_use]
    pub fn daily_stats(&self) -> DailyStats {
        self.daily_stats_at(Utc::now())
    }

    fn daily_stats_at(&self, now: DateTime<Utc>) -> DailyStats {
        let mut ledger = self.ledger.lock();
        ledger.roll_window(now);
        DailyStats {
            orders: ledger.daily_orders,
            volume: ledger.daily_volume,
            loss: ledger.daily_loss,
            window: ledger.window,
        }
    }

    /// Full engine snapshot for status displays.
    #[must_use]
    pub fn status(&self) -> PolicyStatus {
        self.status_at(Utc::now())
    }

    fn status_at(&self, now: DateTime<Utc>) -> PolicyStatus {
        let mut ledger = self.ledger.lock();
        ledger.roll_window(now);
        let cooldown_active = self.limits.cooldown_after_loss > chrono::Duration::zero()
            && ledger
                .last_loss_at
                .is_some_and(|t| now - t < self.limits.cooldown_after_loss);
        PolicyStatus {
            open_orders: ledger.open_orders,
            total_exposure: ledger.total_exposure(),
            positions: ledger
                .positions
                .values()
                .filter(|p| !p.is_zero())
                .count(),
            daily: DailyStats {
                orders: ledger.daily_orders,
                volume: ledger.daily_volume,
                loss: ledger.daily_loss,
                window: ledger.window,
            },
            session_start: ledger.session_start,
            cooldown_active,
            session_expired: now - ledger.session_start > self.limits.max_session_duration,
        }
    }

    /// Clear daily counters, open orders, and the cooldown; restart the
    /// session clock. Positions are preserved.
    pub fn reset_session(&self) {
        let mut ledger = self.ledger.lock();
        let now = Utc::now();
        ledger.open_orders = 0;
        ledger.daily_orders = 0;
        ledger.daily_volume = Decimal::ZERO;
        ledger.daily_loss = Decimal::ZERO;
        ledger.window = local_day(now);
        ledger.last_loss_at = None;
        ledger.session_start = now;
        info!("Session reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn market(id: &str) -> MarketId {
        MarketId::new(id)
    }

    fn engine(limits: RiskLimits) -> PolicyEngine {
        PolicyEngine::new(limits)
    }

    #[test]
    fn approves_order_within_all_limits() {
        let policy = engine(RiskLimits::default());
        assert!(policy
            .check_order(&market("m1"), dec!(50), dec!(1.0), true)
            .is_ok());
    }

    #[test]
    fn check_order_is_referentially_transparent() {
        let policy = engine(RiskLimits::default());
        let first = policy.check_order(&market("m1"), dec!(50), dec!(1.0), true);
        let second = policy.check_order(&market("m1"), dec!(50), dec!(1.0), true);
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_when_position_limit_reached() {
        let limits = RiskLimits {
            max_position_size: dec!(100),
            max_concentration: Decimal::ONE,
            ..RiskLimits::default()
        };
        let policy = engine(limits);

        policy.record_fill(&market("m1"), dec!(80), dec!(1.0), true, Decimal::ZERO);

        let verdict = policy.check_order(&market("m1"), dec!(30), dec!(1.0), true);
        assert!(matches!(verdict, Err(Violation::PositionLimit { .. })));

        // A smaller buy that stays under the limit is fine.
        assert!(policy
            .check_order(&market("m1"), dec!(20), dec!(1.0), true)
            .is_ok());
    }

    #[test]
    fn cooldown_rejects_after_realized_loss() {
        let limits = RiskLimits {
            cooldown_after_loss: Duration::hours(1),
            ..RiskLimits::default()
        };
        let policy = engine(limits);

        policy.record_fill(&market("m1"), dec!(10), dec!(1.0), false, dec!(-50));

        let verdict = policy.check_order(&market("m2"), dec!(10), dec!(1.0), true);
        assert!(matches!(verdict, Err(Violation::CooldownActive { .. })));
    }

    #[test]
    fn cooldown_expires_after_interval() {
        let limits = RiskLimits {
            cooldown_after_loss: Duration::hours(1),
            ..RiskLimits::default()
        };
        let policy = engine(limits);
        let now = Utc::now();

        policy.record_fill_at(&market("m1"), dec!(10), dec!(1.0), false, dec!(-1), now);

        let later = now + Duration::hours(2);
        assert!(policy
            .check_order_at(&market("m2"), dec!(10), dec!(1.0), true, later)
            .is_ok());
    }

    #[test]
    fn zero_cooldown_never_blocks() {
        let limits = RiskLimits {
            cooldown_after_loss: Duration::zero(),
            ..RiskLimits::default()
        };
        let policy = engine(limits);
        policy.record_fill(&market("m1"), dec!(10), dec!(1.0), false, dec!(-50));
        assert!(policy
            .check_order(&market("m2"), dec!(10), dec!(1.0), true)
            .is_ok());
    }

    #[test]
    fn session_expiry_rejects() {
        let limits = RiskLimits {
            max_session_duration: Duration::hours(8),
            ..RiskLimits::default()
        };
        let policy = engine(limits);
        let later = Utc::now() + Duration::hours(9);

        let verdict = policy.check_order_at(&market("m1"), dec!(10), dec!(1.0), true, later);
        assert!(matches!(verdict, Err(Violation::SessionExpired { .. })));
    }

    #[test]
    fn daily_loss_limit_rejects() {
        let limits = RiskLimits {
            max_daily_loss: dec!(100),
            cooldown_after_loss: Duration::zero(),
            ..RiskLimits::default()
        };
        let policy = engine(limits);
        policy.record_fill(&market("m1"), dec!(10), dec!(1.0), false, dec!(-100));

        let verdict = policy.check_order(&market("m2"), dec!(10), dec!(1.0), true);
        assert!(matches!(verdict, Err(Violation::DailyLossExceeded { .. })));
    }

    #[test]
    fn blocked_market_rejects() {
        let mut limits = RiskLimits::default();
        limits.blocked_markets.insert(market("bad"));
        let policy = engine(limits);

        let verdict = policy.check_order(&market("bad"), dec!(10), dec!(1.0), true);
        assert!(matches!(verdict, Err(Violation::MarketBlocked { .. })));
    }

    #[test]
    fn allow_list_rejects_outsiders() {
        let limits = RiskLimits {
            allowed_markets: Some([market("good")].into_iter().collect()),
            ..RiskLimits::default()
        };
        let policy = engine(limits);

        assert!(policy
            .check_order(&market("good"), dec!(10), dec!(1.0), true)
            .is_ok());
        let verdict = policy.check_order(&market("other"), dec!(10), dec!(1.0), true);
        assert!(matches!(verdict, Err(Violation::MarketNotAllowed { .. })));
    }

    #[test]
    fn open_order_limit_rejects() {
        let limits = RiskLimits {
            max_open_orders: 2,
            ..RiskLimits::default()
        };
        let policy = engine(limits);
        policy.record_order(&market("m1"));
        policy.record_order(&market("m1"));

        let verdict = policy.check_order(&market("m1"), dec!(10), dec!(1.0), true);
        assert!(matches!(verdict, Err(Violation::TooManyOpenOrders { .. })));

        // Cancellation frees a slot.
        policy.record_order_canceled();
        assert!(policy
            .check_order(&market("m1"), dec!(10), dec!(1.0), true)
            .is_ok());
    }

    #[test]
    fn daily_order_limit_rejects() {
        let limits = RiskLimits {
            max_daily_orders: 1,
            max_open_orders: 10,
            ..RiskLimits::default()
        };
        let policy = engine(limits);
        policy.record_order(&market("m1"));
        // Cancel so the open-order check passes; the daily counter stays.
        policy.record_order_canceled();

        let verdict = policy.check_order(&market("m1"), dec!(10), dec!(1.0), true);
        assert!(matches!(verdict, Err(Violation::DailyOrderLimit { .. })));
    }

    #[test]
    fn notional_bounds_reject() {
        let limits = RiskLimits {
            min_order_size: dec!(10),
            max_order_size: dec!(100),
            ..RiskLimits::default()
        };
        let policy = engine(limits);

        let too_small = policy.check_order(&market("m1"), dec!(5), dec!(1.0), true);
        assert!(matches!(too_small, Err(Violation::OrderTooSmall { .. })));

        let too_large = policy.check_order(&market("m1"), dec!(500), dec!(1.0), true);
        assert!(matches!(too_large, Err(Violation::OrderTooLarge { .. })));
    }

    #[test]
    fn daily_volume_limit_rejects() {
        let limits = RiskLimits {
            max_daily_volume: dec!(100),
            max_open_orders: 10,
            ..RiskLimits::default()
        };
        let policy = engine(limits);
        policy.record_fill(&market("m1"), dec!(90), dec!(1.0), true, Decimal::ZERO);

        let verdict = policy.check_order(&market("m2"), dec!(20), dec!(1.0), true);
        assert!(matches!(verdict, Err(Violation::DailyVolumeLimit { .. })));
    }

    #[test]
    fn exposure_limit_rejects() {
        let limits = RiskLimits {
            max_total_exposure: dec!(100),
            max_position_size: dec!(1000),
            max_daily_volume: dec!(10000),
            max_concentration: Decimal::ONE,
            ..RiskLimits::default()
        };
        let policy = engine(limits);
        policy.record_fill(&market("m1"), dec!(90), dec!(1.0), true, Decimal::ZERO);

        let verdict = policy.check_order(&market("m2"), dec!(20), dec!(1.0), true);
        assert!(matches!(verdict, Err(Violation::ExposureLimit { .. })));
    }

    #[test]
    fn concentration_limit_rejects() {
        let limits = RiskLimits {
            max_concentration: dec!(0.5),
            max_daily_volume: dec!(10000),
            ..RiskLimits::default()
        };
        let policy = engine(limits);
        policy.record_fill(&market("m1"), dec!(100), dec!(1.0), true, Decimal::ZERO);

        // All new notional in m1 would put it at 100% again; m2 at ~20%.
        let verdict = policy.check_order(&market("m1"), dec!(25), dec!(1.0), true);
        assert!(matches!(verdict, Err(Violation::ConcentrationLimit { .. })));
        assert!(policy
            .check_order(&market("m2"), dec!(25), dec!(1.0), true)
            .is_ok());
    }

    #[test]
    fn sells_clamp_position_at_zero() {
        let policy = engine(RiskLimits::default());
        let m = market("m1");

        policy.record_fill(&m, dec!(30), dec!(0.5), true, Decimal::ZERO);
        policy.record_fill(&m, dec!(50), dec!(0.5), false, Decimal::ZERO);

        assert_eq!(policy.position(&m), Decimal::ZERO);
    }

    #[test]
    fn position_is_net_of_buys_and_sells() {
        let policy = engine(RiskLimits::default());
        let m = market("m1");

        policy.record_fill(&m, dec!(30), dec!(0.5), true, Decimal::ZERO);
        policy.record_fill(&m, dec!(10), dec!(0.6), false, Decimal::ZERO);
        policy.record_fill(&m, dec!(5), dec!(0.55), true, Decimal::ZERO);

        assert_eq!(policy.position(&m), dec!(25));
    }

    #[test]
    fn exposure_uses_last_fill_price() {
        let policy = engine(RiskLimits::default());
        policy.record_fill(&market("m1"), dec!(100), dec!(0.4), true, Decimal::ZERO);
        policy.record_fill(&market("m1"), dec!(0), dec!(0.6), false, Decimal::ZERO);

        // 100 shares at the most recent fill price of 0.60.
        assert_eq!(policy.total_exposure(), dec!(60.0));
    }

    #[test]
    fn daily_window_roll_resets_counters() {
        let limits = RiskLimits {
            max_session_duration: Duration::days(7),
            ..RiskLimits::default()
        };
        let policy = engine(limits);
        let now = Utc::now();

        policy.record_order_at(&market("m1"), now);
        policy.record_fill_at(&market("m1"), dec!(10), dec!(1.0), true, dec!(-5), now);
        assert_eq!(policy.daily_stats_at(now).orders, 1);

        let tomorrow = now + Duration::days(1);
        let stats = policy.daily_stats_at(tomorrow);
        assert_eq!(stats.orders, 0);
        assert_eq!(stats.volume, Decimal::ZERO);
        assert_eq!(stats.loss, Decimal::ZERO);
    }

    #[test]
    fn record_order_canceled_floors_at_zero() {
        let policy = engine(RiskLimits::default());
        policy.record_order_canceled();
        policy.record_order_canceled();
        assert_eq!(policy.status().open_orders, 0);
    }

    #[test]
    fn slippage_within_tolerance_passes() {
        let limits = RiskLimits {
            max_slippage: dec!(0.05),
            ..RiskLimits::default()
        };
        let policy = engine(limits);

        assert!(policy.check_slippage(dec!(0.50), dec!(0.52)).is_ok());
        let verdict = policy.check_slippage(dec!(0.50), dec!(0.60));
        assert!(matches!(verdict, Err(Violation::SlippageExcessive { .. })));
    }

    #[test]
    fn slippage_with_zero_expected_passes() {
        let policy = engine(RiskLimits::default());
        assert!(policy.check_slippage(Decimal::ZERO, dec!(0.9)).is_ok());
    }

    #[test]
    fn reset_session_preserves_positions() {
        let limits = RiskLimits {
            cooldown_after_loss: Duration::hours(1),
            ..RiskLimits::default()
        };
        let policy = engine(limits);
        let m = market("m1");
        policy.record_order(&m);
        policy.record_fill(&m, dec!(40), dec!(0.5), true, dec!(-10));

        policy.reset_session();

        let status = policy.status();
        assert_eq!(status.open_orders, 0);
        assert_eq!(status.daily.orders, 0);
        assert_eq!(status.daily.loss, Decimal::ZERO);
        assert!(!status.cooldown_active);
        assert_eq!(policy.position(&m), dec!(40));
    }

    #[test]
    fn status_reports_cooldown_and_exposure() {
        let limits = RiskLimits {
            cooldown_after_loss: Duration::hours(1),
            ..RiskLimits::default()
        };
        let policy = engine(limits);
        policy.record_fill(&market("m1"), dec!(100), dec!(0.5), true, dec!(-5));

        let status = policy.status();
        assert!(status.cooldown_active);
        assert!(!status.session_expired);
        assert_eq!(status.total_exposure, dec!(50.0));
        assert_eq!(status.positions, 1);
    }
}

//! Policy violation taxonomy.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::id::MarketId;

/// A risk-policy verdict rejecting a proposed order.
///
/// Each variant is a distinct kind, not a string, so callers can match on
/// the reason and metrics can label by kind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Violation {
    #[error("session expired, started {started}")]
    SessionExpired { started: DateTime<Utc> },

    #[error("cooldown active until {until}")]
    CooldownActive { until: DateTime<Utc> },

    #[error("daily loss {loss} reached limit {limit}")]
    DailyLossExceeded { loss: Decimal, limit: Decimal },

    #[error("market {market} is blocked")]
    MarketBlocked { market: MarketId },

    #[error("market {market} is not on the allow-list")]
    MarketNotAllowed { market: MarketId },

    #[error("{open} open orders at limit {limit}")]
    TooManyOpenOrders { open: u32, limit: u32 },

    #[error("{orders} orders today at limit {limit}")]
    DailyOrderLimit { orders: u32, limit: u32 },

    #[error("order notional {notional} above maximum {limit}")]
    OrderTooLarge { notional: Decimal, limit: Decimal },

    #[error("order notional {notional} below minimum {limit}")]
    OrderTooSmall { notional: Decimal, limit: Decimal },

    #[error("daily volume {volume} would exceed limit {limit}")]
    DailyVolumeLimit { volume: Decimal, limit: Decimal },

    #[error("position in {market} would reach {position}, limit {limit}")]
    PositionLimit {
        market: MarketId,
        position: Decimal,
        limit: Decimal,
    },

    #[error("total exposure would reach {exposure}, limit {limit}")]
    ExposureLimit { exposure: Decimal, limit: Decimal },

    #[error("concentration in {market} would reach {concentration}, limit {limit}")]
    ConcentrationLimit {
        market: MarketId,
        concentration: Decimal,
        limit: Decimal,
    },

    #[error("slippage from {expected} to {actual} above limit {limit}")]
    SlippageExcessive {
        expected: Decimal,
        actual: Decimal,
        limit: Decimal,
    },
}

impl Violation {
    /// Stable kind label for metrics and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SessionExpired { .. } => "session_expired",
            Self::CooldownActive { .. } => "cooldown_active",
            Self::DailyLossExceeded { .. } => "daily_loss_exceeded",
            Self::MarketBlocked { .. } => "market_blocked",
            Self::MarketNotAllowed { .. } => "market_not_allowed",
            Self::TooManyOpenOrders { .. } => "too_many_open_orders",
            Self::DailyOrderLimit { .. } => "daily_order_limit",
            Self::OrderTooLarge { .. } => "order_too_large",
            Self::OrderTooSmall { .. } => "order_too_small",
            Self::DailyVolumeLimit { .. } => "daily_volume_limit",
            Self::PositionLimit { .. } => "position_limit",
            Self::ExposureLimit { .. } => "exposure_limit",
            Self::ConcentrationLimit { .. } => "concentration_limit",
            Self::SlippageExcessive { .. } => "slippage_excessive",
        }
    }
}

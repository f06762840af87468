//! Paper-trading simulator port.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::id::{MarketId, OrderId, TokenId};
use crate::domain::money::Price;
use crate::error::Result;

use super::execution::OrderSide;

/// Order types the paper engine accepts. The workflow only sends market
/// orders; limit support exists for operator experiments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperOrderType {
    Market,
    Limit,
}

/// A simulated order request.
#[derive(Debug, Clone)]
pub struct PaperOrderRequest {
    pub token_id: TokenId,
    pub market_id: MarketId,
    pub side: OrderSide,
    pub order_type: PaperOrderType,
    /// Fill price for market orders, limit price otherwise.
    pub price: Price,
    pub size: Decimal,
}

/// The fill produced by a simulated order.
#[derive(Debug, Clone)]
pub struct PaperFill {
    pub order_id: OrderId,
    pub price: Price,
    /// Filled quantity; may be below the requested size for sells that
    /// exceed the held position.
    pub size: Decimal,
    /// Realized profit and loss on this fill; zero for buys.
    pub realized_pnl: Decimal,
}

/// Aggregate paper-trading statistics.
#[derive(Debug, Clone)]
pub struct PaperStats {
    pub cash: Decimal,
    pub open_positions: usize,
    pub realized_pnl: Decimal,
    pub unrealized_pnl: Decimal,
    pub trades: u64,
}

/// In-process trade simulator.
#[async_trait]
pub trait PaperTrader: Send + Sync {
    /// Place a simulated order; market orders fill immediately.
    async fn place_order(&self, request: &PaperOrderRequest) -> Result<PaperFill>;

    /// Refresh mark prices for held positions.
    async fn update_prices(&self) -> Result<()>;

    /// Current simulator statistics.
    fn stats(&self) -> PaperStats;
}

//! Order book and live order execution ports.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::book::Book;
use crate::domain::id::{OrderId, TokenId};
use crate::domain::money::Price;
use crate::error::Result;

/// Side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Stable name used in logs and API payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

/// Arguments for creating and posting a live order.
#[derive(Debug, Clone)]
pub struct OrderArgs {
    pub token_id: TokenId,
    pub side: OrderSide,
    pub price: Price,
    pub size: Decimal,
}

/// An order accepted by the exchange.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order_id: OrderId,
}

/// Exchange integration for order books and live order placement.
///
/// Live posting is only attempted when `has_credentials` is true; the
/// shipped adapters never carry credentials, so the live path stays
/// dormant unless an operator wires in a signing client.
#[async_trait]
pub trait OrderClient: Send + Sync {
    /// Whether this client can sign and post live orders.
    fn has_credentials(&self) -> bool;

    /// Fetch the current order book for a token.
    async fn get_order_book(&self, token_id: &TokenId) -> Result<Book>;

    /// Create, sign, and post a live order.
    async fn create_and_post_order(
        &self,
        args: &OrderArgs,
        tick_size: Decimal,
        neg_risk: bool,
    ) -> Result<PlacedOrder>;
}

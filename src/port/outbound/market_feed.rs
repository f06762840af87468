//! Market discovery port.

use async_trait::async_trait;

use crate::domain::market::Market;
use crate::error::Result;

/// Source of tradeable markets, usually an exchange REST API.
#[async_trait]
pub trait MarketFeed: Send + Sync {
    /// List markets open for trading, paginated.
    async fn list_tradeable_markets(&self, limit: usize, offset: usize) -> Result<Vec<Market>>;
}

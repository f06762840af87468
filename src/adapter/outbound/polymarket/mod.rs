//! Polymarket REST adapter: market discovery via the Gamma API and order
//! books via the CLOB API.
//!
//! This adapter is read-only. It reports no credentials, so the
//! workflow's live execution path never engages; posting real orders
//! requires an operator-supplied signing client.

mod dto;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::book::Book;
use crate::domain::id::TokenId;
use crate::domain::market::Market;
use crate::error::{Error, Result};
use crate::port::outbound::execution::{OrderArgs, OrderClient, PlacedOrder};
use crate::port::outbound::market_feed::MarketFeed;

/// Default Gamma (discovery) API base URL.
pub const DEFAULT_GAMMA_URL: &str = "https://gamma-api.polymarket.com";

/// Default CLOB (order book) API base URL.
pub const DEFAULT_CLOB_URL: &str = "https://clob.polymarket.com";

/// Read-only Polymarket REST client.
pub struct PolymarketFeed {
    client: Client,
    gamma_url: String,
    clob_url: String,
}

impl PolymarketFeed {
    /// Create a feed against explicit base URLs.
    #[must_use]
    pub fn new(gamma_url: impl Into<String>, clob_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            gamma_url: gamma_url.into(),
            clob_url: clob_url.into(),
        }
    }
}

impl Default for PolymarketFeed {
    fn default() -> Self {
        Self::new(DEFAULT_GAMMA_URL, DEFAULT_CLOB_URL)
    }
}

#[async_trait]
impl MarketFeed for PolymarketFeed {
    async fn list_tradeable_markets(&self, limit: usize, offset: usize) -> Result<Vec<Market>> {
        let url = format!(
            "{}/markets?active=true&closed=false&limit={limit}&offset={offset}",
            self.gamma_url
        );
        debug!(url = %url, "Fetching markets");

        let payload: Vec<dto::GammaMarket> =
            self.client.get(&url).send().await?.json().await?;

        let markets: Vec<Market> = payload
            .into_iter()
            .filter_map(dto::GammaMarket::into_market)
            .collect();
        debug!(count = markets.len(), "Markets fetched");
        Ok(markets)
    }
}

#[async_trait]
impl OrderClient for PolymarketFeed {
    fn has_credentials(&self) -> bool {
        false
    }

    async fn get_order_book(&self, token_id: &TokenId) -> Result<Book> {
        let url = format!("{}/book?token_id={}", self.clob_url, token_id);
        let payload: dto::ClobBook = self.client.get(&url).send().await?.json().await?;
        Ok(payload.into_book(token_id.clone()))
    }

    async fn create_and_post_order(
        &self,
        _args: &OrderArgs,
        _tick_size: Decimal,
        _neg_risk: bool,
    ) -> Result<PlacedOrder> {
        Err(Error::Execution(
            "live order posting requires a signing client with credentials".into(),
        ))
    }
}

//! Polymarket payload mapping.
//!
//! Gamma encodes several list fields as JSON-in-a-string
//! (`"[\"...\", \"...\"]"`), so the mapping is tolerant: a market that
//! cannot be decoded is dropped rather than failing the whole page.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::book::{Book, PriceLevel};
use crate::domain::id::{MarketId, TokenId};
use crate::domain::market::Market;

/// One market as returned by the Gamma `/markets` endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaMarket {
    pub condition_id: Option<String>,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub description: String,
    /// Stringified JSON array of CLOB token ids, YES first.
    pub clob_token_ids: Option<String>,
    /// Stringified JSON array of outcome prices, YES first.
    pub outcome_prices: Option<String>,
    #[serde(default)]
    pub volume: Option<Decimal>,
    #[serde(default, rename = "volume24hr")]
    pub volume_24hr: Option<Decimal>,
    /// Bid/ask spread in price units.
    #[serde(default)]
    pub spread: Option<Decimal>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category: Option<String>,
}

impl GammaMarket {
    /// Map into a domain market; `None` when the payload is unusable.
    pub fn into_market(self) -> Option<Market> {
        let condition_id = self.condition_id?;
        let yes_token = self
            .clob_token_ids
            .as_deref()
            .and_then(first_of_string_list)
            .map(TokenId::new);
        let yes_price = self
            .outcome_prices
            .as_deref()
            .and_then(first_of_string_list)
            .and_then(|p| p.parse::<Decimal>().ok())
            .unwrap_or(Decimal::ZERO);
        let spread_bps = self
            .spread
            .map(|s| s * Decimal::from(10000))
            .unwrap_or(Decimal::ZERO);

        Some(Market {
            condition_id: MarketId::new(condition_id),
            question: self.question,
            description: self.description,
            yes_token,
            yes_price,
            volume: self.volume.unwrap_or(Decimal::ZERO),
            volume_24h: self.volume_24hr.unwrap_or(Decimal::ZERO),
            spread_bps,
            end_date: self.end_date.unwrap_or_else(Utc::now),
            categories: self.category.into_iter().collect(),
        })
    }
}

/// First element of a stringified JSON string array.
fn first_of_string_list(raw: &str) -> Option<String> {
    let items: Vec<String> = serde_json::from_str(raw).ok()?;
    items.into_iter().next()
}

/// CLOB `/book` response.
#[derive(Debug, Deserialize)]
pub struct ClobBook {
    #[serde(default)]
    pub bids: Vec<ClobLevel>,
    #[serde(default)]
    pub asks: Vec<ClobLevel>,
}

/// One price level; the CLOB returns numbers as strings.
#[derive(Debug, Deserialize)]
pub struct ClobLevel {
    pub price: Decimal,
    pub size: Decimal,
}

impl ClobBook {
    pub fn into_book(self, token_id: TokenId) -> Book {
        let bids = self
            .bids
            .into_iter()
            .map(|l| PriceLevel::new(l.price, l.size))
            .collect();
        let asks = self
            .asks
            .into_iter()
            .map(|l| PriceLevel::new(l.price, l.size))
            .collect();
        Book::with_levels(token_id, bids, asks)
    }
}

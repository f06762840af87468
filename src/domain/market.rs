//! Market-related domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::id::{MarketId, TokenId};
use super::money::{Price, Volume};

/// A tradeable binary market as returned by discovery.
///
/// Carries the fields the workflow consumes; exchange payloads hold far
/// more, and the feed adapter is responsible for the mapping.
#[derive(Debug, Clone)]
pub struct Market {
    /// Condition identifier on the exchange.
    pub condition_id: MarketId,
    /// The market question, e.g. "Will X happen by June?".
    pub question: String,
    /// Longer resolution criteria text.
    pub description: String,
    /// Token for the YES outcome, when the exchange exposes one.
    pub yes_token: Option<TokenId>,
    /// Current YES price, equal to the market-implied probability.
    pub yes_price: Price,
    /// Lifetime volume in dollars.
    pub volume: Volume,
    /// Trailing 24h volume in dollars.
    pub volume_24h: Volume,
    /// Bid/ask spread in basis points.
    pub spread_bps: Decimal,
    /// Scheduled resolution date.
    pub end_date: DateTime<Utc>,
    /// Exchange category tags.
    pub categories: Vec<String>,
}

impl Market {
    /// The YES token, if the market resolves to a tradeable pair.
    #[must_use]
    pub fn yes_token(&self) -> Option<&TokenId> {
        self.yes_token.as_ref()
    }
}

/// Inputs handed to the forecaster for a single market.
#[derive(Debug, Clone)]
pub struct MarketContext {
    pub token_id: TokenId,
    pub market_id: MarketId,
    pub question: String,
    pub description: String,
    /// Current YES price (market-implied probability).
    pub current_price: Price,
    /// Trailing 24h volume in dollars.
    pub volume_24h: Volume,
    pub resolution_date: DateTime<Utc>,
    pub categories: Vec<String>,
    /// Recent news snippets; only the first five are shown to experts.
    pub news: Vec<String>,
    /// One-line summaries of related markets, if any.
    pub related_markets: Vec<String>,
}

impl MarketContext {
    /// Build a forecast context from a discovered market.
    ///
    /// Returns `None` when the market has no resolvable YES token.
    #[must_use]
    pub fn from_market(market: &Market) -> Option<Self> {
        let token_id = market.yes_token.clone()?;
        Some(Self {
            token_id,
            market_id: market.condition_id.clone(),
            question: market.question.clone(),
            description: market.description.clone(),
            current_price: market.yes_price,
            volume_24h: market.volume_24h,
            resolution_date: market.end_date,
            categories: market.categories.clone(),
            news: Vec::new(),
            related_markets: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_market(yes_token: Option<TokenId>) -> Market {
        Market {
            condition_id: MarketId::new("cond-1"),
            question: "Will it rain?".into(),
            description: "Resolves YES if it rains.".into(),
            yes_token,
            yes_price: dec!(0.55),
            volume: dec!(120000),
            volume_24h: dec!(8000),
            spread_bps: dec!(40),
            end_date: Utc::now(),
            categories: vec!["weather".into()],
        }
    }

    #[test]
    fn context_from_market_copies_fields() {
        let market = sample_market(Some(TokenId::new("yes-1")));
        let ctx = MarketContext::from_market(&market).unwrap();

        assert_eq!(ctx.token_id.as_str(), "yes-1");
        assert_eq!(ctx.market_id.as_str(), "cond-1");
        assert_eq!(ctx.current_price, dec!(0.55));
        assert!(ctx.news.is_empty());
    }

    #[test]
    fn context_requires_yes_token() {
        let market = sample_market(None);
        assert!(MarketContext::from_market(&market).is_none());
    }
}

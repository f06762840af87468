//! Order book types for market depth representation.
//!
//! Bids are sorted by price descending (best bid first), asks ascending
//! (best ask first). The paper trader marks positions to the midpoint.

use super::id::TokenId;
use super::money::{Price, Volume};

/// A single price level in an order book.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: Price,
    size: Volume,
}

impl PriceLevel {
    /// Creates a new price level.
    #[must_use]
    pub const fn new(price: Price, size: Volume) -> Self {
        Self { price, size }
    }

    /// Returns the price at this level.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    /// Returns the total volume available at this level.
    #[must_use]
    pub const fn size(&self) -> Volume {
        self.size
    }
}

/// Order book for a single tradeable token.
#[derive(Debug, Clone)]
pub struct Book {
    token_id: TokenId,
    bids: Vec<PriceLevel>,
    asks: Vec<PriceLevel>,
}

impl Book {
    /// Creates a new empty order book.
    #[must_use]
    pub const fn new(token_id: TokenId) -> Self {
        Self {
            token_id,
            bids: Vec::new(),
            asks: Vec::new(),
        }
    }

    /// Creates an order book with the given levels.
    ///
    /// Levels are re-sorted so the best price is always first.
    #[must_use]
    pub fn with_levels(token_id: TokenId, mut bids: Vec<PriceLevel>, mut asks: Vec<PriceLevel>) -> Self {
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));
        Self {
            token_id,
            bids,
            asks,
        }
    }

    /// Token this book belongs to.
    #[must_use]
    pub const fn token_id(&self) -> &TokenId {
        &self.token_id
    }

    /// Best (highest) bid, if any.
    #[must_use]
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    /// Best (lowest) ask, if any.
    #[must_use]
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    /// Midpoint between best bid and best ask.
    ///
    /// Falls back to whichever side exists when the book is one-sided.
    #[must_use]
    pub fn midpoint(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid.price() + ask.price()) / Price::TWO),
            (Some(bid), None) => Some(bid.price()),
            (None, Some(ask)) => Some(ask.price()),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn with_levels_sorts_both_sides() {
        let bids = vec![
            PriceLevel::new(dec!(0.44), dec!(200)),
            PriceLevel::new(dec!(0.45), dec!(100)),
        ];
        let asks = vec![
            PriceLevel::new(dec!(0.47), dec!(300)),
            PriceLevel::new(dec!(0.46), dec!(150)),
        ];

        let book = Book::with_levels(TokenId::new("yes"), bids, asks);

        assert_eq!(book.best_bid().unwrap().price(), dec!(0.45));
        assert_eq!(book.best_ask().unwrap().price(), dec!(0.46));
    }

    #[test]
    fn midpoint_between_best_levels() {
        let book = Book::with_levels(
            TokenId::new("yes"),
            vec![PriceLevel::new(dec!(0.40), dec!(10))],
            vec![PriceLevel::new(dec!(0.50), dec!(10))],
        );
        assert_eq!(book.midpoint(), Some(dec!(0.45)));
    }

    #[test]
    fn midpoint_of_empty_book_is_none() {
        let book = Book::new(TokenId::new("yes"));
        assert_eq!(book.midpoint(), None);
    }
}

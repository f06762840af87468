//! Shared fixtures and mock adapters for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use pythia::domain::book::{Book, PriceLevel};
use pythia::domain::id::{MarketId, TokenId};
use pythia::domain::market::Market;
use pythia::error::{Error, Result};
use pythia::port::outbound::execution::{OrderArgs, OrderClient, PlacedOrder};
use pythia::port::outbound::expert::Expert;
use pythia::port::outbound::market_feed::MarketFeed;
use pythia::port::outbound::metrics::MetricsSink;

/// Expert that always returns the same response text, or always fails.
pub struct MockExpert {
    name: String,
    response: std::result::Result<String, String>,
}

impl MockExpert {
    pub fn ok(name: &str, response: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            response: Ok(response.into()),
        })
    }

    pub fn failing(name: &str, message: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            response: Err(message.into()),
        })
    }

    /// Expert returning a well-formed forecast JSON.
    pub fn forecasting(name: &str, probability: &str, confidence: &str) -> Arc<Self> {
        Self::ok(
            name,
            &format!(
                r#"{{"probability": {probability}, "confidence": {confidence}, "reasoning": "scripted"}}"#
            ),
        )
    }
}

#[async_trait]
impl Expert for MockExpert {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, _user_prompt: &str, _system_prompt: &str) -> Result<String> {
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(Error::Execution(message.clone())),
        }
    }
}

/// Build a qualifying market with the given YES price.
pub fn market(id: &str, token: &str, yes_price: Decimal) -> Market {
    Market {
        condition_id: MarketId::new(id),
        question: format!("Will {id} resolve YES?"),
        description: "Integration fixture.".into(),
        yes_token: Some(TokenId::new(token)),
        yes_price,
        volume: dec!(100000),
        volume_24h: dec!(20000),
        spread_bps: dec!(100),
        end_date: Utc::now() + ChronoDuration::days(30),
        categories: vec!["test".into()],
    }
}

/// Market feed serving a fixed list, or a scripted error.
pub struct StaticFeed {
    markets: std::result::Result<Vec<Market>, String>,
}

impl StaticFeed {
    pub fn with_markets(markets: Vec<Market>) -> Arc<Self> {
        Arc::new(Self {
            markets: Ok(markets),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            markets: Err(message.into()),
        })
    }
}

#[async_trait]
impl MarketFeed for StaticFeed {
    async fn list_tradeable_markets(&self, limit: usize, _offset: usize) -> Result<Vec<Market>> {
        match &self.markets {
            Ok(markets) => Ok(markets.iter().take(limit).cloned().collect()),
            Err(message) => Err(Error::Execution(message.clone())),
        }
    }
}

/// Order client serving canned books around 0.50; never has credentials.
pub struct StaticBooks;

#[async_trait]
impl OrderClient for StaticBooks {
    fn has_credentials(&self) -> bool {
        false
    }

    async fn get_order_book(&self, token_id: &TokenId) -> Result<Book> {
        Ok(Book::with_levels(
            token_id.clone(),
            vec![PriceLevel::new(dec!(0.49), dec!(500))],
            vec![PriceLevel::new(dec!(0.51), dec!(500))],
        ))
    }

    async fn create_and_post_order(
        &self,
        _args: &OrderArgs,
        _tick_size: Decimal,
        _neg_risk: bool,
    ) -> Result<PlacedOrder> {
        Err(Error::Execution("read-only order client".into()))
    }
}

/// Metrics sink counting observations.
#[derive(Default)]
pub struct CountingMetrics {
    pub stages: AtomicUsize,
    pub signals: AtomicUsize,
    pub orders: AtomicUsize,
    pub violations: AtomicUsize,
    pub forecasts: AtomicUsize,
}

impl CountingMetrics {
    pub fn stage_count(&self) -> usize {
        self.stages.load(Ordering::SeqCst)
    }

    pub fn signal_count(&self) -> usize {
        self.signals.load(Ordering::SeqCst)
    }

    pub fn order_count(&self) -> usize {
        self.orders.load(Ordering::SeqCst)
    }

    pub fn violation_count(&self) -> usize {
        self.violations.load(Ordering::SeqCst)
    }

    pub fn forecast_count(&self) -> usize {
        self.forecasts.load(Ordering::SeqCst)
    }
}

impl MetricsSink for CountingMetrics {
    fn stage_completed(&self, _stage: &'static str, _duration: std::time::Duration, _success: bool) {
        self.stages.fetch_add(1, Ordering::SeqCst);
    }

    fn forecast_recorded(
        &self,
        _expert: &str,
        _latency: std::time::Duration,
        _confidence: Decimal,
    ) {
        self.forecasts.fetch_add(1, Ordering::SeqCst);
    }

    fn signal_generated(&self, _edge_bps: Decimal, _strength: Decimal) {
        self.signals.fetch_add(1, Ordering::SeqCst);
    }

    fn order_placed(&self, _market: &MarketId, _notional: Decimal) {
        self.orders.fetch_add(1, Ordering::SeqCst);
    }

    fn violation(&self, _kind: &'static str) {
        self.violations.fetch_add(1, Ordering::SeqCst);
    }
}

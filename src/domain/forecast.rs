//! Forecast value types.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::id::{MarketId, TokenId};

/// A single expert's probability estimate for one token.
///
/// `probability` is always in [0, 1] after parsing; `confidence` is in
/// (0, 1] and defaults to 0.7 when the expert omits it or returns an
/// invalid value.
#[derive(Debug, Clone)]
pub struct Forecast {
    pub token_id: TokenId,
    pub market_id: MarketId,
    pub question: String,
    pub probability: Decimal,
    pub confidence: Decimal,
    pub reasoning: String,
    /// Name of the expert that produced this estimate.
    pub expert: String,
    pub timestamp: DateTime<Utc>,
    /// Observed transport latency for the expert call.
    pub latency: Duration,
}

/// Aggregated estimate across every expert that answered.
///
/// Produced atomically from a non-empty batch; the individual forecasts
/// are preserved for inspection and metrics.
#[derive(Debug, Clone)]
pub struct EnsembleForecast {
    pub token_id: TokenId,
    pub market_id: MarketId,
    pub question: String,
    /// Confidence-weighted mean probability.
    pub probability: Decimal,
    /// Plain mean of the individual confidences.
    pub confidence: Decimal,
    /// Population standard deviation of the individual probabilities.
    pub disagreement: Decimal,
    pub forecasts: Vec<Forecast>,
    pub timestamp: DateTime<Utc>,
}

impl EnsembleForecast {
    /// Number of experts that contributed.
    #[must_use]
    pub fn expert_count(&self) -> usize {
        self.forecasts.len()
    }
}

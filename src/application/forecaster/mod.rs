//! Ensemble forecasting service.
//!
//! Queries a registry of black-box experts in parallel, parses their
//! free-form responses, and combines the survivors into one calibrated
//! estimate with a disagreement measure. Signal derivation and ranking
//! live in [`signal`] as pure functions.

mod ensemble;
mod parse;
mod prompt;
mod signal;

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use futures_util::future::join_all;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::domain::forecast::{EnsembleForecast, Forecast};
use crate::domain::id::TokenId;
use crate::domain::market::MarketContext;
use crate::error::{Error, ForecastError, Result};
use crate::port::outbound::expert::Expert;

pub use parse::DEFAULT_CONFIDENCE;
pub use signal::{generate_signal, rank_signals};

/// How long a cached forecast stays fresh, in seconds.
const DEFAULT_CACHE_TTL_SECS: i64 = 300;

struct RegisteredExpert {
    client: Arc<dyn Expert>,
    /// Nominal weight; zero means "use the uniform default".
    weight: Decimal,
}

struct CachedForecast {
    forecast: Forecast,
    inserted_at: DateTime<Utc>,
}

/// The ensemble forecaster.
///
/// Registration order doubles as the fallback priority order: the first
/// registered expert is tried first by [`Forecaster::forecast_with_fallback`].
pub struct Forecaster {
    experts: Vec<RegisteredExpert>,
    cache: DashMap<TokenId, CachedForecast>,
    cache_ttl: Duration,
}

impl Default for Forecaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Forecaster {
    /// Create a forecaster with the default five-minute cache TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_cache_ttl(Duration::seconds(DEFAULT_CACHE_TTL_SECS))
    }

    /// Create a forecaster with an explicit cache TTL.
    #[must_use]
    pub fn with_cache_ttl(cache_ttl: Duration) -> Self {
        Self {
            experts: Vec::new(),
            cache: DashMap::new(),
            cache_ttl,
        }
    }

    /// Register an expert with a nominal weight.
    ///
    /// A zero weight means "no opinion": the expert receives the uniform
    /// `1/N` default at combination time.
    pub fn register(&mut self, client: Arc<dyn Expert>, weight: Decimal) {
        debug!(expert = client.name(), weight = %weight, "Expert registered");
        self.experts.push(RegisteredExpert { client, weight });
    }

    /// Number of registered experts.
    #[must_use]
    pub fn expert_count(&self) -> usize {
        self.experts.len()
    }

    /// Query one named expert. No cache side effects.
    pub async fn forecast_single(&self, ctx: &MarketContext, expert: &str) -> Result<Forecast> {
        let entry = self
            .experts
            .iter()
            .find(|e| e.client.name() == expert)
            .ok_or_else(|| ForecastError::ExpertNotConfigured {
                name: expert.to_string(),
            })?;
        self.elicit(entry.client.as_ref(), ctx).await
    }

    /// Query every registered expert in parallel and combine the
    /// successes.
    ///
    /// Succeeds if at least one expert succeeds. When all fail, the first
    /// failure in registration order is returned (the choice is
    /// implementation-defined). Each success is written to the per-token
    /// cache.
    pub async fn forecast_ensemble(&self, ctx: &MarketContext) -> Result<EnsembleForecast> {
        if self.experts.is_empty() {
            return Err(ForecastError::NoExpertsConfigured.into());
        }

        let calls = self
            .experts
            .iter()
            .map(|entry| self.elicit(entry.client.as_ref(), ctx));
        let outcomes = join_all(calls).await;

        let mut forecasts = Vec::new();
        let mut weights = Vec::new();
        let mut first_error: Option<Error> = None;

        for (entry, outcome) in self.experts.iter().zip(outcomes) {
            match outcome {
                Ok(forecast) => {
                    self.cache.insert(
                        ctx.token_id.clone(),
                        CachedForecast {
                            forecast: forecast.clone(),
                            inserted_at: Utc::now(),
                        },
                    );
                    weights.push(entry.weight);
                    forecasts.push(forecast);
                }
                Err(e) => {
                    warn!(expert = entry.client.name(), error = %e, "Expert failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        if forecasts.is_empty() {
            // Experts is non-empty, so every outcome was an error.
            return Err(
                first_error.unwrap_or_else(|| ForecastError::NoExpertsConfigured.into())
            );
        }

        let combined = ensemble::combine(&forecasts, &weights);
        debug!(
            token = %ctx.token_id,
            experts = forecasts.len(),
            probability = %combined.probability,
            disagreement = %combined.disagreement,
            "Ensemble combined"
        );

        Ok(EnsembleForecast {
            token_id: ctx.token_id.clone(),
            market_id: ctx.market_id.clone(),
            question: ctx.question.clone(),
            probability: combined.probability,
            confidence: combined.confidence,
            disagreement: combined.disagreement,
            forecasts,
            timestamp: Utc::now(),
        })
    }

    /// Try experts in registration (priority) order and return the first
    /// success.
    pub async fn forecast_with_fallback(&self, ctx: &MarketContext) -> Result<Forecast> {
        if self.experts.is_empty() {
            return Err(ForecastError::NoExpertsConfigured.into());
        }

        let mut last_error: Option<Error> = None;
        for entry in &self.experts {
            match self.elicit(entry.client.as_ref(), ctx).await {
                Ok(forecast) => return Ok(forecast),
                Err(e) => {
                    warn!(expert = entry.client.name(), error = %e, "Falling back");
                    last_error = Some(e);
                }
            }
        }

        Err(ForecastError::AllExpertsFailed {
            last: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".into()),
        }
        .into())
    }

    /// The cached forecast for a token, if it is younger than the TTL.
    /// Stale entries are evicted on read.
    #[must_use]
    pub fn cached_forecast(&self, token_id: &TokenId) -> Option<Forecast> {
        let stale = match self.cache.get(token_id) {
            Some(entry) => {
                if Utc::now() - entry.inserted_at < self.cache_ttl {
                    return Some(entry.forecast.clone());
                }
                true
            }
            None => false,
        };
        if stale {
            self.cache.remove(token_id);
        }
        None
    }

    /// One expert call: prompt, transport, parse, assemble.
    async fn elicit(&self, expert: &dyn Expert, ctx: &MarketContext) -> Result<Forecast> {
        let user_prompt = prompt::user_prompt(ctx);
        let started = Instant::now();
        let raw = expert
            .complete(&user_prompt, prompt::SYSTEM_PROMPT)
            .await
            .map_err(|e| ForecastError::Upstream {
                expert: expert.name().to_string(),
                source: Box::new(e),
            })?;
        let latency = started.elapsed();

        let parsed = parse::parse_response(&raw)?;

        Ok(Forecast {
            token_id: ctx.token_id.clone(),
            market_id: ctx.market_id.clone(),
            question: ctx.question.clone(),
            probability: parsed.probability,
            confidence: parsed.confidence,
            reasoning: parsed.reasoning,
            expert: expert.name().to_string(),
            timestamp: Utc::now(),
            latency,
        })
    }
}

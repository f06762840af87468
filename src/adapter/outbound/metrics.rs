//! Tracing-backed metrics sink.
//!
//! Emits every observation as a structured log event so the ambient
//! subscriber (pretty or JSON) becomes the metrics transport. Swap in a
//! real exporter by implementing [`MetricsSink`] elsewhere.

use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::domain::id::MarketId;
use crate::port::outbound::metrics::MetricsSink;

/// Metrics sink that logs through `tracing`.
pub struct LogMetrics;

impl MetricsSink for LogMetrics {
    fn stage_completed(&self, stage: &'static str, duration: Duration, success: bool) {
        debug!(
            target: "pythia::metrics",
            stage,
            duration_ms = duration.as_millis() as u64,
            success,
            "stage_completed"
        );
    }

    fn active_markets(&self, count: usize) {
        debug!(target: "pythia::metrics", count, "active_markets");
    }

    fn forecast_recorded(&self, expert: &str, latency: Duration, confidence: Decimal) {
        debug!(
            target: "pythia::metrics",
            expert,
            latency_ms = latency.as_millis() as u64,
            confidence = %confidence,
            "forecast_recorded"
        );
    }

    fn ensemble_recorded(&self, disagreement: Decimal) {
        debug!(target: "pythia::metrics", disagreement = %disagreement, "ensemble_recorded");
    }

    fn signal_generated(&self, edge_bps: Decimal, strength: Decimal) {
        info!(
            target: "pythia::metrics",
            edge_bps = %edge_bps,
            strength = %strength,
            "signal_generated"
        );
    }

    fn order_placed(&self, market: &MarketId, notional: Decimal) {
        info!(
            target: "pythia::metrics",
            market = %market,
            notional = %notional,
            "order_placed"
        );
    }

    fn violation(&self, kind: &'static str) {
        info!(target: "pythia::metrics", kind, "policy_violation");
    }
}

//! Observability side-channel port.
//!
//! The workflow reports counters and timings here; any metrics protocol
//! (Prometheus, StatsD, plain logs) can sit behind the trait. Default
//! method bodies are no-ops so sinks implement only what they care about.

use std::time::Duration;

use rust_decimal::Decimal;

use crate::domain::id::MarketId;

/// Receiver for workflow telemetry.
pub trait MetricsSink: Send + Sync {
    /// A pipeline stage finished.
    fn stage_completed(&self, _stage: &'static str, _duration: Duration, _success: bool) {}

    /// Discovery replaced the active market set.
    fn active_markets(&self, _count: usize) {}

    /// One expert produced a forecast.
    fn forecast_recorded(&self, _expert: &str, _latency: Duration, _confidence: Decimal) {}

    /// An ensemble was combined.
    fn ensemble_recorded(&self, _disagreement: Decimal) {}

    /// A buy signal survived filtering.
    fn signal_generated(&self, _edge_bps: Decimal, _strength: Decimal) {}

    /// An order was dispatched to a backend.
    fn order_placed(&self, _market: &MarketId, _notional: Decimal) {}

    /// The policy engine rejected an order.
    fn violation(&self, _kind: &'static str) {}
}

/// Sink that drops everything; the default when none is configured.
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {}

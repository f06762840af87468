//! Workflow stages and stage results.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::signal::TradingSignal;
use crate::error::Error;

/// The seven pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    MarketDiscovery,
    DataCollection,
    Forecasting,
    SignalGeneration,
    RiskCheck,
    OrderExecution,
    Monitoring,
}

impl Stage {
    /// The six trading stages run by `run_once`, in order.
    pub const TRADING_SEQUENCE: [Stage; 6] = [
        Stage::MarketDiscovery,
        Stage::DataCollection,
        Stage::Forecasting,
        Stage::SignalGeneration,
        Stage::RiskCheck,
        Stage::OrderExecution,
    ];

    /// The five stages run on every forecast-loop tick, in order.
    pub const FORECAST_SEQUENCE: [Stage; 5] = [
        Stage::DataCollection,
        Stage::Forecasting,
        Stage::SignalGeneration,
        Stage::RiskCheck,
        Stage::OrderExecution,
    ];

    /// Stable stage name used in results, logs, and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MarketDiscovery => "market_discovery",
            Self::DataCollection => "data_collection",
            Self::Forecasting => "forecasting",
            Self::SignalGeneration => "signal_generation",
            Self::RiskCheck => "risk_check",
            Self::OrderExecution => "order_execution",
            Self::Monitoring => "monitoring",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one stage execution, delivered to `on_stage_complete`.
#[derive(Debug, Clone)]
pub struct StageResult {
    pub stage: Stage,
    pub success: bool,
    /// Error message when the stage failed.
    pub error: Option<String>,
    /// Loose stage summary, e.g. counts of items processed.
    pub data: Value,
    pub duration: Duration,
    pub timestamp: DateTime<Utc>,
}

/// Invoked after every stage, success or failure.
pub type StageCallback = Arc<dyn Fn(&StageResult) + Send + Sync>;

/// Invoked for each buy signal that survives filtering.
pub type SignalCallback = Arc<dyn Fn(&TradingSignal) + Send + Sync>;

/// Invoked when a background loop's stage fails.
pub type ErrorCallback = Arc<dyn Fn(&Error) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequences_agree_on_order() {
        assert_eq!(Stage::TRADING_SEQUENCE[0], Stage::MarketDiscovery);
        assert_eq!(&Stage::TRADING_SEQUENCE[1..], &Stage::FORECAST_SEQUENCE[..]);
    }

    #[test]
    fn stage_names_are_stable() {
        assert_eq!(Stage::MarketDiscovery.as_str(), "market_discovery");
        assert_eq!(Stage::Monitoring.to_string(), "monitoring");
    }
}

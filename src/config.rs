//! Application configuration loading and validation.
//!
//! Configuration is TOML with per-field defaults, so an empty file (or no
//! file at all) yields a runnable paper-trading setup. API keys are never
//! read from the file; the LLM adapters take them from the environment.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::adapter::outbound::polymarket::{DEFAULT_CLOB_URL, DEFAULT_GAMMA_URL};
use crate::application::workflow::WorkflowConfig;
use crate::domain::id::MarketId;
use crate::domain::limits::RiskLimits;
use crate::error::{Error, Result};

/// Main application configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub workflow: WorkflowSettings,
    #[serde(default)]
    pub risk: RiskSettings,
    #[serde(default)]
    pub forecaster: ForecasterSettings,
    #[serde(default)]
    pub polymarket: PolymarketSettings,
}

impl Config {
    /// Load and validate a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file: {e}")))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.workflow.max_markets == 0 {
            return Err(Error::Config("workflow.max_markets must be at least 1".into()));
        }
        if self.workflow.discovery_interval_secs == 0
            || self.workflow.forecast_interval_secs == 0
            || self.workflow.monitor_interval_secs == 0
        {
            return Err(Error::Config("workflow intervals must be positive".into()));
        }
        if self.workflow.min_confidence < Decimal::ZERO
            || self.workflow.min_confidence > Decimal::ONE
        {
            return Err(Error::Config(
                "workflow.min_confidence must be in [0, 1]".into(),
            ));
        }
        if self.risk.max_concentration <= Decimal::ZERO
            || self.risk.max_concentration > Decimal::ONE
        {
            return Err(Error::Config("risk.max_concentration must be in (0, 1]".into()));
        }
        if self.risk.min_order_size > self.risk.max_order_size {
            return Err(Error::Config(
                "risk.min_order_size exceeds risk.max_order_size".into(),
            ));
        }
        for expert in &self.forecaster.experts {
            if expert.weight < Decimal::ZERO {
                return Err(Error::Config("expert weights must be non-negative".into()));
            }
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

/// Workflow cadence and filtering settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WorkflowSettings {
    pub discovery_interval_secs: u64,
    pub forecast_interval_secs: u64,
    pub monitor_interval_secs: u64,
    pub max_markets: usize,
    pub min_volume: Decimal,
    pub max_spread_bps: Decimal,
    pub min_edge_bps: Decimal,
    pub min_confidence: Decimal,
    pub order_size: Decimal,
    pub use_paper_trade: bool,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        let defaults = WorkflowConfig::default();
        Self {
            discovery_interval_secs: defaults.discovery_interval.as_secs(),
            forecast_interval_secs: defaults.forecast_interval.as_secs(),
            monitor_interval_secs: defaults.monitor_interval.as_secs(),
            max_markets: defaults.max_markets,
            min_volume: defaults.min_volume,
            max_spread_bps: defaults.max_spread_bps,
            min_edge_bps: defaults.min_edge_bps,
            min_confidence: defaults.min_confidence,
            order_size: defaults.order_size,
            use_paper_trade: defaults.use_paper_trade,
        }
    }
}

impl WorkflowSettings {
    /// Convert into the workflow's runtime configuration.
    #[must_use]
    pub fn to_workflow_config(&self) -> WorkflowConfig {
        WorkflowConfig {
            discovery_interval: Duration::from_secs(self.discovery_interval_secs),
            forecast_interval: Duration::from_secs(self.forecast_interval_secs),
            monitor_interval: Duration::from_secs(self.monitor_interval_secs),
            max_markets: self.max_markets,
            min_volume: self.min_volume,
            max_spread_bps: self.max_spread_bps,
            min_edge_bps: self.min_edge_bps,
            min_confidence: self.min_confidence,
            order_size: self.order_size,
            use_paper_trade: self.use_paper_trade,
        }
    }
}

/// Risk limit settings, mirroring [`RiskLimits`] with TOML-friendly types.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RiskSettings {
    pub max_position_size: Decimal,
    pub max_total_exposure: Decimal,
    pub max_concentration: Decimal,
    pub max_order_size: Decimal,
    pub min_order_size: Decimal,
    pub max_open_orders: u32,
    pub max_daily_orders: u32,
    pub max_daily_volume: Decimal,
    pub max_daily_loss: Decimal,
    pub max_slippage: Decimal,
    pub cooldown_after_loss_secs: u64,
    pub max_session_duration_secs: u64,
    pub allowed_markets: Option<Vec<String>>,
    pub blocked_markets: Vec<String>,
}

impl Default for RiskSettings {
    fn default() -> Self {
        let defaults = RiskLimits::default();
        Self {
            max_position_size: defaults.max_position_size,
            max_total_exposure: defaults.max_total_exposure,
            max_concentration: defaults.max_concentration,
            max_order_size: defaults.max_order_size,
            min_order_size: defaults.min_order_size,
            max_open_orders: defaults.max_open_orders,
            max_daily_orders: defaults.max_daily_orders,
            max_daily_volume: defaults.max_daily_volume,
            max_daily_loss: defaults.max_daily_loss,
            max_slippage: defaults.max_slippage,
            cooldown_after_loss_secs: defaults.cooldown_after_loss.num_seconds() as u64,
            max_session_duration_secs: defaults.max_session_duration.num_seconds() as u64,
            allowed_markets: None,
            blocked_markets: Vec::new(),
        }
    }
}

impl RiskSettings {
    /// Convert into the policy engine's limits.
    #[must_use]
    pub fn to_limits(&self) -> RiskLimits {
        RiskLimits {
            max_position_size: self.max_position_size,
            max_total_exposure: self.max_total_exposure,
            max_concentration: self.max_concentration,
            max_order_size: self.max_order_size,
            min_order_size: self.min_order_size,
            max_open_orders: self.max_open_orders,
            max_daily_orders: self.max_daily_orders,
            max_daily_volume: self.max_daily_volume,
            max_daily_loss: self.max_daily_loss,
            max_slippage: self.max_slippage,
            cooldown_after_loss: chrono::Duration::seconds(self.cooldown_after_loss_secs as i64),
            max_session_duration: chrono::Duration::seconds(self.max_session_duration_secs as i64),
            allowed_markets: self.allowed_markets.as_ref().map(|list| {
                list.iter()
                    .map(|m| MarketId::new(m.as_str()))
                    .collect::<HashSet<_>>()
            }),
            blocked_markets: self
                .blocked_markets
                .iter()
                .map(|m| MarketId::new(m.as_str()))
                .collect(),
        }
    }
}

/// Forecaster settings: cache TTL and the expert roster.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ForecasterSettings {
    pub cache_ttl_secs: u64,
    /// Experts in fallback priority order.
    pub experts: Vec<ExpertSettings>,
}

impl Default for ForecasterSettings {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 300,
            experts: vec![
                ExpertSettings {
                    provider: ExpertProvider::OpenAi,
                    ..ExpertSettings::default()
                },
                ExpertSettings {
                    provider: ExpertProvider::Anthropic,
                    ..ExpertSettings::default()
                },
            ],
        }
    }
}

/// One expert roster entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExpertSettings {
    pub provider: ExpertProvider,
    /// Model identifier; empty means the provider's default model.
    pub model: String,
    /// Nominal ensemble weight; zero means the uniform default.
    pub weight: Decimal,
    pub temperature: f64,
    pub max_tokens: usize,
}

impl Default for ExpertSettings {
    fn default() -> Self {
        Self {
            provider: ExpertProvider::OpenAi,
            model: String::new(),
            weight: Decimal::ZERO,
            temperature: 0.2,
            max_tokens: 1024,
        }
    }
}

impl ExpertSettings {
    /// The configured model, or the provider's default when unset.
    #[must_use]
    pub fn resolved_model(&self) -> String {
        if !self.model.is_empty() {
            return self.model.clone();
        }
        match self.provider {
            ExpertProvider::OpenAi => default_openai_model(),
            ExpertProvider::Anthropic => default_anthropic_model(),
        }
    }
}

/// Supported expert providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpertProvider {
    #[default]
    OpenAi,
    Anthropic,
}

fn default_openai_model() -> String {
    "gpt-4o".into()
}

fn default_anthropic_model() -> String {
    "claude-sonnet-4-5".into()
}

/// Polymarket endpoint settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PolymarketSettings {
    pub gamma_url: String,
    pub clob_url: String,
}

impl Default for PolymarketSettings {
    fn default() -> Self {
        Self {
            gamma_url: DEFAULT_GAMMA_URL.into(),
            clob_url: DEFAULT_CLOB_URL.into(),
        }
    }
}

/// Paper-trading bankroll used when no explicit amount is configured.
pub fn default_paper_cash() -> Decimal {
    dec!(10000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.workflow.max_markets, 10);
        assert_eq!(config.forecaster.experts.len(), 2);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn full_config_parses() {
        let toml = r#"
            [logging]
            level = "debug"
            format = "json"

            [workflow]
            discovery_interval_secs = 60
            forecast_interval_secs = 30
            monitor_interval_secs = 15
            max_markets = 5
            min_volume = 50000
            max_spread_bps = 300
            min_edge_bps = 150
            min_confidence = 0.7
            order_size = 25
            use_paper_trade = true

            [risk]
            max_position_size = 200
            max_daily_orders = 20
            cooldown_after_loss_secs = 1800
            blocked_markets = ["0xdead"]

            [forecaster]
            cache_ttl_secs = 120

            [[forecaster.experts]]
            provider = "anthropic"
            model = "claude-sonnet-4-5"
            weight = 0.6

            [[forecaster.experts]]
            provider = "openai"
            model = "gpt-4o"
            weight = 0.4
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        config.validate().unwrap();

        assert_eq!(config.workflow.max_markets, 5);
        assert_eq!(config.forecaster.experts[0].provider, ExpertProvider::Anthropic);
        assert_eq!(config.forecaster.experts[0].weight, dec!(0.6));

        let limits = config.risk.to_limits();
        assert_eq!(limits.max_position_size, dec!(200));
        assert_eq!(limits.cooldown_after_loss, chrono::Duration::minutes(30));
        assert!(limits.blocked_markets.contains(&MarketId::new("0xdead")));
    }

    #[test]
    fn workflow_settings_convert_to_runtime_config() {
        let settings = WorkflowSettings {
            discovery_interval_secs: 90,
            ..WorkflowSettings::default()
        };
        let config = settings.to_workflow_config();
        assert_eq!(config.discovery_interval, Duration::from_secs(90));
    }

    #[test]
    fn zero_max_markets_fails_validation() {
        let config: Config = toml::from_str("[workflow]\nmax_markets = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_order_bounds_fail_validation() {
        let toml = "[risk]\nmin_order_size = 100\nmax_order_size = 10";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_expert_weight_fails_validation() {
        let toml = "[[forecaster.experts]]\nprovider = \"openai\"\nweight = -1";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let result = Config::load("/nonexistent/pythia.toml");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}

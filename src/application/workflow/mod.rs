//! Workflow orchestrator.
//!
//! Drives the seven-stage pipeline on three independent cadences:
//!
//! - the discovery loop refreshes the active market set,
//! - the forecast loop runs data collection through order execution,
//! - the monitor loop refreshes paper prices and assembles status.
//!
//! Shared state lives behind one `RwLock`; stage bodies snapshot under a
//! read lock, do their IO with no lock held, and replace slots under a
//! short write lock. Callbacks run outside the lock on the workflow task
//! and must not block indefinitely.

mod stage;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::application::forecaster::{generate_signal, rank_signals, Forecaster};
use crate::application::policy::PolicyEngine;
use crate::domain::forecast::EnsembleForecast;
use crate::domain::id::TokenId;
use crate::domain::market::{Market, MarketContext};
use crate::domain::money::Price;
use crate::domain::signal::{Side, TradingSignal};
use crate::error::{Error, Result};
use crate::port::outbound::execution::{OrderArgs, OrderClient, OrderSide};
use crate::port::outbound::market_feed::MarketFeed;
use crate::port::outbound::metrics::{MetricsSink, NoopMetrics};
use crate::port::outbound::paper::{PaperOrderRequest, PaperOrderType, PaperTrader};

pub use stage::{ErrorCallback, SignalCallback, Stage, StageCallback, StageResult};

/// Tick size passed to the live order client.
const DEFAULT_TICK_SIZE: Decimal = dec!(0.01);

/// Tunables for the orchestrated pipeline.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub discovery_interval: Duration,
    pub forecast_interval: Duration,
    pub monitor_interval: Duration,
    /// Active market shortlist size; discovery fetches twice this many.
    pub max_markets: usize,
    /// Minimum lifetime volume for a market to qualify.
    pub min_volume: Decimal,
    /// Maximum spread in bps for a market to qualify.
    pub max_spread_bps: Decimal,
    /// Minimum edge for a buy signal.
    pub min_edge_bps: Decimal,
    /// Minimum ensemble confidence for a signal to survive.
    pub min_confidence: Decimal,
    /// Order size, in shares, used for every dispatched order.
    pub order_size: Decimal,
    /// Route orders to the paper trader instead of the live client.
    pub use_paper_trade: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            discovery_interval: Duration::from_secs(300),
            forecast_interval: Duration::from_secs(120),
            monitor_interval: Duration::from_secs(60),
            max_markets: 10,
            min_volume: dec!(10000),
            max_spread_bps: dec!(500),
            min_edge_bps: dec!(200),
            min_confidence: dec!(0.6),
            order_size: dec!(50),
            use_paper_trade: true,
        }
    }
}

/// State shared between loops and getters.
///
/// Slots are replaced wholesale under the write lock; readers copy out.
#[derive(Default)]
struct SharedState {
    active_markets: Vec<Market>,
    forecasts: HashMap<TokenId, EnsembleForecast>,
    signals: Vec<TradingSignal>,
    running: bool,
}

struct Inner {
    config: WorkflowConfig,
    forecaster: Forecaster,
    policy: PolicyEngine,
    feed: Arc<dyn MarketFeed>,
    orders: Arc<dyn OrderClient>,
    paper: Option<Arc<dyn PaperTrader>>,
    metrics: Arc<dyn MetricsSink>,
    state: RwLock<SharedState>,
    shutdown: watch::Sender<bool>,
    on_stage_complete: Option<StageCallback>,
    on_signal: Option<SignalCallback>,
    on_error: Option<ErrorCallback>,
}

/// The trading workflow. Cheap to clone; all clones share one state.
#[derive(Clone)]
pub struct TradingWorkflow {
    inner: Arc<Inner>,
}

impl TradingWorkflow {
    /// Start building a workflow.
    #[must_use]
    pub fn builder() -> WorkflowBuilder {
        WorkflowBuilder::new()
    }

    /// Run the initial discovery, then spawn the three loops.
    ///
    /// A workflow runs at most once; after [`TradingWorkflow::stop`] it
    /// cannot be restarted.
    pub async fn start(&self) -> Result<()> {
        if *self.inner.shutdown.borrow() {
            return Err(Error::Execution("workflow already stopped".into()));
        }
        {
            let mut state = self.inner.state.write();
            if state.running {
                return Err(Error::Execution("workflow already running".into()));
            }
            state.running = true;
        }
        info!("Workflow starting");

        self.run_stage(Stage::MarketDiscovery).await;

        let discovery = self.clone();
        tokio::spawn(async move { discovery.discovery_loop().await });
        let forecast = self.clone();
        tokio::spawn(async move { forecast.forecast_loop().await });
        let monitor = self.clone();
        tokio::spawn(async move { monitor.monitor_loop().await });

        Ok(())
    }

    /// Signal every loop to terminate. Idempotent.
    pub fn stop(&self) {
        {
            let mut state = self.inner.state.write();
            if !state.running {
                return;
            }
            state.running = false;
        }
        info!("Workflow stopping");
        let _ = self.inner.shutdown.send(true);
    }

    /// Run the six trading stages once, in order; first error wins.
    pub async fn run_once(&self) -> Result<()> {
        for stage in Stage::TRADING_SEQUENCE {
            let result = self.run_stage(stage).await;
            if let Some(message) = result.error {
                return Err(Error::Execution(format!("{stage} failed: {message}")));
            }
        }
        Ok(())
    }

    /// Whether the loops are running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.state.read().running
    }

    /// Snapshot of the active market shortlist.
    #[must_use]
    pub fn active_markets(&self) -> Vec<Market> {
        self.inner.state.read().active_markets.clone()
    }

    /// Snapshot of the stored ensemble forecasts.
    #[must_use]
    pub fn forecasts(&self) -> HashMap<TokenId, EnsembleForecast> {
        self.inner.state.read().forecasts.clone()
    }

    /// Snapshot of the ranked signals.
    #[must_use]
    pub fn signals(&self) -> Vec<TradingSignal> {
        self.inner.state.read().signals.clone()
    }

    /// The policy engine backing this workflow.
    #[must_use]
    pub fn policy(&self) -> &PolicyEngine {
        &self.inner.policy
    }

    async fn discovery_loop(self) {
        let mut shutdown = self.inner.shutdown.subscribe();
        let mut ticker = tokio::time::interval(self.inner.config.discovery_interval);
        // Discard the immediate tick; start() already ran discovery.
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    debug!("Discovery loop stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let result = self.run_stage(Stage::MarketDiscovery).await;
                    self.report_background_failure(&result);
                }
            }
        }
    }

    async fn forecast_loop(self) {
        let mut shutdown = self.inner.shutdown.subscribe();
        let mut ticker = tokio::time::interval(self.inner.config.forecast_interval);
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    debug!("Forecast loop stopped");
                    break;
                }
                _ = ticker.tick() => {
                    for stage in Stage::FORECAST_SEQUENCE {
                        let result = self.run_stage(stage).await;
                        if !result.success {
                            self.report_background_failure(&result);
                            break;
                        }
                    }
                }
            }
        }
    }

    async fn monitor_loop(self) {
        let mut shutdown = self.inner.shutdown.subscribe();
        let mut ticker = tokio::time::interval(self.inner.config.monitor_interval);
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    debug!("Monitor loop stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let result = self.run_stage(Stage::Monitoring).await;
                    self.report_background_failure(&result);
                }
            }
        }
    }

    fn report_background_failure(&self, result: &StageResult) {
        if result.success {
            return;
        }
        if let (Some(callback), Some(message)) = (&self.inner.on_error, &result.error) {
            let error = Error::Execution(format!("{}: {message}", result.stage));
            callback(&error);
        }
    }

    /// Execute one stage, wrap the outcome, and fire callbacks.
    async fn run_stage(&self, stage: Stage) -> StageResult {
        let started = Instant::now();
        let outcome = self.execute(stage).await;
        let duration = started.elapsed();

        let result = match outcome {
            Ok(data) => StageResult {
                stage,
                success: true,
                error: None,
                data,
                duration,
                timestamp: Utc::now(),
            },
            Err(e) => {
                warn!(stage = %stage, error = %e, "Stage failed");
                StageResult {
                    stage,
                    success: false,
                    error: Some(e.to_string()),
                    data: Value::Null,
                    duration,
                    timestamp: Utc::now(),
                }
            }
        };

        self.inner
            .metrics
            .stage_completed(stage.as_str(), duration, result.success);
        if let Some(callback) = &self.inner.on_stage_complete {
            callback(&result);
        }
        result
    }

    async fn execute(&self, stage: Stage) -> Result<Value> {
        match stage {
            Stage::MarketDiscovery => self.discover_markets().await,
            Stage::DataCollection => self.collect_data().await,
            Stage::Forecasting => self.run_forecasts().await,
            Stage::SignalGeneration => self.generate_signals().await,
            Stage::RiskCheck => self.check_risk().await,
            Stage::OrderExecution => self.execute_orders().await,
            Stage::Monitoring => self.monitor().await,
        }
    }

    /// Fetch twice the shortlist size, filter by volume and spread, keep
    /// the first `max_markets`.
    async fn discover_markets(&self) -> Result<Value> {
        let cfg = &self.inner.config;
        let fetched = self
            .inner
            .feed
            .list_tradeable_markets(cfg.max_markets * 2, 0)
            .await?;
        let fetched_count = fetched.len();

        let active: Vec<Market> = fetched
            .into_iter()
            .filter(|m| m.volume >= cfg.min_volume && m.spread_bps <= cfg.max_spread_bps)
            .take(cfg.max_markets)
            .collect();
        let active_count = active.len();

        self.inner.metrics.active_markets(active_count);
        self.inner.state.write().active_markets = active;

        info!(fetched = fetched_count, active = active_count, "Markets discovered");
        Ok(json!({ "fetched": fetched_count, "active": active_count }))
    }

    /// Best-effort order-book warmup; individual failures are counted,
    /// never fatal.
    async fn collect_data(&self) -> Result<Value> {
        let markets = self.inner.state.read().active_markets.clone();
        let mut books = 0usize;
        let mut failures = 0usize;

        for market in &markets {
            let Some(token) = market.yes_token() else {
                continue;
            };
            match self.inner.orders.get_order_book(token).await {
                Ok(_) => books += 1,
                Err(e) => {
                    failures += 1;
                    debug!(market = %market.condition_id, error = %e, "Order book fetch failed");
                }
            }
        }

        Ok(json!({ "books": books, "failures": failures }))
    }

    /// Ensemble-forecast every active market with a YES token. The
    /// market snapshot is taken once at entry; a concurrent discovery
    /// tick replacing the shortlist does not affect this pass.
    async fn run_forecasts(&self) -> Result<Value> {
        let markets = self.inner.state.read().active_markets.clone();
        let mut produced = 0usize;
        let mut skipped = 0usize;
        let mut fresh = Vec::new();

        for market in &markets {
            let Some(ctx) = MarketContext::from_market(market) else {
                skipped += 1;
                continue;
            };
            match self.inner.forecaster.forecast_ensemble(&ctx).await {
                Ok(ensemble) => {
                    for individual in &ensemble.forecasts {
                        self.inner.metrics.forecast_recorded(
                            &individual.expert,
                            individual.latency,
                            individual.confidence,
                        );
                    }
                    self.inner.metrics.ensemble_recorded(ensemble.disagreement);
                    fresh.push((ctx.token_id.clone(), ensemble));
                    produced += 1;
                }
                Err(e) => {
                    skipped += 1;
                    warn!(market = %market.condition_id, error = %e, "Forecast failed");
                }
            }
        }

        {
            let mut state = self.inner.state.write();
            for (token, ensemble) in fresh {
                state.forecasts.insert(token, ensemble);
            }
        }

        Ok(json!({ "forecasts": produced, "skipped": skipped }))
    }

    /// Convert forecasts into signals, keep confident buys, rank, and
    /// replace the shared slice atomically.
    async fn generate_signals(&self) -> Result<Value> {
        let (markets, forecasts) = {
            let state = self.inner.state.read();
            (state.active_markets.clone(), state.forecasts.clone())
        };
        let cfg = &self.inner.config;
        let mut kept = Vec::new();
        let mut held = 0usize;

        for market in &markets {
            let Some(token) = market.yes_token() else {
                continue;
            };
            let Some(ensemble) = forecasts.get(token) else {
                continue;
            };
            let signal = generate_signal(ensemble, market.yes_price, cfg.min_edge_bps);
            if signal.is_buy() && ensemble.confidence >= cfg.min_confidence {
                self.inner
                    .metrics
                    .signal_generated(signal.edge_bps, signal.strength);
                if let Some(callback) = &self.inner.on_signal {
                    callback(&signal);
                }
                kept.push(signal);
            } else {
                held += 1;
            }
        }

        let ranked = rank_signals(kept);
        let count = ranked.len();
        self.inner.state.write().signals = ranked;

        Ok(json!({ "signals": count, "held": held }))
    }

    /// Dry-run the policy engine over every buy signal.
    async fn check_risk(&self) -> Result<Value> {
        let signals = self.inner.state.read().signals.clone();
        let cfg = &self.inner.config;
        let mut approved = 0usize;
        let mut rejected = 0usize;

        for signal in signals.iter().filter(|s| s.is_buy()) {
            let price = side_price(signal);
            match self
                .inner
                .policy
                .check_order(signal.market_id(), cfg.order_size, price, true)
            {
                Ok(()) => approved += 1,
                Err(violation) => {
                    rejected += 1;
                    self.inner.metrics.violation(violation.kind());
                    debug!(
                        market = %signal.market_id(),
                        violation = %violation,
                        "Order would be rejected"
                    );
                }
            }
        }

        Ok(json!({ "approved": approved, "rejected": rejected }))
    }

    /// Dispatch ranked signals to the configured backend. The risk check
    /// is re-run per order; per-order failures are contained.
    async fn execute_orders(&self) -> Result<Value> {
        let signals = self.inner.state.read().signals.clone();
        let cfg = &self.inner.config;
        let mut placed = 0usize;
        let mut skipped = 0usize;

        for signal in signals.iter().filter(|s| s.is_buy()) {
            let price = side_price(signal);
            if let Err(violation) =
                self.inner
                    .policy
                    .check_order(signal.market_id(), cfg.order_size, price, true)
            {
                skipped += 1;
                self.inner.metrics.violation(violation.kind());
                debug!(market = %signal.market_id(), violation = %violation, "Order rejected");
                continue;
            }

            let dispatched = if cfg.use_paper_trade {
                self.dispatch_paper(signal, price).await
            } else {
                self.dispatch_live(signal, price).await
            };

            match dispatched {
                Ok(true) => {
                    self.inner
                        .metrics
                        .order_placed(signal.market_id(), cfg.order_size * price);
                    placed += 1;
                }
                Ok(false) => skipped += 1,
                Err(e) => {
                    skipped += 1;
                    warn!(market = %signal.market_id(), error = %e, "Order dispatch failed");
                }
            }
        }

        Ok(json!({ "orders": placed, "skipped": skipped }))
    }

    /// Returns Ok(false) when no paper trader is wired in.
    async fn dispatch_paper(&self, signal: &TradingSignal, price: Price) -> Result<bool> {
        let Some(paper) = &self.inner.paper else {
            debug!("Paper trading enabled but no paper trader configured");
            return Ok(false);
        };
        let request = PaperOrderRequest {
            token_id: signal.token_id().clone(),
            market_id: signal.market_id().clone(),
            side: OrderSide::Buy,
            order_type: PaperOrderType::Market,
            price,
            size: self.inner.config.order_size,
        };
        let fill = paper.place_order(&request).await?;

        self.inner.policy.record_order(signal.market_id());
        // Paper fills are immediate, so the fill is reported back in the
        // same breath.
        self.inner.policy.record_fill(
            signal.market_id(),
            fill.size,
            fill.price,
            true,
            fill.realized_pnl,
        );
        info!(
            market = %signal.market_id(),
            side = signal.side.as_str(),
            size = %fill.size,
            price = %fill.price,
            "Paper order filled"
        );
        Ok(true)
    }

    /// Returns Ok(false) when the live client has no credentials.
    async fn dispatch_live(&self, signal: &TradingSignal, price: Price) -> Result<bool> {
        if !self.inner.orders.has_credentials() {
            debug!("Live trading requested but no credentials configured");
            return Ok(false);
        }
        let args = OrderArgs {
            token_id: signal.token_id().clone(),
            side: OrderSide::Buy,
            price,
            size: self.inner.config.order_size,
        };
        let order = self
            .inner
            .orders
            .create_and_post_order(&args, DEFAULT_TICK_SIZE, false)
            .await?;

        self.inner.policy.record_order(signal.market_id());
        info!(
            market = %signal.market_id(),
            order_id = %order.order_id,
            side = signal.side.as_str(),
            price = %price,
            "Live order posted"
        );
        Ok(true)
    }

    /// Refresh paper marks and assemble a status snapshot.
    async fn monitor(&self) -> Result<Value> {
        if let Some(paper) = &self.inner.paper {
            if let Err(e) = paper.update_prices().await {
                warn!(error = %e, "Paper price refresh failed");
            }
        }

        let (markets, forecasts, signals) = {
            let state = self.inner.state.read();
            (
                state.active_markets.len(),
                state.forecasts.len(),
                state.signals.len(),
            )
        };
        let policy = self.inner.policy.status();

        let mut data = json!({
            "active_markets": markets,
            "forecasts": forecasts,
            "signals": signals,
            "open_orders": policy.open_orders,
            "total_exposure": policy.total_exposure.to_f64(),
            "daily_orders": policy.daily.orders,
            "daily_volume": policy.daily.volume.to_f64(),
            "daily_loss": policy.daily.loss.to_f64(),
            "cooldown_active": policy.cooldown_active,
            "session_expired": policy.session_expired,
        });
        if let Some(paper) = &self.inner.paper {
            let stats = paper.stats();
            data["paper"] = json!({
                "cash": stats.cash.to_f64(),
                "positions": stats.open_positions,
                "realized_pnl": stats.realized_pnl.to_f64(),
                "unrealized_pnl": stats.unrealized_pnl.to_f64(),
                "trades": stats.trades,
            });
        }

        Ok(data)
    }
}

/// The price on the side the signal would buy: YES trades at the quoted
/// price, NO at its complement.
fn side_price(signal: &TradingSignal) -> Price {
    match signal.side {
        Side::Yes => signal.current_price,
        Side::No => Decimal::ONE - signal.current_price,
    }
}

/// Builder for [`TradingWorkflow`].
pub struct WorkflowBuilder {
    config: WorkflowConfig,
    forecaster: Option<Forecaster>,
    policy: Option<PolicyEngine>,
    feed: Option<Arc<dyn MarketFeed>>,
    orders: Option<Arc<dyn OrderClient>>,
    paper: Option<Arc<dyn PaperTrader>>,
    metrics: Arc<dyn MetricsSink>,
    on_stage_complete: Option<StageCallback>,
    on_signal: Option<SignalCallback>,
    on_error: Option<ErrorCallback>,
}

impl Default for WorkflowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: WorkflowConfig::default(),
            forecaster: None,
            policy: None,
            feed: None,
            orders: None,
            paper: None,
            metrics: Arc::new(NoopMetrics),
            on_stage_complete: None,
            on_signal: None,
            on_error: None,
        }
    }

    #[must_use]
    pub fn config(mut self, config: WorkflowConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn forecaster(mut self, forecaster: Forecaster) -> Self {
        self.forecaster = Some(forecaster);
        self
    }

    #[must_use]
    pub fn policy(mut self, policy: PolicyEngine) -> Self {
        self.policy = Some(policy);
        self
    }

    #[must_use]
    pub fn market_feed(mut self, feed: Arc<dyn MarketFeed>) -> Self {
        self.feed = Some(feed);
        self
    }

    #[must_use]
    pub fn order_client(mut self, orders: Arc<dyn OrderClient>) -> Self {
        self.orders = Some(orders);
        self
    }

    #[must_use]
    pub fn paper_trader(mut self, paper: Arc<dyn PaperTrader>) -> Self {
        self.paper = Some(paper);
        self
    }

    #[must_use]
    pub fn metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = metrics;
        self
    }

    #[must_use]
    pub fn on_stage_complete(
        mut self,
        callback: impl Fn(&StageResult) + Send + Sync + 'static,
    ) -> Self {
        self.on_stage_complete = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn on_signal(mut self, callback: impl Fn(&TradingSignal) + Send + Sync + 'static) -> Self {
        self.on_signal = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn on_error(mut self, callback: impl Fn(&Error) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }

    /// Assemble the workflow.
    ///
    /// # Errors
    ///
    /// Fails when the forecaster, policy engine, market feed, or order
    /// client is missing.
    pub fn build(self) -> Result<TradingWorkflow> {
        let forecaster = self
            .forecaster
            .ok_or_else(|| Error::Config("workflow requires a forecaster".into()))?;
        let policy = self
            .policy
            .ok_or_else(|| Error::Config("workflow requires a policy engine".into()))?;
        let feed = self
            .feed
            .ok_or_else(|| Error::Config("workflow requires a market feed".into()))?;
        let orders = self
            .orders
            .ok_or_else(|| Error::Config("workflow requires an order client".into()))?;

        let (shutdown, _) = watch::channel(false);

        Ok(TradingWorkflow {
            inner: Arc::new(Inner {
                config: self.config,
                forecaster,
                policy,
                feed,
                orders,
                paper: self.paper,
                metrics: self.metrics,
                state: RwLock::new(SharedState::default()),
                shutdown,
                on_stage_complete: self.on_stage_complete,
                on_signal: self.on_signal,
                on_error: self.on_error,
            }),
        })
    }
}

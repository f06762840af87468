use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};

use pythia::adapter::outbound::llm::{Anthropic, OpenAi};
use pythia::adapter::outbound::metrics::LogMetrics;
use pythia::adapter::outbound::paper::InMemoryPaperTrader;
use pythia::adapter::outbound::polymarket::PolymarketFeed;
use pythia::application::forecaster::Forecaster;
use pythia::application::policy::PolicyEngine;
use pythia::application::workflow::TradingWorkflow;
use pythia::config::{default_paper_cash, Config, ExpertProvider};
use pythia::port::outbound::expert::Expert;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "pythia.toml".into());
    let config = if Path::new(&path).exists() {
        Config::load(&path).with_context(|| format!("loading {path}"))?
    } else {
        Config::default()
    };

    config.logging.init();
    info!("pythia starting");

    let mut forecaster = Forecaster::with_cache_ttl(chrono::Duration::seconds(
        config.forecaster.cache_ttl_secs as i64,
    ));
    for settings in &config.forecaster.experts {
        let model = settings.resolved_model();
        let expert: Option<Arc<dyn Expert>> = match settings.provider {
            ExpertProvider::Anthropic => std::env::var("ANTHROPIC_API_KEY").ok().map(|key| {
                Arc::new(Anthropic::new(
                    key,
                    model.clone(),
                    settings.max_tokens,
                    settings.temperature,
                )) as Arc<dyn Expert>
            }),
            ExpertProvider::OpenAi => std::env::var("OPENAI_API_KEY").ok().map(|key| {
                Arc::new(OpenAi::new(
                    key,
                    model.clone(),
                    settings.max_tokens,
                    settings.temperature,
                )) as Arc<dyn Expert>
            }),
        };
        match expert {
            Some(client) => forecaster.register(client, settings.weight),
            None => warn!(model = %model, "Skipping expert, API key not set"),
        }
    }
    if forecaster.expert_count() == 0 {
        anyhow::bail!("no experts available; set ANTHROPIC_API_KEY or OPENAI_API_KEY");
    }

    let policy = PolicyEngine::new(config.risk.to_limits());
    let feed = Arc::new(PolymarketFeed::new(
        config.polymarket.gamma_url.clone(),
        config.polymarket.clob_url.clone(),
    ));
    let paper = Arc::new(InMemoryPaperTrader::with_marks(
        default_paper_cash(),
        feed.clone(),
    ));

    let workflow = TradingWorkflow::builder()
        .config(config.workflow.to_workflow_config())
        .forecaster(forecaster)
        .policy(policy)
        .market_feed(feed.clone())
        .order_client(feed)
        .paper_trader(paper)
        .metrics(Arc::new(LogMetrics))
        .on_signal(|signal| {
            info!(
                market = %signal.market_id(),
                side = signal.side.as_str(),
                edge_bps = %signal.edge_bps,
                "Signal"
            );
        })
        .on_error(|error| warn!(error = %error, "Background stage failed"))
        .build()?;

    workflow.start().await?;

    signal::ctrl_c().await?;
    info!("Shutdown signal received");
    workflow.stop();

    info!("pythia stopped");
    Ok(())
}

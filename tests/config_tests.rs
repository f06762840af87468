//! Configuration loading tests.

use std::io::Write;

use rust_decimal_macros::dec;

use pythia::config::{Config, ExpertProvider};

#[test]
fn load_reads_and_validates_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[logging]
level = "debug"

[workflow]
max_markets = 3
min_edge_bps = 250

[risk]
max_daily_loss = 100

[[forecaster.experts]]
provider = "anthropic"
weight = 0.7
"#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.workflow.max_markets, 3);
    assert_eq!(config.workflow.min_edge_bps, dec!(250));
    assert_eq!(config.risk.to_limits().max_daily_loss, dec!(100));
    assert_eq!(config.forecaster.experts.len(), 1);
    assert_eq!(
        config.forecaster.experts[0].provider,
        ExpertProvider::Anthropic
    );
}

#[test]
fn load_rejects_invalid_values() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[workflow]\nmax_markets = 0\n").unwrap();

    assert!(Config::load(file.path()).is_err());
}

#[test]
fn load_rejects_malformed_toml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not toml at all [[[").unwrap();

    assert!(Config::load(file.path()).is_err());
}

#[test]
fn defaults_paper_trade_on() {
    let config = Config::default();
    assert!(config.workflow.use_paper_trade);
    assert!(config.polymarket.gamma_url.contains("gamma-api"));
}

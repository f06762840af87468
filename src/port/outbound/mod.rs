//! Outbound (driven) ports implemented by infrastructure adapters.
//!
//! # Modules
//!
//! - [`expert`]: LLM-backed probabilistic forecasters
//! - [`market_feed`]: market discovery
//! - [`execution`]: order books and live order placement
//! - [`paper`]: the in-process paper-trading simulator
//! - [`metrics`]: side-channel observability

pub mod execution;
pub mod expert;
pub mod market_feed;
pub mod metrics;
pub mod paper;

pub use execution::{OrderArgs, OrderClient, OrderSide, PlacedOrder};
pub use expert::Expert;
pub use market_feed::MarketFeed;
pub use metrics::{MetricsSink, NoopMetrics};
pub use paper::{PaperFill, PaperOrderRequest, PaperOrderType, PaperStats, PaperTrader};

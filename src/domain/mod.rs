//! Pure domain types shared across the forecaster, policy engine, and
//! workflow. Nothing here performs IO or takes a lock.

pub mod book;
pub mod forecast;
pub mod id;
pub mod limits;
pub mod market;
pub mod money;
pub mod signal;

pub use book::{Book, PriceLevel};
pub use forecast::{EnsembleForecast, Forecast};
pub use id::{MarketId, OrderId, TokenId};
pub use limits::RiskLimits;
pub use market::{Market, MarketContext};
pub use money::{Notional, Price, Volume};
pub use signal::{Side, SignalAction, TradingSignal};

//! Trading signal types.

use rust_decimal::Decimal;

use super::forecast::EnsembleForecast;
use super::id::{MarketId, TokenId};
use super::money::Price;

/// What the signal recommends.
///
/// `Sell` exists for completeness; the default pipeline only ever emits
/// `Hold` or `Buy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    Hold,
    Buy,
    Sell,
}

impl SignalAction {
    /// Stable name used in logs and stage summaries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hold => "HOLD",
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

/// Which outcome of the binary market the signal targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Yes,
    No,
}

impl Side {
    /// Stable name used in logs and reasoning text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
        }
    }
}

/// A directional trading signal derived from an ensemble forecast.
#[derive(Debug, Clone)]
pub struct TradingSignal {
    pub action: SignalAction,
    pub side: Side,
    /// Signal strength in [0, 1]; zero for holds.
    pub strength: Decimal,
    /// Signed relative mispricing in basis points on the chosen side.
    pub edge_bps: Decimal,
    /// The ensemble that produced this signal.
    pub ensemble: EnsembleForecast,
    /// YES price observed when the signal was derived.
    pub current_price: Price,
    pub reasoning: String,
}

impl TradingSignal {
    /// Token the signal trades.
    #[must_use]
    pub fn token_id(&self) -> &TokenId {
        &self.ensemble.token_id
    }

    /// Market the signal trades.
    #[must_use]
    pub fn market_id(&self) -> &MarketId {
        &self.ensemble.market_id
    }

    /// Ranking score: `edge_bps * strength`.
    #[must_use]
    pub fn score(&self) -> Decimal {
        self.edge_bps * self.strength
    }

    /// True for actionable buy signals.
    #[must_use]
    pub fn is_buy(&self) -> bool {
        self.action == SignalAction::Buy
    }
}

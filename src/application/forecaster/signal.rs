//! Signal derivation and ranking.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::forecast::EnsembleForecast;
use crate::domain::money::Price;
use crate::domain::signal::{Side, SignalAction, TradingSignal};

use super::prompt::percent;

const BPS: Decimal = dec!(10000);

/// Derive a trading signal from an ensemble forecast and the current YES
/// price.
///
/// The YES price is read as the market-implied probability. When the
/// model probability exceeds it the YES side is cheap; otherwise the NO
/// side is. The edge must strictly exceed `min_edge_bps` to produce a
/// buy: an edge exactly at the threshold holds.
///
/// A price at or beyond the [0, 1] endpoints has no meaningful relative
/// edge on one of the sides, so the signal holds.
#[must_use]
pub fn generate_signal(
    ensemble: &EnsembleForecast,
    current_price: Price,
    min_edge_bps: Decimal,
) -> TradingSignal {
    if current_price <= Decimal::ZERO || current_price >= Decimal::ONE {
        return TradingSignal {
            action: SignalAction::Hold,
            side: Side::Yes,
            strength: Decimal::ZERO,
            edge_bps: Decimal::ZERO,
            ensemble: ensemble.clone(),
            current_price,
            reasoning: format!("price {current_price} at boundary, no tradeable edge"),
        };
    }

    let p = ensemble.probability;
    let (side, edge_bps) = if p > current_price {
        (Side::Yes, (p - current_price) / current_price * BPS)
    } else {
        (
            Side::No,
            (current_price - p) / (Decimal::ONE - current_price) * BPS,
        )
    };

    if edge_bps > min_edge_bps {
        let strength = (edge_bps / Decimal::ONE_HUNDRED).min(Decimal::ONE) * ensemble.confidence;
        TradingSignal {
            action: SignalAction::Buy,
            side,
            strength,
            edge_bps,
            ensemble: ensemble.clone(),
            current_price,
            reasoning: format!(
                "model {} vs market {}: {} bps edge on {}, confidence {}, disagreement {}",
                percent(p),
                percent(current_price),
                edge_bps.round_dp(0).normalize(),
                side.as_str(),
                ensemble.confidence.round_dp(2).normalize(),
                ensemble.disagreement.round_dp(3).normalize(),
            ),
        }
    } else {
        TradingSignal {
            action: SignalAction::Hold,
            side,
            strength: Decimal::ZERO,
            edge_bps,
            ensemble: ensemble.clone(),
            current_price,
            reasoning: format!(
                "edge {} bps does not clear the {} bps threshold",
                edge_bps.round_dp(0).normalize(),
                min_edge_bps.normalize(),
            ),
        }
    }
}

/// Rank signals by `edge_bps * strength`, best first.
///
/// The sort is stable, so equally scored signals keep their input order.
#[must_use]
pub fn rank_signals(mut signals: Vec<TradingSignal>) -> Vec<TradingSignal> {
    signals.sort_by(|a, b| b.score().cmp(&a.score()));
    signals
}

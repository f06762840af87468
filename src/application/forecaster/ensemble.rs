//! Ensemble combination math.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::domain::forecast::Forecast;

/// Combined ensemble statistics.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Combined {
    pub probability: Decimal,
    pub confidence: Decimal,
    pub disagreement: Decimal,
}

/// Combine a non-empty batch of forecasts.
///
/// `weights` is aligned with `forecasts`; a zero weight means the expert
/// was registered without one and receives the uniform default `1/N`.
/// Each expert's effective weight is its nominal weight times its
/// self-reported confidence, so a hesitant expert exerts less influence
/// than its nominal weight.
pub(crate) fn combine(forecasts: &[Forecast], weights: &[Decimal]) -> Combined {
    debug_assert_eq!(forecasts.len(), weights.len());
    debug_assert!(!forecasts.is_empty());

    let n = Decimal::from(forecasts.len());
    let uniform = Decimal::ONE / n;

    let mut weighted_sum = Decimal::ZERO;
    let mut weight_total = Decimal::ZERO;
    let mut confidence_sum = Decimal::ZERO;

    for (forecast, weight) in forecasts.iter().zip(weights) {
        let nominal = if weight.is_zero() { uniform } else { *weight };
        let effective = nominal * forecast.confidence;
        weighted_sum += effective * forecast.probability;
        weight_total += effective;
        confidence_sum += forecast.confidence;
    }

    let probability = if weight_total.is_zero() {
        // Confidence is always positive after parsing, so this only
        // happens if every nominal weight is negative-garbage; fall back
        // to the plain mean.
        forecasts.iter().map(|f| f.probability).sum::<Decimal>() / n
    } else {
        weighted_sum / weight_total
    };

    Combined {
        probability,
        confidence: confidence_sum / n,
        disagreement: population_std_dev(forecasts, probability),
    }
}

/// Population standard deviation of the individual probabilities around
/// the ensemble probability. Zero for fewer than two forecasts.
///
/// The square root is the one place fixed-point gives way to f64.
fn population_std_dev(forecasts: &[Forecast], mean: Decimal) -> Decimal {
    if forecasts.len() < 2 {
        return Decimal::ZERO;
    }
    let n = Decimal::from(forecasts.len());
    let variance = forecasts
        .iter()
        .map(|f| {
            let d = f.probability - mean;
            d * d
        })
        .sum::<Decimal>()
        / n;
    let root = variance.to_f64().unwrap_or(0.0).sqrt();
    Decimal::from_f64(root).unwrap_or(Decimal::ZERO)
}

//! Tolerant extraction of forecasts from free-form expert responses.
//!
//! Experts are asked for bare JSON but routinely wrap it in markdown
//! fences, surround it with prose, or nest the fields under a `forecast`
//! key. The parser is a tolerant extractor over a dynamic value tree with
//! a fixed precedence list of field paths; anything outside the
//! recognized shapes is rejected.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use crate::error::ForecastError;

/// Confidence assumed when the expert omits one or returns a value
/// outside (0, 1].
pub const DEFAULT_CONFIDENCE: Decimal = dec!(0.7);

/// The fields extracted from a response, before the caller fills in
/// token, market, expert, and timing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedForecast {
    pub probability: Decimal,
    pub confidence: Decimal,
    pub reasoning: String,
}

/// Parse an expert response into probability, confidence, and reasoning.
pub fn parse_response(raw: &str) -> Result<ParsedForecast, ForecastError> {
    let text = strip_fences(raw);
    let object = balanced_object(text).ok_or_else(|| ForecastError::Parse {
        reason: "no JSON object found in response".into(),
    })?;
    let tree: Value = serde_json::from_str(object).map_err(|e| ForecastError::Parse {
        reason: format!("invalid JSON: {e}"),
    })?;

    let probability = lookup(&tree, "probability")
        .and_then(decimal_value)
        .ok_or_else(|| ForecastError::Parse {
            reason: "missing or non-numeric probability".into(),
        })?;
    let probability = rescale_probability(probability)?;

    let confidence = lookup(&tree, "confidence")
        .and_then(decimal_value)
        .filter(|c| *c > Decimal::ZERO && *c <= Decimal::ONE)
        .unwrap_or(DEFAULT_CONFIDENCE);

    // Top-level keys win over the nested `forecast` equivalents.
    let reasoning = tree
        .get("reasoning")
        .or_else(|| tree.get("rationale"))
        .or_else(|| lookup(&tree, "reasoning"))
        .or_else(|| lookup(&tree, "rationale"))
        .and_then(text_value)
        .unwrap_or_default();

    Ok(ParsedForecast {
        probability,
        confidence,
        reasoning,
    })
}

/// Remove a leading code fence (with optional `json` tag) and its
/// trailing fence, if present.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = match rest.rfind("```") {
        Some(end) => &rest[..end],
        None => rest,
    };
    rest.trim()
}

/// First balanced brace-delimited substring, found by single-pass brace
/// counting.
fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    for (offset, c) in text[start..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Look up a field at the top level, else under a nested `forecast`
/// object.
fn lookup<'a>(tree: &'a Value, field: &str) -> Option<&'a Value> {
    tree.get(field)
        .or_else(|| tree.get("forecast").and_then(|nested| nested.get(field)))
}

/// Accept a number, integer, or numeric string.
fn decimal_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let repr = n.to_string();
            repr.parse::<Decimal>()
                .or_else(|_| Decimal::from_scientific(&repr))
                .ok()
        }
        Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    }
}

/// Accept a string, or a list of strings joined with single spaces.
fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(" "))
            }
        }
        _ => None,
    }
}

/// Probabilities given as percentages in (1, 100] are rescaled; anything
/// still outside [0, 1] is rejected.
fn rescale_probability(p: Decimal) -> Result<Decimal, ForecastError> {
    let p = if p > Decimal::ONE && p <= Decimal::ONE_HUNDRED {
        p / Decimal::ONE_HUNDRED
    } else {
        p
    };
    if p < Decimal::ZERO || p > Decimal::ONE {
        return Err(ForecastError::Parse {
            reason: format!("probability {p} out of range"),
        });
    }
    Ok(p)
}

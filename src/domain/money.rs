//! Monetary types for price, size, and notional representation.
//!
//! Everything that counts money or probability is a [`rust_decimal::Decimal`]
//! so cumulative sums and percentage comparisons do not drift. Floating
//! point appears only at external boundaries (metrics, log formatting, the
//! disagreement square root).

use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Volume represented as a Decimal for precision.
pub type Volume = Decimal;

/// Order notional (size x price) represented as a Decimal.
pub type Notional = Decimal;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn decimal_sums_do_not_drift() {
        let mut total: Notional = Decimal::ZERO;
        for _ in 0..1000 {
            total += dec!(0.1);
        }
        assert_eq!(total, dec!(100));
    }
}

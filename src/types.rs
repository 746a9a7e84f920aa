//! Numeric aliases shared by the engines and the formatter

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Monetary amounts. Always exact decimal, never f64.
pub type Money = Decimal;

/// Rates and allocation shares expressed as fractions (0.05 = 5%).
pub type Rate = Decimal;

/// Convert a percentage value (5 = 5%) to a fraction
pub fn percent_to_fraction(percent: Decimal) -> Rate {
    percent / dec!(100)
}

/// Convert a fraction (0.05) to a percentage value (5)
pub fn fraction_to_percent(rate: Rate) -> Decimal {
    rate * dec!(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_conversions() {
        assert_eq!(percent_to_fraction(dec!(25)), dec!(0.25));
        assert_eq!(fraction_to_percent(dec!(0.055)), dec!(5.5));
    }
}

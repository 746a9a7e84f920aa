//! Currency and percent strings for the wire response and the ledger table

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::{IllustrationError, Result};
use crate::types::{Money, Rate};

const BILLION: Decimal = dec!(1000000000);
const MILLION: Decimal = dec!(1000000);
const THOUSAND: Decimal = dec!(1000);

fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Insert thousands separators into a string of ASCII digits
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// US dollar string with a fixed number of decimals, e.g. `$1,234.56`
pub fn format_currency_dp(value: Money, decimals: u32) -> String {
    let rounded = round_half_up(value, decimals);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };

    let text = format!("{:.*}", decimals as usize, rounded.abs());
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    match fraction {
        Some(fraction) => format!("{}${}.{}", sign, group_thousands(whole), fraction),
        None => format!("{}${}", sign, group_thousands(whole)),
    }
}

/// Full currency with cents: `$1,234.56`, `-$20.00`
pub fn format_currency(value: Money) -> String {
    format_currency_dp(value, 2)
}

/// Compact magnitude for chart axes and summary cards.
///
/// `$1.2B`, `$3.4M`, `$45.3K` at or above a thousand (by absolute value),
/// whole dollars below that. The unit follows the rounded value, so
/// `999_950` reads `$1.0M` rather than `$1000.0K`.
pub fn format_compact(value: Money) -> String {
    const UNITS: [(Decimal, &str); 3] = [(THOUSAND, "K"), (MILLION, "M"), (BILLION, "B")];

    let magnitude = value.abs();
    let sign = if value.is_sign_negative() && !value.is_zero() { "-" } else { "" };

    if round_half_up(magnitude, 0) < THOUSAND {
        return format_currency_dp(value, 0);
    }

    // Smallest unit whose rounded figure stays below 1000, billions otherwise
    let (divisor, suffix) = UNITS
        .iter()
        .copied()
        .find(|(divisor, _)| round_half_up(magnitude / *divisor, 1) < THOUSAND)
        .unwrap_or((BILLION, "B"));

    format!("{}${:.1}{}", sign, round_half_up(magnitude / divisor, 1), suffix)
}

/// Parse a currency string, tolerating `$` signs and thousands separators
pub fn parse_currency(text: &str) -> Result<Money> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();

    Decimal::from_str(&cleaned)
        .map_err(|e| IllustrationError::invalid("currency", format!("'{}': {}", text, e)))
}

/// Like [`parse_currency`] but unparseable text reads as zero
pub fn parse_currency_or_zero(text: &str) -> Money {
    parse_currency(text).unwrap_or(Decimal::ZERO)
}

/// Fraction as a percent string with two decimals: `0.045` -> `4.50%`
pub fn format_percent(rate: Rate) -> String {
    format!("{:.2}%", round_half_up(rate * dec!(100), 2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(52750)), "$52,750.00");
        assert_eq!(format_currency(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_currency(dec!(0.005)), "$0.01");
        assert_eq!(format_currency(dec!(999.999)), "$1,000.00");
        assert_eq!(format_currency(dec!(-20)), "-$20.00");
        assert_eq!(format_currency(dec!(-0.001)), "$0.00");
        assert_eq!(format_currency(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(dec!(1250000000)), "$1.3B");
        assert_eq!(format_compact(dec!(1200000)), "$1.2M");
        assert_eq!(format_compact(dec!(45300)), "$45.3K");
        assert_eq!(format_compact(dec!(1000)), "$1.0K");
        assert_eq!(format_compact(dec!(999)), "$999");
        assert_eq!(format_compact(dec!(12.5)), "$13");
        assert_eq!(format_compact(dec!(-2500000)), "-$2.5M");
    }

    #[test]
    fn test_format_compact_rounds_into_next_unit() {
        assert_eq!(format_compact(dec!(999.4)), "$999");
        assert_eq!(format_compact(dec!(999.5)), "$1.0K");
        assert_eq!(format_compact(dec!(999.6)), "$1.0K");
        assert_eq!(format_compact(dec!(999949)), "$999.9K");
        assert_eq!(format_compact(dec!(999950)), "$1.0M");
        assert_eq!(format_compact(dec!(999950000)), "$1.0B");
        assert_eq!(format_compact(dec!(-999950)), "-$1.0M");
        assert_eq!(format_compact(dec!(1234567890000)), "$1234.6B");
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("$1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_currency("-$20.00").unwrap(), dec!(-20));
        assert_eq!(parse_currency(" 52750 ").unwrap(), dec!(52750));
        assert!(parse_currency("$1.2M").is_err());
        assert_eq!(parse_currency_or_zero("n/a"), Decimal::ZERO);
        assert_eq!(parse_currency_or_zero(""), Decimal::ZERO);
    }

    #[test]
    fn test_currency_string_reparses_exactly() {
        let value = dec!(98765.43);
        assert_eq!(parse_currency(&format_currency(value)).unwrap(), value);
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(0.045)), "4.50%");
        assert_eq!(format_percent(dec!(0.1)), "10.00%");
        assert_eq!(format_percent(Decimal::ZERO), "0.00%");
        assert_eq!(format_percent(dec!(0.00125)), "0.13%");
    }
}

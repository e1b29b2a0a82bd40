//! Display formatting for calculator results.

use rust_decimal::Decimal;
use savings_core::calculations::common::round_whole;

/// Inserts `,` every three digits of a non-negative integer string.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Formats an amount as whole US dollars: `$12,345`, `-$1,200`.
pub fn format_currency(value: Decimal) -> String {
    let whole = round_whole(value);
    let digits = group_thousands(&whole.abs().trunc().to_string());
    if whole.is_sign_negative() && !whole.is_zero() {
        format!("-${digits}")
    } else {
        format!("${digits}")
    }
}

/// Formats a percentage as a rounded integer: `18%`.
pub fn format_percent(value: Decimal) -> String {
    format!("{}%", round_whole(value))
}

/// Formats a count as a whole number.
pub fn format_count(value: Decimal) -> String {
    round_whole(value).to_string()
}

/// Annual savings headline from savings expressed in thousands: `725K+`.
pub fn format_annual_thousands(thousands: Decimal) -> String {
    format!("{}K+", round_whole(thousands))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn format_currency_groups_thousands() {
        assert_eq!(format_currency(dec!(112220)), "$112,220");
        assert_eq!(format_currency(dec!(1000000)), "$1,000,000");
        assert_eq!(format_currency(dec!(999)), "$999");
    }

    #[test]
    fn format_currency_drops_cents() {
        assert_eq!(format_currency(dec!(931.392)), "$931");
        assert_eq!(format_currency(dec!(0.5)), "$1");
    }

    #[test]
    fn format_currency_prefixes_negative_sign() {
        assert_eq!(format_currency(dec!(-1200)), "-$1,200");
    }

    #[test]
    fn format_currency_renders_zero_without_sign() {
        assert_eq!(format_currency(Decimal::ZERO), "$0");
        assert_eq!(format_currency(dec!(-0.2)), "$0");
    }

    #[test]
    fn format_percent_rounds() {
        assert_eq!(format_percent(dec!(10.8)), "11%");
        assert_eq!(format_percent(dec!(4.8)), "5%");
        assert_eq!(format_percent(dec!(100)), "100%");
    }

    #[test]
    fn format_count_rounds() {
        assert_eq!(format_count(dec!(1402.745)), "1403");
        assert_eq!(format_count(dec!(1540.0)), "1540");
    }

    #[test]
    fn format_annual_thousands_appends_suffix() {
        assert_eq!(format_annual_thousands(dec!(725)), "725K+");
    }
}

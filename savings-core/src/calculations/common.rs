//! Common utility functions for savings calculations.
//!
//! This module provides the percentage and rounding helpers shared by the
//! visit funnel and the automation adjustments.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Percentages are expressed on a 0-100 scale throughout the model.
pub const PERCENT_SCALE: Decimal = dec!(100);

/// Applies a percentage rate to an amount.
///
/// Saturates at the `Decimal` range instead of overflowing.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use savings_core::calculations::common::percent_of;
///
/// assert_eq!(percent_of(dec!(1000), dec!(20)), dec!(200));
/// assert_eq!(percent_of(dec!(0), dec!(20)), dec!(0));
/// ```
pub fn percent_of(
    amount: Decimal,
    rate: Decimal,
) -> Decimal {
    amount.saturating_mul(rate) / PERCENT_SCALE
}

/// Rounds a value to a whole unit for display.
///
/// Midpoints round toward positive infinity, so `2.5` becomes `3` and `-2.5`
/// becomes `-2`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use savings_core::calculations::common::round_whole;
///
/// assert_eq!(round_whole(dec!(1234.49)), dec!(1234));
/// assert_eq!(round_whole(dec!(1234.5)), dec!(1235));
/// assert_eq!(round_whole(dec!(-2.5)), dec!(-2));
/// assert_eq!(round_whole(dec!(-2.51)), dec!(-3));
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value.saturating_add(dec!(0.5)).floor().normalize()
}

/// Clamps a rate to the closed range `[0, 100]`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use savings_core::calculations::common::clamp_rate;
///
/// assert_eq!(clamp_rate(dec!(130)), dec!(100));
/// assert_eq!(clamp_rate(dec!(-5)), dec!(0));
/// assert_eq!(clamp_rate(dec!(60)), dec!(60));
/// ```
pub fn clamp_rate(rate: Decimal) -> Decimal {
    rate.max(Decimal::ZERO).min(PERCENT_SCALE)
}

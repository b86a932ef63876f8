//! Common utility functions for tax calculations.
//!
//! This module provides shared numeric helpers: the guarded percentage used
//! for effective rates, and the two-place rounding applied when results are
//! displayed.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero). Calculations never call
/// this; it is meant for presenting finished results.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(17739.165)), dec!(17739.17));
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Expresses `part` as a percentage of `whole`.
///
/// Returns zero when `whole` is zero or negative instead of dividing.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::percentage;
///
/// assert_eq!(percentage(dec!(25), dec!(200)), dec!(12.5));
/// assert_eq!(percentage(dec!(25), Decimal::ZERO), Decimal::ZERO);
/// ```
pub fn percentage(
    part: Decimal,
    whole: Decimal,
) -> Decimal {
    if whole > Decimal::ZERO {
        part / whole * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

//! Monetary rounding and formatting.
//!
//! All money in the engine is a [`Decimal`]. Rounding is to cents with ties
//! resolved toward positive infinity, which is the convention stored payroll
//! data was produced with.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places money is rounded and displayed to.
pub const MONEY_DP: u32 = 2;

/// Rounds an amount to two decimal places, half-up.
///
/// Ties go toward positive infinity, so `0.005` becomes `0.01` and `-0.005`
/// becomes `0.00`. A zero result never carries a negative sign.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round2;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round2(Decimal::from_str("2.675").unwrap()), Decimal::from_str("2.68").unwrap());
/// assert_eq!(round2(Decimal::from_str("-1.005").unwrap()), Decimal::from_str("-1.00").unwrap());
/// ```
pub fn round2(amount: Decimal) -> Decimal {
    let strategy = if amount.is_sign_negative() {
        RoundingStrategy::MidpointTowardZero
    } else {
        RoundingStrategy::MidpointAwayFromZero
    };
    let mut rounded = amount.round_dp_with_strategy(MONEY_DP, strategy);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}

/// Formats an amount with exactly two decimal places.
///
/// The amount is rounded with [`round2`] first; the sign of negative amounts
/// is kept.
pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", round2(amount))
}

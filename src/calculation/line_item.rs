//! Line item calculation.
//!
//! Derives tax and net pay for one employee from basic pay, allowances and
//! deductions under a flat withholding rate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::money::round2;

/// Returns the default flat withholding rate of 16%.
pub fn default_tax_rate() -> Decimal {
    Decimal::new(16, 2)
}

/// The derived amounts for a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAmounts {
    /// Tax withheld.
    pub tax: Decimal,
    /// Net pay after deductions and tax. Not floored at zero.
    pub net_pay: Decimal,
}

/// Computes tax and net pay for one employee.
///
/// Absent allowances and deductions count as zero. Without an explicit tax,
/// `tax = round2(tax_rate * (basic_pay + allowances))`. Net pay is computed
/// from the already-rounded tax: `round2(basic_pay + allowances - deductions - tax)`.
/// A negative net is returned as is so over-deduction stays visible.
///
/// # Errors
///
/// Returns `AmountOutOfRange` if an intermediate amount overflows [`Decimal`].
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{compute_item, default_tax_rate};
/// use rust_decimal::Decimal;
///
/// let amounts = compute_item(
///     Decimal::new(50000, 0),
///     Some(Decimal::new(5000, 0)),
///     Some(Decimal::new(2000, 0)),
///     None,
///     default_tax_rate(),
/// )?;
/// assert_eq!(amounts.tax, Decimal::new(8800, 0));
/// assert_eq!(amounts.net_pay, Decimal::new(44200, 0));
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
pub fn compute_item(
    basic_pay: Decimal,
    allowances: Option<Decimal>,
    deductions: Option<Decimal>,
    tax_override: Option<Decimal>,
    tax_rate: Decimal,
) -> EngineResult<ItemAmounts> {
    let allowances = allowances.unwrap_or(Decimal::ZERO);
    let deductions = deductions.unwrap_or(Decimal::ZERO);
    let gross = basic_pay
        .checked_add(allowances)
        .ok_or_else(|| out_of_range("gross"))?;

    let tax = match tax_override {
        Some(tax) => tax,
        None => round2(
            gross
                .checked_mul(tax_rate)
                .ok_or_else(|| out_of_range("tax"))?,
        ),
    };
    let net_pay = gross
        .checked_sub(deductions)
        .and_then(|net| net.checked_sub(tax))
        .map(round2)
        .ok_or_else(|| out_of_range("net_pay"))?;

    Ok(ItemAmounts { tax, net_pay })
}

fn out_of_range(field: &str) -> EngineError {
    EngineError::AmountOutOfRange {
        field: field.to_string(),
    }
}

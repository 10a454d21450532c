//! Run total aggregation.
//!
//! Totals are always re-derived from the full item set rather than adjusted
//! incrementally, and the stored per-item values are summed without any
//! further rounding.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{PayrollRunItem, RunTotals};

/// Sums the five monetary fields across `items`.
///
/// An empty slice yields [`RunTotals::ZERO`]. Fails with `AmountOutOfRange`
/// naming the first aggregate that overflows.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::sum_totals;
/// use payroll_engine::models::RunTotals;
///
/// assert_eq!(sum_totals(&[])?, RunTotals::ZERO);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
pub fn sum_totals(items: &[PayrollRunItem]) -> EngineResult<RunTotals> {
    items
        .iter()
        .try_fold(RunTotals::ZERO, |acc, item| checked_add_totals(&acc, &item_totals(item)))
}

/// Adds two sets of totals field by field.
///
/// Fails with `AmountOutOfRange` naming the first aggregate that overflows.
pub fn checked_add_totals(a: &RunTotals, b: &RunTotals) -> EngineResult<RunTotals> {
    Ok(RunTotals {
        gross_pay: add(a.gross_pay, b.gross_pay, "gross_pay")?,
        total_allowances: add(a.total_allowances, b.total_allowances, "total_allowances")?,
        total_deductions: add(a.total_deductions, b.total_deductions, "total_deductions")?,
        total_tax: add(a.total_tax, b.total_tax, "total_tax")?,
        net_pay: add(a.net_pay, b.net_pay, "net_pay")?,
    })
}

/// The contribution of a single item to its run's totals.
pub fn item_totals(item: &PayrollRunItem) -> RunTotals {
    RunTotals {
        gross_pay: item.basic_pay,
        total_allowances: item.allowances,
        total_deductions: item.deductions,
        total_tax: item.tax,
        net_pay: item.net_pay,
    }
}

/// Returns true when every aggregate in `totals` equals the sum over `items`.
///
/// Items whose sum overflows never match.
pub fn totals_match(totals: &RunTotals, items: &[PayrollRunItem]) -> bool {
    sum_totals(items).is_ok_and(|sum| sum == *totals)
}

fn add(total: Decimal, amount: Decimal, field: &str) -> EngineResult<Decimal> {
    total
        .checked_add(amount)
        .ok_or_else(|| EngineError::AmountOutOfRange {
            field: field.to_string(),
        })
}

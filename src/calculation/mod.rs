//! Calculation logic for the Payroll Engine.
//!
//! This module contains the pure functions behind payroll runs: cent rounding,
//! per-employee tax and net pay, run total aggregation and the CSV export.

mod export;
mod line_item;
mod money;
mod totals;

pub use export::{EXPORT_HEADER, TOTALS_LABEL, export_file_name, export_run_csv};
pub use line_item::{ItemAmounts, compute_item, default_tax_rate};
pub use money::{MONEY_DP, format_money, round2};
pub use totals::{checked_add_totals, item_totals, sum_totals, totals_match};

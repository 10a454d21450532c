//! CSV export of a payroll run.
//!
//! The layout is a header row, one row per item and a trailing totals row
//! built from the run's stored aggregates. Producing the text has no side
//! effects; delivering it is left to the caller.

use crate::models::{PayrollRun, PayrollRunItem};

use super::money::format_money;

/// Column headers of the export, in order.
pub const EXPORT_HEADER: [&str; 7] = [
    "Employee ID",
    "Employee Name",
    "Basic Pay",
    "Allowances",
    "Deductions",
    "Tax",
    "Net Pay",
];

/// Label written in the second column of the totals row.
pub const TOTALS_LABEL: &str = "Totals";

/// Returns the download file name for a run's export.
pub fn export_file_name(run: &PayrollRun) -> String {
    format!("payroll_run_{}.csv", run.id)
}

/// Renders a run and its items as CSV text.
///
/// Rows are joined with `\n` and there is no trailing newline. Money columns
/// use exactly two decimal places. The totals row shows the run's persisted
/// aggregates, not a sum over `items`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::export_run_csv;
/// use payroll_engine::models::{PayrollRun, RunStatus, RunTotals};
/// use chrono::{NaiveDate, Utc};
/// use uuid::Uuid;
///
/// let run = PayrollRun {
///     id: Uuid::new_v4(),
///     organization_id: None,
///     user_id: None,
///     period_start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///     period_end: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
///     status: RunStatus::Draft,
///     totals: RunTotals::ZERO,
///     created_at: Utc::now(),
/// };
///
/// let csv = export_run_csv(&run, &[]);
/// assert_eq!(csv.lines().last(), Some(",Totals,0.00,0.00,0.00,0.00,0.00"));
/// ```
pub fn export_run_csv(run: &PayrollRun, items: &[PayrollRunItem]) -> String {
    let mut rows: Vec<String> = Vec::with_capacity(items.len() + 2);
    rows.push(join_row(EXPORT_HEADER.iter().map(|h| h.to_string())));

    for item in items {
        rows.push(join_row([
            item.employee_id.clone(),
            item.employee_name.clone().unwrap_or_default(),
            format_money(item.basic_pay),
            format_money(item.allowances),
            format_money(item.deductions),
            format_money(item.tax),
            format_money(item.net_pay),
        ]));
    }

    let totals = &run.totals;
    rows.push(join_row([
        String::new(),
        TOTALS_LABEL.to_string(),
        format_money(totals.gross_pay),
        format_money(totals.total_allowances),
        format_money(totals.total_deductions),
        format_money(totals.total_tax),
        format_money(totals.net_pay),
    ]));

    rows.join("\n")
}

fn join_row(fields: impl IntoIterator<Item = String>) -> String {
    fields
        .into_iter()
        .map(|f| escape_field(&f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Quotes a field if it contains a separator, quote or line break.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

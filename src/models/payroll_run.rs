//! Payroll run models.
//!
//! This module contains the [`PayrollRun`] record, its [`RunStatus`] lifecycle,
//! and the five monetary aggregates carried in [`RunTotals`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PayrollRunItem;

/// The lifecycle status of a payroll run.
///
/// Runs start as `Draft`. `Completed` and `Cancelled` are terminal.
///
/// # Example
///
/// ```
/// use payroll_engine::models::RunStatus;
///
/// assert_eq!(RunStatus::Draft.to_string(), "draft");
/// assert!(RunStatus::Cancelled.is_terminal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Being assembled; items may be added and removed.
    Draft,
    /// Handed off for processing but not yet finalized.
    Processing,
    /// Finalized with authoritative totals.
    Completed,
    /// Abandoned.
    Cancelled,
}

impl RunStatus {
    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Draft => "draft",
            RunStatus::Processing => "processing",
            RunStatus::Completed => "completed",
            RunStatus::Cancelled => "cancelled",
        }
    }

    /// Returns true for statuses no operation transitions out of.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Cancelled)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(RunStatus::Draft),
            "processing" => Ok(RunStatus::Processing),
            "completed" => Ok(RunStatus::Completed),
            "cancelled" => Ok(RunStatus::Cancelled),
            other => Err(format!("unknown run status '{}'", other)),
        }
    }
}

/// The five monetary aggregates of a run.
///
/// Each field is the sum of the matching field across every item in the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    /// Sum of item basic pay.
    pub gross_pay: Decimal,
    /// Sum of item allowances.
    pub total_allowances: Decimal,
    /// Sum of item deductions.
    pub total_deductions: Decimal,
    /// Sum of item tax.
    pub total_tax: Decimal,
    /// Sum of item net pay.
    pub net_pay: Decimal,
}

impl RunTotals {
    /// All-zero totals, as carried by a freshly created run.
    pub const ZERO: RunTotals = RunTotals {
        gross_pay: Decimal::ZERO,
        total_allowances: Decimal::ZERO,
        total_deductions: Decimal::ZERO,
        total_tax: Decimal::ZERO,
        net_pay: Decimal::ZERO,
    };
}

/// A payroll run for one organization and period.
///
/// `totals` is written only by the aggregator and `status` only by the
/// lifecycle operations of [`crate::service::PayrollService`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Unique identifier of the run.
    pub id: Uuid,
    /// Owning organization, if any.
    pub organization_id: Option<Uuid>,
    /// User that created the run, if known.
    pub user_id: Option<Uuid>,
    /// First day of the pay period.
    pub period_start: NaiveDate,
    /// Last day of the pay period. Not checked against `period_start`.
    pub period_end: NaiveDate,
    /// Current lifecycle status.
    pub status: RunStatus,
    /// Aggregates over the run's items.
    #[serde(flatten)]
    pub totals: RunTotals,
    /// When the run was created.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPayrollRun {
    /// Owning organization, if any.
    #[serde(default)]
    pub organization_id: Option<Uuid>,
    /// Creating user, if known.
    #[serde(default)]
    pub user_id: Option<Uuid>,
    /// First day of the pay period.
    pub period_start: NaiveDate,
    /// Last day of the pay period.
    pub period_end: NaiveDate,
}

/// Equality filters for listing runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFilter {
    /// Only runs owned by this organization.
    #[serde(default)]
    pub organization_id: Option<Uuid>,
    /// Only runs in this status.
    #[serde(default)]
    pub status: Option<RunStatus>,
}

impl RunFilter {
    /// Returns true if the run passes every filter that is set.
    pub fn matches(&self, run: &PayrollRun) -> bool {
        self.organization_id
            .is_none_or(|org| run.organization_id == Some(org))
            && self.status.is_none_or(|status| run.status == status)
    }
}

/// A run together with its full item list, oldest item first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunWithItems {
    /// The run record.
    pub run: PayrollRun,
    /// Every item currently in the run.
    pub items: Vec<PayrollRunItem>,
}

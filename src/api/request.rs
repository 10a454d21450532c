//! Request types for the Payroll Engine API.
//!
//! This module defines the JSON request bodies and query strings accepted by
//! the run endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{NewPayrollRun, NewRunItem, RunFilter, RunStatus};

/// Request body for `POST /runs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRunRequest {
    /// Owning organization.
    #[serde(default)]
    pub organization_id: Option<Uuid>,
    /// Creating user.
    #[serde(default)]
    pub user_id: Option<Uuid>,
    /// First day of the pay period.
    pub period_start: NaiveDate,
    /// Last day of the pay period.
    pub period_end: NaiveDate,
}

/// Request body for `POST /runs/:run_id/items` and `POST /compute`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddItemRequest {
    /// Reference to the employee record.
    pub employee_id: String,
    /// Display name to cache on the item.
    #[serde(default)]
    pub employee_name: Option<String>,
    /// Basic pay for the period.
    pub basic_pay: Decimal,
    /// Allowances; zero when absent.
    #[serde(default)]
    pub allowances: Option<Decimal>,
    /// Deductions; zero when absent.
    #[serde(default)]
    pub deductions: Option<Decimal>,
    /// Explicit tax overriding the default rate.
    #[serde(default)]
    pub tax: Option<Decimal>,
}

/// Query string for `GET /runs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListRunsQuery {
    /// Only runs of this organization.
    #[serde(default)]
    pub organization_id: Option<Uuid>,
    /// A status name, or `all` for every status.
    #[serde(default)]
    pub status: Option<String>,
}

impl ListRunsQuery {
    /// Converts the query into a store filter.
    ///
    /// Returns an error message for an unknown status name.
    pub fn into_filter(self) -> Result<RunFilter, String> {
        let status = match self.status.as_deref() {
            None | Some("") | Some("all") => None,
            Some(name) => Some(name.parse::<RunStatus>()?),
        };
        Ok(RunFilter {
            organization_id: self.organization_id,
            status,
        })
    }
}

impl From<CreateRunRequest> for NewPayrollRun {
    fn from(req: CreateRunRequest) -> Self {
        NewPayrollRun {
            organization_id: req.organization_id,
            user_id: req.user_id,
            period_start: req.period_start,
            period_end: req.period_end,
        }
    }
}

impl From<AddItemRequest> for NewRunItem {
    fn from(req: AddItemRequest) -> Self {
        NewRunItem {
            employee_id: req.employee_id,
            employee_name: req.employee_name,
            basic_pay: req.basic_pay,
            allowances: req.allowances,
            deductions: req.deductions,
            tax: req.tax,
        }
    }
}

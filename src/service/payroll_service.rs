//! Payroll run lifecycle and aggregation.
//!
//! [`PayrollService`] is the only writer of run status and run totals. Every
//! item mutation is followed by a full recomputation of the run's totals
//! before the caller sees success.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{
    ItemAmounts, checked_add_totals, compute_item, export_file_name, export_run_csv, sum_totals,
};
use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    NewPayrollRun, NewRunItem, PayrollRun, PayrollRunItem, RunFilter, RunStatus, RunTotals,
    RunWithItems,
};
use crate::store::{ItemRecord, PayrollStore};

/// A rendered CSV export of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunExport {
    /// Suggested download file name.
    pub file_name: String,
    /// CSV text.
    pub content: String,
}

/// Manages payroll runs over a [`PayrollStore`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use payroll_engine::config::PayrollConfig;
/// use payroll_engine::models::{NewPayrollRun, NewRunItem, RunStatus};
/// use payroll_engine::service::PayrollService;
/// use payroll_engine::store::InMemoryStore;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let service = PayrollService::new(Arc::new(InMemoryStore::new()), PayrollConfig::default());
/// let run = service
///     .create_run(NewPayrollRun {
///         organization_id: None,
///         user_id: None,
///         period_start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///         period_end: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
///     })
///     .await
///     .unwrap();
///
/// service
///     .add_employee_to_run(run.id, NewRunItem::new("E1", Decimal::new(1000, 0)))
///     .await
///     .unwrap();
///
/// let run = service.finalize_run(run.id).await.unwrap();
/// assert_eq!(run.status, RunStatus::Completed);
/// assert_eq!(run.totals.total_tax, Decimal::new(160, 0));
/// # });
/// ```
#[derive(Clone)]
pub struct PayrollService {
    store: Arc<dyn PayrollStore>,
    config: PayrollConfig,
}

impl PayrollService {
    /// Creates a service over `store` using `config`'s tax and item policy.
    pub fn new(store: Arc<dyn PayrollStore>, config: PayrollConfig) -> Self {
        Self { store, config }
    }

    /// Creates a `draft` run with zero totals.
    ///
    /// The period is stored as given; `period_end` is not checked against
    /// `period_start`.
    pub async fn create_run(&self, run: NewPayrollRun) -> EngineResult<PayrollRun> {
        let run = self.store.insert_run(run).await?;
        info!(
            run_id = %run.id,
            organization_id = ?run.organization_id,
            period_start = %run.period_start,
            period_end = %run.period_end,
            "Payroll run created"
        );
        Ok(run)
    }

    /// Lists runs matching `filter`, newest first.
    pub async fn list_runs(&self, filter: &RunFilter) -> EngineResult<Vec<PayrollRun>> {
        let runs = self.store.list_runs(filter).await?;
        debug!(count = runs.len(), "Listed payroll runs");
        Ok(runs)
    }

    /// Fetches a run and all of its items, oldest item first.
    pub async fn get_run(&self, run_id: Uuid) -> EngineResult<RunWithItems> {
        let run = self.store.get_run(run_id).await?;
        let items = self.store.list_items(run_id).await?;
        debug!(run_id = %run_id, items = items.len(), "Loaded payroll run");
        Ok(RunWithItems { run, items })
    }

    /// Computes tax and net pay for `item` under the configured policy
    /// without persisting anything.
    pub fn compute(&self, item: &NewRunItem) -> EngineResult<ItemAmounts> {
        compute_item(
            item.basic_pay,
            item.allowances,
            item.deductions,
            item.tax,
            self.config.tax_rate(),
        )
    }

    /// Adds one employee's line item to a run and recomputes the run totals.
    ///
    /// Amounts that overflow, on their own or in the run totals, are rejected
    /// with `AmountOutOfRange` before anything is stored. If the
    /// recomputation fails the item stays persisted and the run totals are
    /// stale until the next successful recomputation; the error is still
    /// returned.
    pub async fn add_employee_to_run(
        &self,
        run_id: Uuid,
        item: NewRunItem,
    ) -> EngineResult<PayrollRunItem> {
        self.store.get_run(run_id).await?;
        let existing = self.store.list_items(run_id).await?;

        if !self.config.allow_duplicate_employees()
            && existing.iter().any(|i| i.employee_id == item.employee_id)
        {
            warn!(
                run_id = %run_id,
                employee_id = %item.employee_id,
                "Rejected duplicate employee"
            );
            return Err(EngineError::DuplicateEmployee {
                run_id,
                employee_id: item.employee_id,
            });
        }

        let amounts = self.compute(&item)?;
        let record = ItemRecord {
            run_id,
            employee_id: item.employee_id,
            employee_name: item.employee_name,
            basic_pay: item.basic_pay,
            allowances: item.allowances.unwrap_or_default(),
            deductions: item.deductions.unwrap_or_default(),
            tax: amounts.tax,
            net_pay: amounts.net_pay,
        };

        let contribution = RunTotals {
            gross_pay: record.basic_pay,
            total_allowances: record.allowances,
            total_deductions: record.deductions,
            total_tax: record.tax,
            net_pay: record.net_pay,
        };
        if let Err(err) = checked_add_totals(&sum_totals(&existing)?, &contribution) {
            warn!(
                run_id = %run_id,
                employee_id = %record.employee_id,
                error = %err,
                "Rejected item that would overflow run totals"
            );
            return Err(err);
        }

        let stored = self.store.insert_item(record).await?;
        info!(
            run_id = %run_id,
            item_id = %stored.id,
            employee_id = %stored.employee_id,
            tax = %stored.tax,
            net_pay = %stored.net_pay,
            "Employee added to payroll run"
        );

        self.recompute_after_mutation(run_id).await?;
        Ok(stored)
    }

    /// Removes a line item from a run and recomputes the run totals.
    ///
    /// Fails with `ItemNotFound` if the item does not belong to the run.
    pub async fn remove_item_from_run(&self, run_id: Uuid, item_id: Uuid) -> EngineResult<()> {
        self.store.delete_item(run_id, item_id).await?;
        info!(run_id = %run_id, item_id = %item_id, "Item removed from payroll run");

        self.recompute_after_mutation(run_id).await?;
        Ok(())
    }

    /// Re-derives the five run totals from every item in the run and writes
    /// them onto the run, overwriting the previous values.
    pub async fn recompute_run_totals(&self, run_id: Uuid) -> EngineResult<PayrollRun> {
        let items = self.store.list_items(run_id).await?;
        let totals = sum_totals(&items)?;
        let run = self.store.update_run_totals(run_id, totals).await?;
        debug!(
            run_id = %run_id,
            items = items.len(),
            gross_pay = %totals.gross_pay,
            net_pay = %totals.net_pay,
            "Run totals recomputed"
        );
        Ok(run)
    }

    /// Moves a `draft` run to `processing`.
    pub async fn begin_processing(&self, run_id: Uuid) -> EngineResult<PayrollRun> {
        let run = self.store.get_run(run_id).await?;
        if run.status != RunStatus::Draft {
            return Err(self.reject(run_id, run.status, RunStatus::Processing));
        }
        self.set_status(run_id, RunStatus::Processing).await
    }

    /// Recomputes the totals and marks the run `completed`.
    ///
    /// Finalizing an already completed run recomputes again. Cancelled runs
    /// cannot be finalized.
    pub async fn finalize_run(&self, run_id: Uuid) -> EngineResult<PayrollRun> {
        let run = self.store.get_run(run_id).await?;
        if run.status == RunStatus::Cancelled {
            return Err(self.reject(run_id, run.status, RunStatus::Completed));
        }

        self.recompute_run_totals(run_id).await?;
        self.set_status(run_id, RunStatus::Completed).await
    }

    /// Marks the run `cancelled`, leaving its totals untouched.
    ///
    /// Completed runs cannot be cancelled; cancelling twice is a no-op.
    pub async fn cancel_run(&self, run_id: Uuid) -> EngineResult<PayrollRun> {
        let run = self.store.get_run(run_id).await?;
        if run.status == RunStatus::Completed {
            return Err(self.reject(run_id, run.status, RunStatus::Cancelled));
        }
        self.set_status(run_id, RunStatus::Cancelled).await
    }

    /// Renders the run and its items as CSV.
    pub async fn export_run(&self, run_id: Uuid) -> EngineResult<RunExport> {
        let RunWithItems { run, items } = self.get_run(run_id).await?;
        Ok(RunExport {
            file_name: export_file_name(&run),
            content: export_run_csv(&run, &items),
        })
    }

    async fn recompute_after_mutation(&self, run_id: Uuid) -> EngineResult<()> {
        if let Err(err) = self.recompute_run_totals(run_id).await {
            warn!(
                run_id = %run_id,
                error = %err,
                "Item change persisted but run totals are stale"
            );
            return Err(err);
        }
        Ok(())
    }

    async fn set_status(&self, run_id: Uuid, status: RunStatus) -> EngineResult<PayrollRun> {
        let run = self.store.update_run_status(run_id, status).await?;
        info!(run_id = %run_id, status = %status, "Payroll run status changed");
        Ok(run)
    }

    fn reject(&self, run_id: Uuid, from: RunStatus, to: RunStatus) -> EngineError {
        warn!(run_id = %run_id, from = %from, to = %to, "Rejected status transition");
        EngineError::InvalidTransition { run_id, from, to }
    }
}

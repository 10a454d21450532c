//! In-process [`PayrollStore`] backed by vectors behind an async lock.
//!
//! Used by tests and by hosts that do not need durability. Individual
//! operations can be made to fail once via [`InMemoryStore::fail_next`] to
//! exercise partial-failure paths.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    NewPayrollRun, PayrollRun, PayrollRunItem, RunFilter, RunStatus, RunTotals,
};

use super::{ItemRecord, PayrollStore};

/// A store operation that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreFault {
    /// [`PayrollStore::insert_run`]
    InsertRun,
    /// [`PayrollStore::get_run`]
    GetRun,
    /// [`PayrollStore::list_runs`]
    ListRuns,
    /// [`PayrollStore::update_run_totals`]
    UpdateTotals,
    /// [`PayrollStore::update_run_status`]
    UpdateStatus,
    /// [`PayrollStore::insert_item`]
    InsertItem,
    /// [`PayrollStore::delete_item`]
    DeleteItem,
    /// [`PayrollStore::list_items`]
    ListItems,
}

#[derive(Default)]
struct Tables {
    runs: Vec<PayrollRun>,
    items: Vec<PayrollRunItem>,
}

impl Tables {
    fn run_mut(&mut self, run_id: Uuid) -> EngineResult<&mut PayrollRun> {
        self.runs
            .iter_mut()
            .find(|r| r.id == run_id)
            .ok_or(EngineError::RunNotFound { run_id })
    }
}

/// A non-durable store holding runs and items in memory.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    faults: Mutex<HashSet<StoreFault>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next call of `fault`'s operation fail with a storage error.
    pub async fn fail_next(&self, fault: StoreFault) {
        self.faults.lock().await.insert(fault);
    }

    /// Clears any pending injected failures.
    pub async fn clear_faults(&self) {
        self.faults.lock().await.clear();
    }

    /// Overwrites a run's totals without going through the aggregator.
    ///
    /// Lets tests put a run into a stale state.
    pub async fn force_totals(&self, run_id: Uuid, totals: RunTotals) -> EngineResult<()> {
        let mut tables = self.tables.write().await;
        tables.run_mut(run_id)?.totals = totals;
        Ok(())
    }

    async fn check_fault(&self, fault: StoreFault) -> EngineResult<()> {
        if self.faults.lock().await.remove(&fault) {
            return Err(EngineError::Storage {
                message: format!("injected failure in {:?}", fault),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PayrollStore for InMemoryStore {
    async fn insert_run(&self, run: NewPayrollRun) -> EngineResult<PayrollRun> {
        self.check_fault(StoreFault::InsertRun).await?;

        let record = PayrollRun {
            id: Uuid::new_v4(),
            organization_id: run.organization_id,
            user_id: run.user_id,
            period_start: run.period_start,
            period_end: run.period_end,
            status: RunStatus::Draft,
            totals: RunTotals::ZERO,
            created_at: Utc::now(),
        };
        self.tables.write().await.runs.push(record.clone());
        Ok(record)
    }

    async fn get_run(&self, run_id: Uuid) -> EngineResult<PayrollRun> {
        self.check_fault(StoreFault::GetRun).await?;

        self.tables
            .read()
            .await
            .runs
            .iter()
            .find(|r| r.id == run_id)
            .cloned()
            .ok_or(EngineError::RunNotFound { run_id })
    }

    async fn list_runs(&self, filter: &RunFilter) -> EngineResult<Vec<PayrollRun>> {
        self.check_fault(StoreFault::ListRuns).await?;

        // Reverse insertion order first so equal timestamps still list newest first
        let mut runs: Vec<PayrollRun> = self
            .tables
            .read()
            .await
            .runs
            .iter()
            .rev()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        runs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(runs)
    }

    async fn update_run_totals(
        &self,
        run_id: Uuid,
        totals: RunTotals,
    ) -> EngineResult<PayrollRun> {
        self.check_fault(StoreFault::UpdateTotals).await?;

        let mut tables = self.tables.write().await;
        let run = tables.run_mut(run_id)?;
        run.totals = totals;
        Ok(run.clone())
    }

    async fn update_run_status(
        &self,
        run_id: Uuid,
        status: RunStatus,
    ) -> EngineResult<PayrollRun> {
        self.check_fault(StoreFault::UpdateStatus).await?;

        let mut tables = self.tables.write().await;
        let run = tables.run_mut(run_id)?;
        run.status = status;
        Ok(run.clone())
    }

    async fn insert_item(&self, item: ItemRecord) -> EngineResult<PayrollRunItem> {
        self.check_fault(StoreFault::InsertItem).await?;

        let mut tables = self.tables.write().await;
        // Foreign key to the run
        tables.run_mut(item.run_id)?;

        let record = PayrollRunItem {
            id: Uuid::new_v4(),
            run_id: item.run_id,
            employee_id: item.employee_id,
            employee_name: item.employee_name,
            basic_pay: item.basic_pay,
            allowances: item.allowances,
            deductions: item.deductions,
            tax: item.tax,
            net_pay: item.net_pay,
            created_at: Utc::now(),
        };
        tables.items.push(record.clone());
        Ok(record)
    }

    async fn delete_item(&self, run_id: Uuid, item_id: Uuid) -> EngineResult<()> {
        self.check_fault(StoreFault::DeleteItem).await?;

        let mut tables = self.tables.write().await;
        let position = tables
            .items
            .iter()
            .position(|i| i.id == item_id && i.run_id == run_id)
            .ok_or(EngineError::ItemNotFound { item_id })?;
        tables.items.remove(position);
        Ok(())
    }

    async fn list_items(&self, run_id: Uuid) -> EngineResult<Vec<PayrollRunItem>> {
        self.check_fault(StoreFault::ListItems).await?;

        let mut items: Vec<PayrollRunItem> = self
            .tables
            .read()
            .await
            .items
            .iter()
            .filter(|i| i.run_id == run_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(items)
    }
}

//! Persistence contract for payroll runs and their line items.
//!
//! The engine talks to storage only through [`PayrollStore`]. Every method is
//! a single round trip that either fully succeeds or fully fails; nothing
//! spans two calls, so callers must not assume atomicity across them.

mod memory;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{NewPayrollRun, PayrollRun, PayrollRunItem, RunFilter, RunStatus, RunTotals};

pub use memory::{InMemoryStore, StoreFault};

/// A fully computed line item ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    /// The run the item belongs to.
    pub run_id: Uuid,
    /// Reference to the employee record.
    pub employee_id: String,
    /// Cached employee display name.
    pub employee_name: Option<String>,
    /// Basic pay.
    pub basic_pay: Decimal,
    /// Allowances.
    pub allowances: Decimal,
    /// Deductions.
    pub deductions: Decimal,
    /// Tax withheld.
    pub tax: Decimal,
    /// Net pay.
    pub net_pay: Decimal,
}

/// Relational storage for runs and items.
///
/// Implementations assign ids and creation timestamps on insert.
#[async_trait]
pub trait PayrollStore: Send + Sync {
    /// Inserts a run in `draft` status with zero totals.
    async fn insert_run(&self, run: NewPayrollRun) -> EngineResult<PayrollRun>;

    /// Fetches one run, or `RunNotFound`.
    async fn get_run(&self, run_id: Uuid) -> EngineResult<PayrollRun>;

    /// Lists runs matching `filter`, newest first.
    async fn list_runs(&self, filter: &RunFilter) -> EngineResult<Vec<PayrollRun>>;

    /// Overwrites the five aggregates of a run and returns the updated run.
    async fn update_run_totals(&self, run_id: Uuid, totals: RunTotals)
    -> EngineResult<PayrollRun>;

    /// Overwrites the status of a run and returns the updated run.
    async fn update_run_status(&self, run_id: Uuid, status: RunStatus)
    -> EngineResult<PayrollRun>;

    /// Inserts a line item and returns the stored record.
    async fn insert_item(&self, item: ItemRecord) -> EngineResult<PayrollRunItem>;

    /// Deletes the item with `item_id` from run `run_id`, or `ItemNotFound`.
    async fn delete_item(&self, run_id: Uuid, item_id: Uuid) -> EngineResult<()>;

    /// Lists every item of a run, oldest first. Never paginated.
    async fn list_items(&self, run_id: Uuid) -> EngineResult<Vec<PayrollRunItem>>;
}

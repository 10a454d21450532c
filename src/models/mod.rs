//! Core data models for the Payroll Engine.
//!
//! This module contains the run and line item records shared by the
//! calculator, the store and the service layer.

mod payroll_run;
mod run_item;

pub use payroll_run::{NewPayrollRun, PayrollRun, RunFilter, RunStatus, RunTotals, RunWithItems};
pub use run_item::{NewRunItem, PayrollRunItem};

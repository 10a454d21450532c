//! Payroll run orchestration.
//!
//! This module ties the calculator, the aggregator and the store together
//! behind [`PayrollService`].

mod payroll_service;

pub use payroll_service::{PayrollService, RunExport};

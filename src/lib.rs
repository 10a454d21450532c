//! Payroll Run Engine
//!
//! This crate computes per-employee tax and net pay, keeps payroll run totals
//! consistent with their line items, drives the run lifecycle from draft to
//! completion, and exports runs as CSV.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;

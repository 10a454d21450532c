//! Error types for the Payroll Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while managing payroll runs.

use thiserror::Error;
use uuid::Uuid;

use crate::models::RunStatus;

/// The main error type for the Payroll Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/payroll.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/payroll.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds a value the engine cannot use.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// No payroll run exists with the given id.
    #[error("Payroll run not found: {run_id}")]
    RunNotFound {
        /// The id that was looked up.
        run_id: Uuid,
    },

    /// No line item with the given id exists in the targeted run.
    #[error("Payroll run item not found: {item_id}")]
    ItemNotFound {
        /// The id that was looked up.
        item_id: Uuid,
    },

    /// The employee already has a line item in this run and duplicates are disabled.
    #[error("Employee '{employee_id}' already has a line item in run {run_id}")]
    DuplicateEmployee {
        /// The run being edited.
        run_id: Uuid,
        /// The employee that was added twice.
        employee_id: String,
    },

    /// The requested status change leaves a terminal state or is otherwise not allowed.
    #[error("Cannot move payroll run {run_id} from {from} to {to}")]
    InvalidTransition {
        /// The run whose status was being changed.
        run_id: Uuid,
        /// The current status.
        from: RunStatus,
        /// The requested status.
        to: RunStatus,
    },

    /// A monetary amount or one derived from it does not fit in a decimal.
    #[error("Amount out of range: {field}")]
    AmountOutOfRange {
        /// The amount that could not be computed.
        field: String,
    },

    /// The persistent store rejected or failed a read or write.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

//! Configuration loading and management for the Payroll Engine.
//!
//! This module loads the payroll policy (default tax rate, duplicate employee
//! handling) from a YAML file.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Default tax rate: {}", config.config().tax_rate());
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_FILE_NAME, ConfigLoader};
pub use types::{ItemsConfig, PayrollConfig, TaxConfig};

//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from `payroll.yaml`.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::calculation::default_tax_rate;

/// Tax policy settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaxConfig {
    /// Flat withholding rate applied when a line item has no explicit tax.
    #[serde(default = "default_tax_rate")]
    pub default_rate: Decimal,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            default_rate: default_tax_rate(),
        }
    }
}

/// Line item settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemsConfig {
    /// Whether one employee may hold more than one line item in the same run,
    /// e.g. for supplementary pay.
    #[serde(default = "default_allow_duplicates")]
    pub allow_duplicate_employees: bool,
}

fn default_allow_duplicates() -> bool {
    true
}

impl Default for ItemsConfig {
    fn default() -> Self {
        Self {
            allow_duplicate_employees: default_allow_duplicates(),
        }
    }
}

/// The complete payroll configuration.
///
/// Every section may be omitted from the YAML, in which case its defaults
/// apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PayrollConfig {
    /// Tax policy.
    #[serde(default)]
    pub tax: TaxConfig,
    /// Line item policy.
    #[serde(default)]
    pub items: ItemsConfig,
}

impl PayrollConfig {
    /// Returns the flat withholding rate.
    pub fn tax_rate(&self) -> Decimal {
        self.tax.default_rate
    }

    /// Returns whether duplicate employees are allowed within one run.
    pub fn allow_duplicate_employees(&self) -> bool {
        self.items.allow_duplicate_employees
    }
}

//! Payroll run line item models.
//!
//! A [`PayrollRunItem`] is one employee's pay inside a run. Items are only ever
//! created and deleted; their derived `tax` and `net_pay` are fixed at creation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One employee's line item within a payroll run.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollRunItem;
/// use chrono::Utc;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let item = PayrollRunItem {
///     id: Uuid::new_v4(),
///     run_id: Uuid::new_v4(),
///     employee_id: "E1".to_string(),
///     employee_name: Some("Jane Doe".to_string()),
///     basic_pay: Decimal::new(50000, 0),
///     allowances: Decimal::new(5000, 0),
///     deductions: Decimal::new(2000, 0),
///     tax: Decimal::new(8800, 0),
///     net_pay: Decimal::new(44200, 0),
///     created_at: Utc::now(),
/// };
/// assert_eq!(item.basic_pay + item.allowances - item.deductions - item.tax, item.net_pay);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRunItem {
    /// Unique identifier of the item.
    pub id: Uuid,
    /// The run this item belongs to.
    pub run_id: Uuid,
    /// Reference to the employee record.
    pub employee_id: String,
    /// Display name cached at the time the item was added.
    pub employee_name: Option<String>,
    /// Basic pay for the period.
    pub basic_pay: Decimal,
    /// Allowances paid on top of basic pay.
    pub allowances: Decimal,
    /// Deductions withheld.
    pub deductions: Decimal,
    /// Tax withheld.
    pub tax: Decimal,
    /// Net pay. May be negative when deductions and tax exceed gross.
    pub net_pay: Decimal,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
}

/// Caller input for adding an employee to a run.
///
/// Absent allowances and deductions count as zero. When `tax` is absent the
/// configured default rate is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRunItem {
    /// Reference to the employee record.
    pub employee_id: String,
    /// Display name to cache on the item.
    #[serde(default)]
    pub employee_name: Option<String>,
    /// Basic pay for the period.
    pub basic_pay: Decimal,
    /// Allowances paid on top of basic pay.
    #[serde(default)]
    pub allowances: Option<Decimal>,
    /// Deductions withheld.
    #[serde(default)]
    pub deductions: Option<Decimal>,
    /// Explicit tax, overriding the default policy.
    #[serde(default)]
    pub tax: Option<Decimal>,
}

impl NewRunItem {
    /// Creates an input with only the employee and basic pay set.
    pub fn new(employee_id: impl Into<String>, basic_pay: Decimal) -> Self {
        Self {
            employee_id: employee_id.into(),
            employee_name: None,
            basic_pay,
            allowances: None,
            deductions: None,
            tax: None,
        }
    }

    /// Sets the cached employee display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.employee_name = Some(name.into());
        self
    }

    /// Sets the allowances amount.
    pub fn with_allowances(mut self, allowances: Decimal) -> Self {
        self.allowances = Some(allowances);
        self
    }

    /// Sets the deductions amount.
    pub fn with_deductions(mut self, deductions: Decimal) -> Self {
        self.deductions = Some(deductions);
        self
    }

    /// Sets an explicit tax amount.
    pub fn with_tax(mut self, tax: Decimal) -> Self {
        self.tax = Some(tax);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_deserialize_new_item_with_only_required_fields() {
        let json = r#"{ "employee_id": "E7", "basic_pay": "1200.50" }"#;
        let item: NewRunItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.employee_id, "E7");
        assert_eq!(item.basic_pay, dec("1200.50"));
        assert_eq!(item.allowances, None);
        assert_eq!(item.deductions, None);
        assert_eq!(item.tax, None);
        assert_eq!(item.employee_name, None);
    }

    #[test]
    fn test_builder_sets_optional_fields() {
        let item = NewRunItem::new("E1", dec("1000"))
            .with_name("Jane Doe")
            .with_allowances(dec("10"))
            .with_deductions(dec("5"))
            .with_tax(dec("200"));

        assert_eq!(item.employee_name.as_deref(), Some("Jane Doe"));
        assert_eq!(item.allowances, Some(dec("10")));
        assert_eq!(item.deductions, Some(dec("5")));
        assert_eq!(item.tax, Some(dec("200")));
    }

    #[test]
    fn test_item_serializes_money_as_strings() {
        let item = PayrollRunItem {
            id: Uuid::nil(),
            run_id: Uuid::nil(),
            employee_id: "E1".to_string(),
            employee_name: None,
            basic_pay: dec("1000.00"),
            allowances: dec("0"),
            deductions: dec("900.00"),
            tax: dec("200.00"),
            net_pay: dec("-100.00"),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["net_pay"], "-100.00");
        assert_eq!(json["basic_pay"], "1000.00");
        assert!(json["employee_name"].is_null());
    }
}

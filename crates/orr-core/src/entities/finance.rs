use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ExpenseField, TransactionKind};

pub const DEFAULT_CATEGORY_ICON: &str = "💰";
pub const DEFAULT_CATEGORY_COLOR: &str = "#37a749";

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FinanceCategory {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub kind: TransactionKind,
    pub icon: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// A single income or expense. `amount` is always positive; `kind` carries
/// the direction.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub category_id: Option<String>,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub description: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Monthly spending cap for one expense category.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Budget {
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub amount: Decimal,
    /// Always the first day of the month.
    pub month: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ResearchExpense {
    pub id: String,
    pub user_id: String,
    pub field: ExpenseField,
    pub title: String,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub vendor: String,
    pub invoice_number: String,
    pub created_at: DateTime<Utc>,
}

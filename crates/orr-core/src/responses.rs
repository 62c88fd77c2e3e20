//! Response bodies shared by the database layer and the HTTP handlers.
//!
//! Handler-local shapes (a single list page, a detail view) live next to
//! their handlers; the aggregates here are assembled by `orr-db` and
//! serialized unchanged by `orr-web`.

use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{
    AstroResearchProject, FinanceCategory, ResearchExpense, ResearchProject, Transaction,
};
use crate::finance::{BudgetReport, CategorySlice, Totals, WeekTotals};

/// A `(value, label)` pair for filter dropdowns.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

impl ChoiceOption {
    #[must_use]
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// One bar or slice of a count chart.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CountPoint {
    pub key: String,
    pub label: String,
    pub count: i64,
    pub color: Option<String>,
}

/// Body of `GET /research/`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ResearchDashboard {
    pub total_projects: i64,
    pub active_projects: i64,
    pub completed_projects: i64,
    pub planning_projects: i64,
    /// Most common field first.
    pub by_field: Vec<CountPoint>,
    /// Ordered by status key.
    pub by_status: Vec<CountPoint>,
    pub recent_general: Vec<ResearchProject>,
    pub recent_astro: Vec<AstroResearchProject>,
    pub high_priority: Vec<ResearchProject>,
    /// Mean progress of active general projects, one decimal place.
    pub avg_progress: f64,
}

/// Body of `GET /research/projects/`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ResearchProjectList {
    pub projects: Vec<ResearchProject>,
    pub total_count: i64,
    pub active_count: i64,
    pub completed_count: i64,
}

/// Body of `GET /finance/`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FinanceDashboard {
    /// `YYYY-MM`.
    pub month: String,
    pub income_total: Decimal,
    pub expense_total: Decimal,
    pub balance: Decimal,
    pub recent_transactions: Vec<Transaction>,
    pub weeks: Vec<WeekTotals>,
    pub categories: Vec<CategorySlice>,
}

impl FinanceDashboard {
    #[must_use]
    pub fn new(
        month: String,
        totals: Totals,
        recent_transactions: Vec<Transaction>,
        weeks: Vec<WeekTotals>,
        categories: Vec<CategorySlice>,
    ) -> Self {
        Self {
            month,
            income_total: totals.income,
            expense_total: totals.expense,
            balance: totals.balance,
            recent_transactions,
            weeks,
            categories,
        }
    }
}

/// Body of `GET /finance/transactions/`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TransactionList {
    pub transactions: Vec<Transaction>,
    pub categories: Vec<FinanceCategory>,
    pub income_total: Decimal,
    pub expense_total: Decimal,
}

/// Body of `GET /finance/budgets/`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BudgetList {
    pub month: String,
    pub budgets: Vec<BudgetReport>,
    pub categories: Vec<FinanceCategory>,
}

/// Body of `GET /finance/research/`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ResearchExpenseList {
    pub field: String,
    pub field_label: String,
    pub expenses: Vec<ResearchExpense>,
    pub total_spent: Decimal,
    pub research_fields: Vec<ChoiceOption>,
}

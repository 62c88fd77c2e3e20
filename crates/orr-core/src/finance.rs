//! Month parsing, weekly buckets, category breakdowns, and budget maths.
//!
//! Everything here is pure: callers load the month's transactions and hand
//! them in, so the same code backs the dashboard and the tests.

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Budget, FinanceCategory, Transaction};
use crate::enums::TransactionKind;

/// Label used for expenses whose category was deleted or never set.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Maximum number of weekly buckets in a month.
pub const MAX_WEEKS: usize = 5;

/// Parse `YYYY-MM` into the first day of that month.
#[must_use]
pub fn parse_month(raw: &str) -> Option<NaiveDate> {
    let (year, month) = raw.trim().split_once('-')?;
    if year.len() != 4 || month.is_empty() || month.len() > 2 {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

/// First day of the month containing `date`.
#[must_use]
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`.
#[must_use]
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let first = month_start(date);
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    next.and_then(|n| n.pred_opt()).unwrap_or(first)
}

/// Format a month as `YYYY-MM`.
#[must_use]
pub fn format_month(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// A seven-day window inside a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WeekBucket {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Split a month into at most five seven-day windows starting on day 1.
///
/// The last window is clamped to the month end, so a 31-day month ends with
/// a three-day "Week 5".
#[must_use]
pub fn weekly_buckets(month: NaiveDate) -> Vec<WeekBucket> {
    let first = month_start(month);
    let last = month_end(month);
    let mut buckets = Vec::with_capacity(MAX_WEEKS);

    for index in 0..MAX_WEEKS {
        let start = first + Duration::days(7 * i64::try_from(index).unwrap_or(0));
        if start > last {
            break;
        }
        let end = (start + Duration::days(6)).min(last);
        buckets.push(WeekBucket {
            label: format!("Week {}", index + 1),
            start,
            end,
        });
    }

    buckets
}

/// Income and expense sums for one weekly bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WeekTotals {
    pub week: String,
    pub income: Decimal,
    pub expense: Decimal,
}

/// Sum `transactions` into the weekly buckets of `month`.
#[must_use]
pub fn weekly_totals(month: NaiveDate, transactions: &[Transaction]) -> Vec<WeekTotals> {
    weekly_buckets(month)
        .into_iter()
        .map(|bucket| {
            let in_bucket = transactions
                .iter()
                .filter(|t| t.date >= bucket.start && t.date <= bucket.end);
            let mut income = Decimal::ZERO;
            let mut expense = Decimal::ZERO;
            for t in in_bucket {
                match t.kind {
                    TransactionKind::Income => income += t.amount,
                    TransactionKind::Expense => expense += t.amount,
                }
            }
            WeekTotals {
                week: bucket.label,
                income,
                expense,
            }
        })
        .collect()
}

/// Income, expense, and balance over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

#[must_use]
pub fn totals(transactions: &[Transaction]) -> Totals {
    let mut out = Totals::default();
    for t in transactions {
        match t.kind {
            TransactionKind::Income => out.income += t.amount,
            TransactionKind::Expense => out.expense += t.amount,
        }
    }
    out.balance = out.income - out.expense;
    out
}

/// One slice of the expense-by-category chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CategorySlice {
    pub name: String,
    pub value: Decimal,
    pub color: String,
}

/// Group expense transactions by category, in order of first appearance.
///
/// Transactions pointing at a category not in `categories` fall into the
/// uncategorized slice.
#[must_use]
pub fn category_breakdown(
    transactions: &[Transaction],
    categories: &[FinanceCategory],
) -> Vec<CategorySlice> {
    let mut slices: Vec<(Option<&str>, CategorySlice)> = Vec::new();

    for t in transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense)
    {
        let category = t
            .category_id
            .as_deref()
            .and_then(|id| categories.iter().find(|c| c.id == id));
        let key = category.map(|c| c.id.as_str());

        if let Some((_, slice)) = slices.iter_mut().find(|(k, _)| *k == key) {
            slice.value += t.amount;
        } else {
            slices.push((
                key,
                CategorySlice {
                    name: category.map_or_else(|| UNCATEGORIZED.to_string(), |c| c.name.clone()),
                    value: t.amount,
                    color: category.map_or_else(
                        || crate::entities::DEFAULT_CATEGORY_COLOR.to_string(),
                        |c| c.color.clone(),
                    ),
                },
            ));
        }
    }

    slices.into_iter().map(|(_, slice)| slice).collect()
}

/// `spent / amount * 100`, or zero when the budget amount is not positive.
#[must_use]
pub fn budget_percentage(spent: Decimal, amount: Decimal) -> Decimal {
    if amount > Decimal::ZERO {
        spent / amount * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

/// A budget together with how much of it has been used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BudgetReport {
    pub budget: Budget,
    pub category_name: String,
    pub spent: Decimal,
    /// Unclamped share of the budget used, two decimal places.
    pub percentage: Decimal,
    /// `percentage` capped at 100 for progress bars.
    pub clamped_percentage: Decimal,
    /// Never negative.
    pub remaining: Decimal,
    pub is_over: bool,
}

impl BudgetReport {
    #[must_use]
    pub fn new(budget: Budget, category_name: String, spent: Decimal) -> Self {
        let percentage = budget_percentage(spent, budget.amount).round_dp(2);
        Self {
            clamped_percentage: percentage.min(Decimal::ONE_HUNDRED),
            remaining: (budget.amount - spent).max(Decimal::ZERO),
            is_over: spent > budget.amount,
            category_name,
            spent,
            percentage,
            budget,
        }
    }
}

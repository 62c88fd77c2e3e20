//! Personal finance: categories, transactions, monthly budgets, and
//! research expenses. Every row belongs to one user.
//!
//! Amounts are stored as decimal text, so sums are computed in Rust over the
//! loaded rows rather than with SQL `SUM`.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use orr_core::entities::{
    Budget, DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_ICON, FinanceCategory, ResearchExpense,
    Transaction,
};
use orr_core::enums::{ExpenseField, TransactionKind};
use orr_core::errors::ValidationErrors;
use orr_core::finance::{
    BudgetReport, UNCATEGORIZED, category_breakdown, format_month, month_end, month_start,
    totals, weekly_totals,
};
use orr_core::ids::{PREFIX_BUDGET, PREFIX_EXPENSE, PREFIX_FINANCE_CATEGORY, PREFIX_TRANSACTION};
use orr_core::inputs::{BudgetInput, FinanceCategoryInput, ResearchExpenseInput, TransactionInput};
use orr_core::responses::{
    BudgetList, ChoiceOption, FinanceDashboard, ResearchExpenseList, TransactionList,
};

use crate::error::DatabaseError;
use crate::helpers::{
    WhereBuilder, get_opt_string, nullable, parse_date, parse_datetime, parse_decimal, parse_enum,
    sql_int,
};
use crate::service::OrrService;
use crate::updates::transaction::TransactionUpdate;

const CATEGORY_COLS: &str = "id, user_id, name, kind, icon, color, created_at";
const TRANSACTION_COLS: &str =
    "id, user_id, category_id, amount, kind, description, date, created_at, updated_at";
const BUDGET_COLS: &str = "id, user_id, category_id, amount, month, created_at";
const EXPENSE_COLS: &str = "id, user_id, field, title, description, amount, date, vendor, \
     invoice_number, created_at";
const TRANSACTION_ORDER: &str = " ORDER BY date DESC, created_at DESC";

const RECENT_TRANSACTIONS: u64 = 10;

/// Research field shown when none is requested.
pub const DEFAULT_EXPENSE_FIELD: &str = "ai";

fn row_to_category(row: &libsql::Row) -> Result<FinanceCategory, DatabaseError> {
    Ok(FinanceCategory {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        kind: parse_enum(&row.get::<String>(3)?)?,
        icon: row.get(4)?,
        color: row.get(5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

fn row_to_transaction(row: &libsql::Row) -> Result<Transaction, DatabaseError> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category_id: get_opt_string(row, 2)?,
        amount: parse_decimal(&row.get::<String>(3)?)?,
        kind: parse_enum(&row.get::<String>(4)?)?,
        description: row.get(5)?,
        date: parse_date(&row.get::<String>(6)?)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

fn row_to_budget(row: &libsql::Row) -> Result<Budget, DatabaseError> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category_id: row.get(2)?,
        amount: parse_decimal(&row.get::<String>(3)?)?,
        month: parse_date(&row.get::<String>(4)?)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

fn row_to_expense(row: &libsql::Row) -> Result<ResearchExpense, DatabaseError> {
    Ok(ResearchExpense {
        id: row.get(0)?,
        user_id: row.get(1)?,
        field: parse_enum(&row.get::<String>(2)?)?,
        title: row.get(3)?,
        description: row.get(4)?,
        amount: parse_decimal(&row.get::<String>(5)?)?,
        date: parse_date(&row.get::<String>(6)?)?,
        vendor: row.get(7)?,
        invoice_number: row.get(8)?,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

/// Restrict `filter` to dates inside the month containing `month`.
fn bind_month(filter: &mut WhereBuilder, month: NaiveDate) {
    filter
        .bind("date >= ?", month_start(month).to_string())
        .bind("date <= ?", month_end(month).to_string());
}

/// Transaction list filters as submitted in the query string.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Stored kind value; unknown values match nothing.
    pub kind: Option<String>,
    /// Any day of the month to show.
    pub month: Option<NaiveDate>,
    pub category_id: Option<String>,
}

impl TransactionFilter {
    fn to_where(&self, user_id: &str) -> WhereBuilder {
        let mut filter = WhereBuilder::new();
        filter.bind("user_id = ?", user_id);
        if let Some(ref kind) = self.kind {
            filter.bind("kind = ?", kind.as_str());
        }
        if let Some(month) = self.month {
            bind_month(&mut filter, month);
        }
        if let Some(ref category_id) = self.category_id {
            filter.bind("category_id = ?", category_id.as_str());
        }
        filter
    }
}

fn sum_amounts<'a>(amounts: impl Iterator<Item = &'a Decimal>) -> Decimal {
    amounts.copied().sum()
}

impl OrrService {
    // -- categories ----------------------------------------------------------

    pub async fn create_finance_category(
        &self,
        user_id: &str,
        input: FinanceCategoryInput,
    ) -> Result<FinanceCategory, DatabaseError> {
        input.validate()?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_FINANCE_CATEGORY).await?;
        let icon = input
            .icon
            .filter(|icon| !icon.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY_ICON.to_string());
        let color = input
            .color
            .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string());
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO finance_categories ({CATEGORY_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
                ),
                libsql::params![
                    id.as_str(),
                    user_id,
                    input.name.as_str(),
                    input.kind.as_str(),
                    icon.as_str(),
                    color.as_str(),
                    now.to_rfc3339()
                ],
            )
            .await?;
        tracing::debug!(%id, user_id, name = %input.name, "finance category created");

        Ok(FinanceCategory {
            id,
            user_id: user_id.to_string(),
            name: input.name,
            kind: input.kind,
            icon,
            color,
            created_at: now,
        })
    }

    pub async fn get_finance_category(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<FinanceCategory, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {CATEGORY_COLS} FROM finance_categories WHERE id = ?1 AND user_id = ?2"
                ),
                [id, user_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_category(&row)
    }

    pub async fn list_finance_categories(
        &self,
        user_id: &str,
    ) -> Result<Vec<FinanceCategory>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {CATEGORY_COLS} FROM finance_categories WHERE user_id = ?1 ORDER BY kind, name"
                ),
                [user_id],
            )
            .await?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next().await? {
            categories.push(row_to_category(&row)?);
        }
        Ok(categories)
    }

    /// Map a category lookup miss to a field error on `field`.
    async fn require_own_category(
        &self,
        user_id: &str,
        category_id: &str,
        field: &str,
    ) -> Result<FinanceCategory, DatabaseError> {
        match self.get_finance_category(user_id, category_id).await {
            Err(DatabaseError::NoResult) => Err(ValidationErrors::single(
                field,
                "Select a valid choice. That category is not one of the available choices.",
            )
            .into()),
            other => other,
        }
    }

    // -- transactions --------------------------------------------------------

    pub async fn create_transaction(
        &self,
        user_id: &str,
        mut input: TransactionInput,
        today: NaiveDate,
    ) -> Result<Transaction, DatabaseError> {
        input.validate(today)?;
        if let Some(ref category_id) = input.category_id {
            self.require_own_category(user_id, category_id, "category_id")
                .await?;
        }
        let date = input.date.unwrap_or(today);

        let now = Utc::now().to_rfc3339();
        let id = self.db().generate_id(PREFIX_TRANSACTION).await?;
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO transactions ({TRANSACTION_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)"
                ),
                libsql::params![
                    id.as_str(),
                    user_id,
                    input.category_id.as_deref(),
                    input.amount.to_string(),
                    input.kind.as_str(),
                    input.description.as_str(),
                    date.to_string(),
                    now.as_str()
                ],
            )
            .await?;
        tracing::debug!(%id, user_id, kind = %input.kind, amount = %input.amount, "transaction added");

        self.get_transaction(user_id, &id).await
    }

    pub async fn get_transaction(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Transaction, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {TRANSACTION_COLS} FROM transactions WHERE id = ?1 AND user_id = ?2"
                ),
                [id, user_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_transaction(&row)
    }

    pub async fn update_transaction(
        &self,
        user_id: &str,
        id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction, DatabaseError> {
        let current = self.get_transaction(user_id, id).await?;

        let mut errors = ValidationErrors::new();
        if update.amount.is_some_and(|amount| amount <= Decimal::ZERO) {
            errors.add("amount", "Amount must be greater than 0.");
        }
        if matches!(update.category_id, Some(None)) {
            errors.add("category_id", "Category is required.");
        }
        errors.into_result()?;
        if let Some(Some(ref category_id)) = update.category_id {
            self.require_own_category(user_id, category_id, "category_id")
                .await?;
        }

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(kind) = update.kind {
            sets.push(format!("kind = ?{idx}"));
            params.push(kind.as_str().into());
            idx += 1;
        }
        if let Some(amount) = update.amount {
            sets.push(format!("amount = ?{idx}"));
            params.push(amount.to_string().into());
            idx += 1;
        }
        if let Some(category_id) = update.category_id {
            sets.push(format!("category_id = ?{idx}"));
            params.push(nullable(category_id));
            idx += 1;
        }
        if let Some(date) = update.date {
            sets.push(format!("date = ?{idx}"));
            params.push(date.to_string().into());
            idx += 1;
        }
        if let Some(description) = update.description {
            sets.push(format!("description = ?{idx}"));
            params.push(description.into());
            idx += 1;
        }

        if sets.is_empty() {
            return Ok(current);
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(current.id.clone().into());
        let sql = format!("UPDATE transactions SET {} WHERE id = ?{idx}", sets.join(", "));
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        tracing::debug!(id, user_id, "transaction updated");

        self.get_transaction(user_id, id).await
    }

    pub async fn delete_transaction(&self, user_id: &str, id: &str) -> Result<(), DatabaseError> {
        let affected = self
            .db()
            .conn()
            .execute(
                "DELETE FROM transactions WHERE id = ?1 AND user_id = ?2",
                [id, user_id],
            )
            .await?;
        if affected == 0 {
            return Err(DatabaseError::NoResult);
        }
        tracing::debug!(id, user_id, "transaction deleted");
        Ok(())
    }

    /// Filtered transactions with income and expense totals of the filtered set.
    pub async fn list_transactions(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> Result<TransactionList, DatabaseError> {
        let filter = filter.to_where(user_id);
        let transactions = self
            .query_transactions(
                &format!(
                    "SELECT {TRANSACTION_COLS} FROM transactions{}{TRANSACTION_ORDER}",
                    filter.sql()
                ),
                filter.params(),
            )
            .await?;
        let sums = totals(&transactions);
        Ok(TransactionList {
            transactions,
            categories: self.list_finance_categories(user_id).await?,
            income_total: sums.income,
            expense_total: sums.expense,
        })
    }

    /// Month overview: totals, the latest transactions, weekly bars, and the
    /// expense split by category.
    pub async fn finance_dashboard(
        &self,
        user_id: &str,
        month: NaiveDate,
    ) -> Result<FinanceDashboard, DatabaseError> {
        let mut filter = WhereBuilder::new();
        filter.bind("user_id = ?", user_id);
        bind_month(&mut filter, month);
        let in_month = self
            .query_transactions(
                &format!(
                    "SELECT {TRANSACTION_COLS} FROM transactions{}{TRANSACTION_ORDER}",
                    filter.sql()
                ),
                filter.params(),
            )
            .await?;
        let categories = self.list_finance_categories(user_id).await?;

        let recent = in_month
            .iter()
            .take(usize::try_from(RECENT_TRANSACTIONS).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(FinanceDashboard::new(
            format_month(month),
            totals(&in_month),
            recent,
            weekly_totals(month, &in_month),
            category_breakdown(&in_month, &categories),
        ))
    }

    /// Latest transactions across all months.
    pub async fn recent_transactions(
        &self,
        user_id: &str,
        limit: u64,
    ) -> Result<Vec<Transaction>, DatabaseError> {
        self.query_transactions(
            &format!(
                "SELECT {TRANSACTION_COLS} FROM transactions WHERE user_id = ?1{TRANSACTION_ORDER} LIMIT ?2"
            ),
            vec![user_id.into(), sql_int(limit)],
        )
        .await
    }

    async fn query_transactions(
        &self,
        sql: &str,
        params: Vec<libsql::Value>,
    ) -> Result<Vec<Transaction>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(sql, libsql::params_from_iter(params))
            .await?;
        let mut transactions = Vec::new();
        while let Some(row) = rows.next().await? {
            transactions.push(row_to_transaction(&row)?);
        }
        Ok(transactions)
    }

    // -- budgets -------------------------------------------------------------

    /// Store a monthly budget; a second budget for the same category and
    /// month is a conflict.
    pub async fn create_budget(
        &self,
        user_id: &str,
        input: BudgetInput,
    ) -> Result<Budget, DatabaseError> {
        let month = input.validate()?;
        self.require_own_category(user_id, &input.category_id, "category_id")
            .await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_BUDGET).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO budgets ({BUDGET_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
                libsql::params![
                    id.as_str(),
                    user_id,
                    input.category_id.as_str(),
                    input.amount.to_string(),
                    month.to_string(),
                    now.to_rfc3339()
                ],
            )
            .await
            .map_err(|e| {
                DatabaseError::from_write(e, &format!("budget for {}", format_month(month)))
            })?;
        tracing::debug!(%id, user_id, month = %format_month(month), "budget created");

        Ok(Budget {
            id,
            user_id: user_id.to_string(),
            category_id: input.category_id,
            amount: input.amount,
            month,
            created_at: now,
        })
    }

    /// Budgets of one month with spending against each.
    pub async fn budget_list(&self, user_id: &str, month: NaiveDate) -> Result<BudgetList, DatabaseError> {
        let month = month_start(month);
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {BUDGET_COLS} FROM budgets WHERE user_id = ?1 AND month = ?2 ORDER BY created_at"
                ),
                [user_id.to_string(), month.to_string()],
            )
            .await?;
        let mut budgets = Vec::new();
        while let Some(row) = rows.next().await? {
            budgets.push(row_to_budget(&row)?);
        }

        let categories = self.list_finance_categories(user_id).await?;
        let mut filter = WhereBuilder::new();
        filter
            .bind("user_id = ?", user_id)
            .bind("kind = ?", TransactionKind::Expense.as_str());
        bind_month(&mut filter, month);
        let expenses = self
            .query_transactions(
                &format!("SELECT {TRANSACTION_COLS} FROM transactions{}", filter.sql()),
                filter.params(),
            )
            .await?;

        let reports = budgets
            .into_iter()
            .map(|budget| {
                let spent = sum_amounts(
                    expenses
                        .iter()
                        .filter(|t| t.category_id.as_deref() == Some(budget.category_id.as_str()))
                        .map(|t| &t.amount),
                );
                let name = categories
                    .iter()
                    .find(|c| c.id == budget.category_id)
                    .map_or_else(|| UNCATEGORIZED.to_string(), |c| c.name.clone());
                BudgetReport::new(budget, name, spent)
            })
            .collect();

        Ok(BudgetList {
            month: format_month(month),
            budgets: reports,
            categories,
        })
    }

    // -- research expenses ---------------------------------------------------

    pub async fn create_research_expense(
        &self,
        user_id: &str,
        mut input: ResearchExpenseInput,
        today: NaiveDate,
    ) -> Result<ResearchExpense, DatabaseError> {
        input.validate(today)?;
        let date = input.date.unwrap_or(today);

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_EXPENSE).await?;
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO research_expenses ({EXPENSE_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
                ),
                libsql::params![
                    id.as_str(),
                    user_id,
                    input.field.as_str(),
                    input.title.as_str(),
                    input.description.as_str(),
                    input.amount.to_string(),
                    date.to_string(),
                    input.vendor.as_str(),
                    input.invoice_number.as_str(),
                    now.to_rfc3339()
                ],
            )
            .await?;
        tracing::debug!(%id, user_id, field = %input.field, "research expense recorded");

        Ok(ResearchExpense {
            id,
            user_id: user_id.to_string(),
            field: input.field,
            title: input.title,
            description: input.description,
            amount: input.amount,
            date,
            vendor: input.vendor,
            invoice_number: input.invoice_number,
            created_at: now,
        })
    }

    /// Expenses billed to `field`, newest first, with their total.
    pub async fn research_expense_list(
        &self,
        user_id: &str,
        field: &str,
    ) -> Result<ResearchExpenseList, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {EXPENSE_COLS} FROM research_expenses
                     WHERE user_id = ?1 AND field = ?2 ORDER BY date DESC, created_at DESC"
                ),
                [user_id, field],
            )
            .await?;
        let mut expenses = Vec::new();
        while let Some(row) = rows.next().await? {
            expenses.push(row_to_expense(&row)?);
        }

        let field_label = field
            .parse::<ExpenseField>()
            .map_or_else(|_| field.to_string(), |f| f.label().to_string());
        Ok(ResearchExpenseList {
            field: field.to_string(),
            field_label,
            total_spent: sum_amounts(expenses.iter().map(|e| &e.amount)),
            expenses,
            research_fields: ExpenseField::ALL
                .iter()
                .map(|f| ChoiceOption::new(f.as_str(), f.label()))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::test_support::helpers::{test_service, test_user};
    use crate::updates::transaction::TransactionUpdateBuilder;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn category(name: &str, kind: TransactionKind) -> FinanceCategoryInput {
        FinanceCategoryInput {
            name: name.into(),
            kind,
            icon: None,
            color: None,
        }
    }

    fn txn(kind: TransactionKind, amount: &str, category_id: &str, date: NaiveDate) -> TransactionInput {
        TransactionInput {
            kind,
            amount: dec(amount),
            category_id: Some(category_id.into()),
            date: Some(date),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn category_defaults_icon_and_color() {
        let svc = test_service().await;
        let user = test_user(&svc, "fin").await;
        let food = svc
            .create_finance_category(&user.id, category("Food", TransactionKind::Expense))
            .await
            .unwrap();
        assert_eq!(food.icon, DEFAULT_CATEGORY_ICON);
        assert_eq!(food.color, DEFAULT_CATEGORY_COLOR);
        assert_eq!(svc.list_finance_categories(&user.id).await.unwrap(), vec![food]);
    }

    #[tokio::test]
    async fn transaction_requires_own_category() {
        let svc = test_service().await;
        let owner = test_user(&svc, "owner").await;
        let other = test_user(&svc, "other").await;
        let food = svc
            .create_finance_category(&owner.id, category("Food", TransactionKind::Expense))
            .await
            .unwrap();

        let err = svc
            .create_transaction(
                &other.id,
                txn(TransactionKind::Expense, "10.00", &food.id, d(2025, 3, 1)),
                d(2025, 3, 1),
            )
            .await
            .unwrap_err();
        match err {
            DatabaseError::Validation(errors) => assert!(errors.has("category_id")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transaction_date_defaults_to_today() {
        let svc = test_service().await;
        let user = test_user(&svc, "fin").await;
        let salary = svc
            .create_finance_category(&user.id, category("Salary", TransactionKind::Income))
            .await
            .unwrap();
        let mut input = txn(TransactionKind::Income, "2500.00", &salary.id, d(2025, 1, 1));
        input.date = None;
        let saved = svc
            .create_transaction(&user.id, input, d(2025, 4, 15))
            .await
            .unwrap();
        assert_eq!(saved.date, d(2025, 4, 15));
        assert_eq!(saved.amount, dec("2500.00"));
    }

    #[tokio::test]
    async fn update_and_delete_are_owner_scoped() {
        let svc = test_service().await;
        let user = test_user(&svc, "fin").await;
        let intruder = test_user(&svc, "intruder").await;
        let food = svc
            .create_finance_category(&user.id, category("Food", TransactionKind::Expense))
            .await
            .unwrap();
        let t = svc
            .create_transaction(
                &user.id,
                txn(TransactionKind::Expense, "12.50", &food.id, d(2025, 3, 2)),
                d(2025, 3, 2),
            )
            .await
            .unwrap();

        let update = TransactionUpdateBuilder::new()
            .amount(dec("15.00"))
            .description("Lunch")
            .build();
        assert!(matches!(
            svc.update_transaction(&intruder.id, &t.id, update.clone()).await,
            Err(DatabaseError::NoResult)
        ));
        let updated = svc.update_transaction(&user.id, &t.id, update).await.unwrap();
        assert_eq!(updated.amount, dec("15.00"));
        assert_eq!(updated.description, "Lunch");

        let zero = TransactionUpdateBuilder::new().amount(Decimal::ZERO).build();
        assert!(matches!(
            svc.update_transaction(&user.id, &t.id, zero).await,
            Err(DatabaseError::Validation(_))
        ));

        assert!(matches!(
            svc.delete_transaction(&intruder.id, &t.id).await,
            Err(DatabaseError::NoResult)
        ));
        svc.delete_transaction(&user.id, &t.id).await.unwrap();
        assert!(matches!(
            svc.get_transaction(&user.id, &t.id).await,
            Err(DatabaseError::NoResult)
        ));
    }

    #[tokio::test]
    async fn list_filters_and_totals() {
        let svc = test_service().await;
        let user = test_user(&svc, "fin").await;
        let food = svc
            .create_finance_category(&user.id, category("Food", TransactionKind::Expense))
            .await
            .unwrap();
        let salary = svc
            .create_finance_category(&user.id, category("Salary", TransactionKind::Income))
            .await
            .unwrap();
        let today = d(2025, 3, 31);
        for input in [
            txn(TransactionKind::Income, "3000", &salary.id, d(2025, 3, 1)),
            txn(TransactionKind::Expense, "40.25", &food.id, d(2025, 3, 3)),
            txn(TransactionKind::Expense, "9.75", &food.id, d(2025, 3, 20)),
            txn(TransactionKind::Expense, "100", &food.id, d(2025, 2, 27)),
        ] {
            svc.create_transaction(&user.id, input, today).await.unwrap();
        }

        let march = svc
            .list_transactions(
                &user.id,
                &TransactionFilter {
                    month: Some(d(2025, 3, 1)),
                    ..TransactionFilter::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(march.transactions.len(), 3);
        assert_eq!(march.income_total, dec("3000"));
        assert_eq!(march.expense_total, dec("50.00"));
        assert_eq!(march.transactions[0].date, d(2025, 3, 20));
        assert_eq!(march.categories.len(), 2);

        let expenses = svc
            .list_transactions(
                &user.id,
                &TransactionFilter {
                    kind: Some("expense".into()),
                    ..TransactionFilter::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(expenses.transactions.len(), 3);
        assert_eq!(expenses.income_total, Decimal::ZERO);
    }

    #[tokio::test]
    async fn dashboard_summarizes_month() {
        let svc = test_service().await;
        let user = test_user(&svc, "fin").await;
        let food = svc
            .create_finance_category(&user.id, category("Food", TransactionKind::Expense))
            .await
            .unwrap();
        let salary = svc
            .create_finance_category(&user.id, category("Salary", TransactionKind::Income))
            .await
            .unwrap();
        let today = d(2025, 3, 31);
        for input in [
            txn(TransactionKind::Income, "1000", &salary.id, d(2025, 3, 1)),
            txn(TransactionKind::Expense, "200", &food.id, d(2025, 3, 9)),
            txn(TransactionKind::Expense, "50", &food.id, d(2025, 3, 31)),
            txn(TransactionKind::Expense, "999", &food.id, d(2025, 4, 1)),
        ] {
            svc.create_transaction(&user.id, input, today).await.unwrap();
        }

        let dashboard = svc.finance_dashboard(&user.id, d(2025, 3, 14)).await.unwrap();
        assert_eq!(dashboard.month, "2025-03");
        assert_eq!(dashboard.income_total, dec("1000"));
        assert_eq!(dashboard.expense_total, dec("250"));
        assert_eq!(dashboard.balance, dec("750"));
        assert_eq!(dashboard.recent_transactions.len(), 3);
        assert_eq!(dashboard.weeks.len(), 5);
        assert_eq!(dashboard.weeks[0].income, dec("1000"));
        assert_eq!(dashboard.weeks[1].expense, dec("200"));
        assert_eq!(dashboard.weeks[4].expense, dec("50"));
        assert_eq!(dashboard.categories.len(), 1);
        assert_eq!(dashboard.categories[0].name, "Food");
        assert_eq!(dashboard.categories[0].value, dec("250"));
    }

    #[tokio::test]
    async fn budget_report_tracks_spending() {
        let svc = test_service().await;
        let user = test_user(&svc, "fin").await;
        let food = svc
            .create_finance_category(&user.id, category("Food", TransactionKind::Expense))
            .await
            .unwrap();
        let budget_input = BudgetInput {
            category_id: food.id.clone(),
            amount: dec("200"),
            month: "2025-03".into(),
        };
        svc.create_budget(&user.id, budget_input.clone()).await.unwrap();
        assert!(matches!(
            svc.create_budget(&user.id, budget_input).await,
            Err(DatabaseError::Conflict(_))
        ));

        for (amount, date) in [("150", d(2025, 3, 5)), ("100", d(2025, 3, 28)), ("80", d(2025, 4, 2))] {
            svc.create_transaction(
                &user.id,
                txn(TransactionKind::Expense, amount, &food.id, date),
                date,
            )
            .await
            .unwrap();
        }

        let list = svc.budget_list(&user.id, d(2025, 3, 17)).await.unwrap();
        assert_eq!(list.month, "2025-03");
        let report = &list.budgets[0];
        assert_eq!(report.category_name, "Food");
        assert_eq!(report.spent, dec("250"));
        assert_eq!(report.percentage, dec("125"));
        assert_eq!(report.clamped_percentage, dec("100"));
        assert_eq!(report.remaining, Decimal::ZERO);
        assert!(report.is_over);

        assert!(svc.budget_list(&user.id, d(2025, 4, 1)).await.unwrap().budgets.is_empty());
    }

    #[tokio::test]
    async fn research_expenses_by_field() {
        let svc = test_service().await;
        let user = test_user(&svc, "fin").await;
        for (field, amount) in [
            (ExpenseField::Ai, "120.00"),
            (ExpenseField::Ai, "30.50"),
            (ExpenseField::Physics, "75"),
        ] {
            svc.create_research_expense(
                &user.id,
                ResearchExpenseInput {
                    field,
                    title: "GPU hours".into(),
                    description: "Cloud compute".into(),
                    amount: dec(amount),
                    date: None,
                    vendor: String::new(),
                    invoice_number: String::new(),
                },
                d(2025, 5, 1),
            )
            .await
            .unwrap();
        }

        let ai = svc
            .research_expense_list(&user.id, DEFAULT_EXPENSE_FIELD)
            .await
            .unwrap();
        assert_eq!(ai.expenses.len(), 2);
        assert_eq!(ai.total_spent, dec("150.50"));
        assert_eq!(ai.field_label, "AI & Machine Learning");
        assert_eq!(ai.research_fields.len(), 5);

        let unknown = svc.research_expense_list(&user.id, "alchemy").await.unwrap();
        assert!(unknown.expenses.is_empty());
        assert_eq!(unknown.field_label, "alchemy");
        assert_eq!(unknown.total_spent, Decimal::ZERO);
    }
}

//! Personal finance: transactions, categories, budgets and research spending.
//!
//! Every row is scoped to the signed-in user. Ids belonging to someone else
//! answer 404 exactly like ids that don't exist.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use orr_core::entities::{Budget, FinanceCategory, ResearchExpense, Transaction};
use orr_core::finance::parse_month;
use orr_core::inputs::{BudgetInput, FinanceCategoryInput, ResearchExpenseInput, TransactionInput};
use orr_core::responses::{BudgetList, FinanceDashboard, ResearchExpenseList, TransactionList};
use orr_db::repos::finance::{DEFAULT_EXPENSE_FIELD, TransactionFilter};
use serde::Deserialize;

use super::{Deleted, month_param, param, today};
use crate::error::WebResult;
use crate::json::Json;
use crate::session::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

/// GET /finance/
pub async fn dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<MonthQuery>,
) -> WebResult<Json<FinanceDashboard>> {
    let month = month_param(query.month.as_deref());
    Ok(Json(state.service.finance_dashboard(user.id(), month).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub month: Option<String>,
    pub category: Option<String>,
}

impl TransactionQuery {
    fn to_filter(&self) -> TransactionFilter {
        TransactionFilter {
            kind: param(self.kind.as_deref()).map(str::to_string),
            month: param(self.month.as_deref()).and_then(parse_month),
            category_id: param(self.category.as_deref()).map(str::to_string),
        }
    }
}

/// GET /finance/transactions/
pub async fn transaction_list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<TransactionQuery>,
) -> WebResult<Json<TransactionList>> {
    let list = state
        .service
        .list_transactions(user.id(), &query.to_filter())
        .await?;
    Ok(Json(list))
}

/// POST /finance/transactions/add/
pub async fn transaction_add(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<TransactionInput>,
) -> WebResult<(StatusCode, Json<Transaction>)> {
    let transaction = state
        .service
        .create_transaction(user.id(), input, today())
        .await?;
    tracing::info!(id = %transaction.id, "transaction added");
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// POST /finance/transactions/{id}/edit/
pub async fn transaction_edit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(input): Json<TransactionInput>,
) -> WebResult<Json<Transaction>> {
    let transaction = state
        .service
        .update_transaction(user.id(), &id, input.into())
        .await?;
    tracing::info!(%id, "transaction updated");
    Ok(Json(transaction))
}

/// POST /finance/transactions/{id}/delete/
pub async fn transaction_delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> WebResult<Json<Deleted>> {
    state.service.delete_transaction(user.id(), &id).await?;
    tracing::info!(%id, "transaction deleted");
    Ok(Json(Deleted { deleted: true }))
}

/// GET /finance/categories/
pub async fn category_list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> WebResult<Json<Vec<FinanceCategory>>> {
    Ok(Json(state.service.list_finance_categories(user.id()).await?))
}

/// POST /finance/categories/
pub async fn category_create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<FinanceCategoryInput>,
) -> WebResult<(StatusCode, Json<FinanceCategory>)> {
    let category = state
        .service
        .create_finance_category(user.id(), input)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /finance/budgets/
pub async fn budget_list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<MonthQuery>,
) -> WebResult<Json<BudgetList>> {
    let month = month_param(query.month.as_deref());
    Ok(Json(state.service.budget_list(user.id(), month).await?))
}

/// POST /finance/budgets/
pub async fn budget_create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<BudgetInput>,
) -> WebResult<(StatusCode, Json<Budget>)> {
    let budget = state.service.create_budget(user.id(), input).await?;
    Ok((StatusCode::CREATED, Json(budget)))
}

#[derive(Debug, Default, Deserialize)]
pub struct FieldQuery {
    pub field: Option<String>,
}

/// GET /finance/research/
pub async fn research_expense_list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<FieldQuery>,
) -> WebResult<Json<ResearchExpenseList>> {
    let field = param(query.field.as_deref()).unwrap_or(DEFAULT_EXPENSE_FIELD);
    Ok(Json(
        state
            .service
            .research_expense_list(user.id(), field)
            .await?,
    ))
}

/// POST /finance/research/
pub async fn research_expense_create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<ResearchExpenseInput>,
) -> WebResult<(StatusCode, Json<ResearchExpense>)> {
    let expense = state
        .service
        .create_research_expense(user.id(), input, today())
        .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

//! Route handlers that report a month's budgets against actual spending.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    analytics::{BudgetActual, BudgetReport, BudgetSummary, compute_budget_actuals},
    budget::get_budgets_for_month,
    category::CategoryId,
    db::lock_connection,
    extract::Query,
    money::percentage,
    response::ApiResponse,
    timezone::local_today,
    transaction::get_transactions_in_window,
    user::UserID,
    window::{DateWindow, parse_month},
};

/// The state needed to read and write budgets.
#[derive(Debug, Clone)]
pub struct BudgetState {
    /// The local timezone as a canonical timezone name, e.g. "America/Bogota".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Query parameters selecting the budget month.
///
/// Missing or non-numeric values default to the current month and year.
#[derive(Debug, Default, Deserialize)]
pub struct BudgetQuery {
    pub month: Option<String>,
    pub year: Option<String>,
}

/// The budget summary with the per-budget rows under `categories`.
#[derive(Debug, Serialize)]
struct BudgetSummaryData {
    #[serde(flatten)]
    summary: BudgetSummary,
    categories: Vec<BudgetSummaryRow>,
}

/// One budget in the summary.
///
/// Unlike the rows of the budget list, `percentage_used` is not capped at 100.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BudgetSummaryRow {
    category_id: CategoryId,
    budget_amount: Decimal,
    actual_spent: Decimal,
    remaining: Decimal,
    percentage_used: f64,
}

impl From<BudgetActual> for BudgetSummaryRow {
    fn from(actual: BudgetActual) -> Self {
        let budget_amount = actual.budget.budget.budget_amount;

        Self {
            category_id: actual.budget.budget.category_id,
            budget_amount,
            actual_spent: actual.actual_spent,
            remaining: actual.remaining,
            percentage_used: percentage(actual.actual_spent, budget_amount),
        }
    }
}

/// A route handler for the budgets of a month with their actual spending.
pub async fn get_budgets_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<BudgetQuery>,
) -> Result<impl IntoResponse, Error> {
    let report = build_report(&state, user_id, &query)?;

    Ok(ApiResponse::ok(report))
}

/// A route handler for the totals of a month's budgets.
pub async fn get_budget_summary_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<BudgetQuery>,
) -> Result<impl IntoResponse, Error> {
    let report = build_report(&state, user_id, &query)?;

    Ok(ApiResponse::ok(BudgetSummaryData {
        summary: report.summary,
        categories: report.budgets.into_iter().map(BudgetSummaryRow::from).collect(),
    }))
}

fn build_report(
    state: &BudgetState,
    user_id: UserID,
    query: &BudgetQuery,
) -> Result<BudgetReport, Error> {
    let today = local_today(&state.local_timezone)?;
    let month = parse_number(query.month.as_deref()).unwrap_or(today.month() as u8);
    let year = parse_number(query.year.as_deref()).unwrap_or(today.year());
    let window = DateWindow::month(year, parse_month(month)?)?;

    let connection = lock_connection(&state.db_connection)?;
    let budgets = get_budgets_for_month(user_id, month, year, &connection)?;
    let transactions = get_transactions_in_window(user_id, window, &connection)?;
    drop(connection);

    Ok(compute_budget_actuals(&budgets, &transactions, month, year))
}

fn parse_number<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|value| value.trim().parse().ok())
}

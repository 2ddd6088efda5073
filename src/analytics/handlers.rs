//! Route handlers that fetch a user's records and run the report functions over them.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{
    AppState, Error, TransactionType,
    analytics::{
        compute_balance, compute_category_breakdown, compute_monthly_trend,
        compute_savings_stats,
    },
    category::get_categories,
    db::lock_connection,
    extract::Query,
    response::ApiResponse,
    savings_goal::get_savings_goals,
    timezone::local_today,
    transaction::{TransactionWithCategory, get_recent_transactions, get_transactions_in_window},
    user::UserID,
    window::DateWindow,
};

/// The number of recent transactions returned when the request does not say.
pub const DEFAULT_RECENT_TRANSACTIONS: u32 = 10;

/// The most recent transactions a single request may ask for.
pub const MAX_RECENT_TRANSACTIONS: u32 = 100;

/// The state needed to build reports.
#[derive(Debug, Clone)]
pub struct AnalyticsState {
    /// The local timezone as a canonical timezone name, e.g. "America/Bogota".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AnalyticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Query parameters for reports over a date window.
///
/// The window is the current month unless both dates are given.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowQuery {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    /// Only used by the category breakdown. Unknown values are ignored.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

/// Query parameters for the monthly trend.
#[derive(Debug, Default, Deserialize)]
pub struct TrendQuery {
    /// Defaults to the current year when missing or not a number.
    pub year: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

/// Query parameters for the recent transactions.
#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
struct RecentTransactionsData {
    transactions: Vec<TransactionWithCategory>,
}

/// A route handler for the income, expense and balance totals.
pub async fn get_balance_endpoint(
    State(state): State<AnalyticsState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<WindowQuery>,
) -> Result<impl IntoResponse, Error> {
    let today = local_today(&state.local_timezone)?;
    let window = DateWindow::from_query(query.start_date, query.end_date, today);

    let connection = lock_connection(&state.db_connection)?;
    let transactions = get_transactions_in_window(user_id, window, &connection)?;
    drop(connection);

    Ok(ApiResponse::ok(compute_balance(&transactions, window)))
}

/// A route handler for the totals per category.
pub async fn get_category_breakdown_endpoint(
    State(state): State<AnalyticsState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<WindowQuery>,
) -> Result<impl IntoResponse, Error> {
    let today = local_today(&state.local_timezone)?;
    let window = DateWindow::from_query(query.start_date, query.end_date, today);
    let type_filter = TransactionType::parse_filter(query.transaction_type.as_deref());

    let connection = lock_connection(&state.db_connection)?;
    let transactions = get_transactions_in_window(user_id, window, &connection)?;
    let categories = get_categories(user_id, &connection)?;
    drop(connection);

    Ok(ApiResponse::ok(compute_category_breakdown(
        &transactions,
        &categories,
        type_filter,
        window,
    )))
}

/// A route handler for the month by month totals of one year.
pub async fn get_monthly_trend_endpoint(
    State(state): State<AnalyticsState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<TrendQuery>,
) -> Result<impl IntoResponse, Error> {
    let year = match query.year.as_deref().and_then(|year| year.trim().parse().ok()) {
        Some(year) => year,
        None => local_today(&state.local_timezone)?.year(),
    };
    let type_filter = TransactionType::parse_filter(query.transaction_type.as_deref());
    let window = DateWindow {
        start_date: DateWindow::month(year, Month::January)?.start_date,
        end_date: DateWindow::month(year, Month::December)?.end_date,
    };

    let connection = lock_connection(&state.db_connection)?;
    let transactions = get_transactions_in_window(user_id, window, &connection)?;
    drop(connection);

    Ok(ApiResponse::ok(compute_monthly_trend(
        &transactions,
        year,
        type_filter,
    )))
}

/// A route handler for the most recently recorded transactions.
pub async fn get_recent_transactions_endpoint(
    State(state): State<AnalyticsState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<RecentQuery>,
) -> Result<impl IntoResponse, Error> {
    let limit = query
        .limit
        .as_deref()
        .and_then(|limit| limit.trim().parse::<u32>().ok())
        .filter(|&limit| limit > 0)
        .unwrap_or(DEFAULT_RECENT_TRANSACTIONS)
        .min(MAX_RECENT_TRANSACTIONS);

    let connection = lock_connection(&state.db_connection)?;
    let transactions = get_recent_transactions(user_id, limit, &connection)?;

    Ok(ApiResponse::ok(RecentTransactionsData { transactions }))
}

/// A route handler for the savings goal statistics.
pub async fn get_savings_stats_endpoint(
    State(state): State<AnalyticsState>,
    Extension(user_id): Extension<UserID>,
) -> Result<impl IntoResponse, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = lock_connection(&state.db_connection)?;
    let goals = get_savings_goals(user_id, None, &connection)?;
    drop(connection);

    Ok(ApiResponse::ok(compute_savings_stats(&goals, today)))
}

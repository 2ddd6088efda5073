use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error,
    analytics::compute_balance,
    category::count_categories,
    db::lock_connection,
    response::ApiResponse,
    savings_goal::count_savings_goals,
    timezone::local_today,
    transaction::{count_transactions, get_transactions_in_window},
    user::UserID,
    window::DateWindow,
};

/// The state needed to compute a user's statistics.
#[derive(Debug, Clone)]
pub struct UserStatsState {
    db_connection: Arc<Mutex<Connection>>,
    local_timezone: String,
}

impl FromRef<AppState> for UserStatsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Income and expenses for the current month.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
}

/// Counts of the records a user owns.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_transactions: u64,
    pub total_categories: u64,
    pub total_savings_goals: u64,
    pub current_month_transactions: u64,
    pub monthly_stats: MonthlyStats,
}

#[derive(Debug, Serialize)]
struct UserStatsData {
    stats: UserStats,
}

/// A route handler that returns record counts and the current month's totals.
pub async fn get_user_stats(
    State(state): State<UserStatsState>,
    Extension(user_id): Extension<UserID>,
) -> Result<impl IntoResponse, Error> {
    let window = DateWindow::current_month(local_today(&state.local_timezone)?);

    let connection = lock_connection(&state.db_connection)?;
    let total_transactions = count_transactions(user_id, &connection)?;
    let total_categories = count_categories(user_id, &connection)?;
    let total_savings_goals = count_savings_goals(user_id, &connection)?;
    let month_transactions = get_transactions_in_window(user_id, window, &connection)?;
    drop(connection);

    let balance = compute_balance(&month_transactions, window);

    Ok(ApiResponse::ok(UserStatsData {
        stats: UserStats {
            total_transactions,
            total_categories,
            total_savings_goals,
            current_month_transactions: month_transactions.len() as u64,
            monthly_stats: MonthlyStats {
                total_income: balance.total_income,
                total_expenses: balance.total_expenses,
                balance: balance.balance,
            },
        },
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        endpoints,
        test_utils::{get_test_server, register_test_user, today},
    };

    #[tokio::test]
    async fn new_user_has_default_categories_and_no_transactions() {
        let server = get_test_server();
        let (_, token) = register_test_user(&server, "ana@example.com").await;

        let response = server
            .get(endpoints::USER_STATS)
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        let stats = &body["data"]["stats"];
        assert_eq!(stats["totalTransactions"], 0);
        assert_eq!(stats["totalCategories"], 10);
        assert_eq!(stats["totalSavingsGoals"], 0);
        assert_eq!(stats["monthlyStats"]["balance"], "0");
    }

    #[tokio::test]
    async fn monthly_stats_include_current_month_transactions() {
        let server = get_test_server();
        let (_, token) = register_test_user(&server, "ana@example.com").await;
        for (amount, kind) in [("100", "INCOME"), ("40", "EXPENSE")] {
            server
                .post(endpoints::TRANSACTIONS)
                .authorization_bearer(&token)
                .json(&json!({"amount": amount, "type": kind, "date": today().to_string()}))
                .await
                .assert_status(axum::http::StatusCode::CREATED);
        }

        let response = server
            .get(endpoints::USER_STATS)
            .authorization_bearer(&token)
            .await;

        let body = response.json::<serde_json::Value>();
        let stats = &body["data"]["stats"];
        assert_eq!(stats["totalTransactions"], 2);
        assert_eq!(stats["currentMonthTransactions"], 2);
        assert_eq!(stats["monthlyStats"]["totalIncome"], "100");
        assert_eq!(stats["monthlyStats"]["totalExpenses"], "40");
        assert_eq!(stats["monthlyStats"]["balance"], "60");
    }
}

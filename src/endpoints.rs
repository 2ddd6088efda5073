//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/categories/{category_id}', use [format_endpoint].

/// The route for registering a new user.
pub const REGISTER: &str = "/api/auth/register";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/auth/login";
/// The route for checking an access token and getting its user.
pub const VERIFY_TOKEN: &str = "/api/auth/verify";

/// The route for reading and updating the current user's profile.
pub const USER_PROFILE: &str = "/api/users/profile";
/// The route for the current user's record counts and monthly totals.
pub const USER_STATS: &str = "/api/users/stats";

/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to access a single category.
pub const CATEGORY: &str = "/api/categories/{category_id}";

/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";

/// The route to list and create savings goals.
pub const SAVINGS_GOALS: &str = "/api/savings-goals";
/// The route to access a single savings goal.
pub const SAVINGS_GOAL: &str = "/api/savings-goals/{goal_id}";
/// The route to add money to a savings goal.
pub const SAVINGS_GOAL_ADD_MONEY: &str = "/api/savings-goals/{goal_id}/add-money";

/// The route to list and set monthly budgets.
pub const BUDGETS: &str = "/api/budgets";
/// The route for the totals of a month's budgets.
pub const BUDGET_SUMMARY: &str = "/api/budgets/summary";
/// The route to delete a budget.
pub const BUDGET: &str = "/api/budgets/{budget_id}";

/// The route for income, expense and balance totals.
pub const ANALYTICS_BALANCE: &str = "/api/analytics/balance";
/// The route for totals per category.
pub const ANALYTICS_CATEGORIES: &str = "/api/analytics/categories";
/// The route for month by month totals.
pub const ANALYTICS_MONTHLY_TRENDS: &str = "/api/analytics/monthly-trends";
/// The route for the most recently recorded transactions.
pub const ANALYTICS_RECENT_TRANSACTIONS: &str = "/api/analytics/recent-transactions";
/// The route for savings goal statistics.
pub const ANALYTICS_SAVINGS_STATS: &str = "/api/analytics/savings-stats";

/// The route for checking that the server is up.
pub const HEALTH: &str = "/api/health";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/categories/{category_id}', '{category_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

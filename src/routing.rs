//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::{
    AppState,
    analytics::{
        get_balance_endpoint, get_category_breakdown_endpoint, get_monthly_trend_endpoint,
        get_recent_transactions_endpoint, get_savings_stats_endpoint,
    },
    auth::{auth_guard, get_verify_token, post_log_in, register_user},
    budget::{
        delete_budget_endpoint, get_budget_summary_endpoint, get_budgets_endpoint,
        upsert_budget_endpoint,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
        get_category_endpoint, update_category_endpoint,
    },
    endpoints,
    health::get_health,
    not_found::get_404_not_found,
    savings_goal::{
        add_money_endpoint, create_savings_goal_endpoint, delete_savings_goal_endpoint,
        get_savings_goal_endpoint, get_savings_goals_endpoint, update_savings_goal_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        get_transactions_endpoint, update_transaction_endpoint,
    },
    user::{get_profile, get_user_stats, update_profile},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::HEALTH, get(get_health));

    let protected_routes = Router::new()
        .route(endpoints::VERIFY_TOKEN, get(get_verify_token))
        .route(endpoints::USER_PROFILE, get(get_profile).put(update_profile))
        .route(endpoints::USER_STATS, get(get_user_stats))
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category_endpoint)
                .put(update_category_endpoint)
                .delete(delete_category_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::SAVINGS_GOALS,
            get(get_savings_goals_endpoint).post(create_savings_goal_endpoint),
        )
        .route(
            endpoints::SAVINGS_GOAL,
            get(get_savings_goal_endpoint)
                .put(update_savings_goal_endpoint)
                .delete(delete_savings_goal_endpoint),
        )
        .route(endpoints::SAVINGS_GOAL_ADD_MONEY, post(add_money_endpoint))
        .route(
            endpoints::BUDGETS,
            get(get_budgets_endpoint).post(upsert_budget_endpoint),
        )
        .route(endpoints::BUDGET_SUMMARY, get(get_budget_summary_endpoint))
        .route(endpoints::BUDGET, delete(delete_budget_endpoint))
        .route(endpoints::ANALYTICS_BALANCE, get(get_balance_endpoint))
        .route(
            endpoints::ANALYTICS_CATEGORIES,
            get(get_category_breakdown_endpoint),
        )
        .route(
            endpoints::ANALYTICS_MONTHLY_TRENDS,
            get(get_monthly_trend_endpoint),
        )
        .route(
            endpoints::ANALYTICS_RECENT_TRANSACTIONS,
            get(get_recent_transactions_endpoint),
        )
        .route(
            endpoints::ANALYTICS_SAVINGS_STATS,
            get(get_savings_stats_endpoint),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

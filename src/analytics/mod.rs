//! Reports built from a user's records.
//!
//! The `compute_*` functions are pure: they take records that were already
//! fetched from the database and never fail. Division by zero gives 0.

mod balance;
mod budget_actuals;
mod category_breakdown;
mod handlers;
mod monthly_trend;
mod savings_stats;

pub use balance::{BalanceSummary, TypeCounts, compute_balance};
pub use budget_actuals::{BudgetActual, BudgetReport, BudgetSummary, compute_budget_actuals};
pub use category_breakdown::{
    CategoryBreakdown, CategoryBreakdownItem, UNCATEGORIZED_COLOR, UNCATEGORIZED_NAME,
    compute_category_breakdown,
};
pub use handlers::{
    AnalyticsState, get_balance_endpoint, get_category_breakdown_endpoint,
    get_monthly_trend_endpoint, get_recent_transactions_endpoint, get_savings_stats_endpoint,
};
pub use monthly_trend::{
    MonthlyTotals, MonthlyTrend, YearlyTotals, compute_monthly_trend, month_name,
};
pub use savings_stats::{SavingsStats, UPCOMING_GOAL_DAYS, compute_savings_stats};

#[cfg(test)]
fn test_transaction(
    amount: rust_decimal::Decimal,
    transaction_type: crate::TransactionType,
    date: time::Date,
) -> crate::transaction::Transaction {
    crate::transaction::Transaction {
        id: 0,
        user_id: crate::user::UserID::new(1),
        amount,
        transaction_type,
        category_id: None,
        date,
        description: String::new(),
        created_at: time::OffsetDateTime::UNIX_EPOCH,
    }
}

#[cfg(test)]
fn categorized_transaction(
    amount: rust_decimal::Decimal,
    transaction_type: crate::TransactionType,
    date: time::Date,
    category_id: crate::category::CategoryId,
) -> crate::transaction::Transaction {
    crate::transaction::Transaction {
        category_id: Some(category_id),
        ..test_transaction(amount, transaction_type, date)
    }
}

//! Monthly spending limits for expense categories.

mod core;
mod create;
mod delete;
mod list;

pub use core::{
    BudgetForm, BudgetId, BudgetWithCategory, MAX_BUDGET_YEAR, MIN_BUDGET_YEAR, MonthlyBudget,
    NewBudget, check_budget_category, create_budget_table, delete_budget, get_budget,
    get_budgets_for_month, upsert_budget, validate_year,
};
pub use create::upsert_budget_endpoint;
pub use delete::delete_budget_endpoint;
pub use list::{BudgetQuery, BudgetState, get_budget_summary_endpoint, get_budgets_endpoint};

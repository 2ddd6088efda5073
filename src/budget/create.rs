use axum::{Extension, extract::State, response::IntoResponse};
use serde::Serialize;

use crate::{
    Error,
    budget::{BudgetForm, BudgetState, BudgetWithCategory, check_budget_category, upsert_budget},
    db::lock_connection,
    extract::Json,
    response::ApiResponse,
    user::UserID,
};

#[derive(Debug, Serialize)]
struct BudgetData {
    budget: BudgetWithCategory,
}

/// A route handler that sets the budget for an expense category and month.
///
/// Setting a budget for a category and month that already has one replaces its amount.
pub async fn upsert_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<BudgetForm>,
) -> Result<impl IntoResponse, Error> {
    let new_budget = form.validate()?;

    let connection = lock_connection(&state.db_connection)?;
    check_budget_category(new_budget.category_id, user_id, &connection)?;
    let budget = upsert_budget(user_id, new_budget, &connection)?;

    Ok(ApiResponse::created(
        "Budget saved successfully",
        BudgetData { budget },
    ))
}

use axum::{
    Extension,
    extract::State,
    response::IntoResponse,
};

use crate::{
    Error,
    budget::{BudgetId, BudgetState, delete_budget},
    db::lock_connection,
    extract::Path,
    response::ApiResponse,
    user::UserID,
};

/// A route handler for deleting one of the user's budgets.
pub async fn delete_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    Path(budget_id): Path<BudgetId>,
) -> Result<impl IntoResponse, Error> {
    let connection = lock_connection(&state.db_connection)?;
    delete_budget(budget_id, user_id, &connection)?;

    Ok(ApiResponse::message("Budget deleted successfully"))
}

use axum::{
    Extension,
    extract::State,
    response::IntoResponse,
};

use crate::{
    Error,
    db::lock_connection,
    extract::Path,
    response::ApiResponse,
    savings_goal::{SavingsGoalId, delete_savings_goal, list::SavingsGoalState},
    user::UserID,
};

/// A route handler for deleting one of the user's savings goals.
pub async fn delete_savings_goal_endpoint(
    State(state): State<SavingsGoalState>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<SavingsGoalId>,
) -> Result<impl IntoResponse, Error> {
    let connection = lock_connection(&state.db_connection)?;
    delete_savings_goal(goal_id, user_id, &connection)?;

    Ok(ApiResponse::message("Savings goal deleted successfully"))
}

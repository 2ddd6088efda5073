use axum::{Extension, extract::State, response::IntoResponse};

use crate::{
    Error,
    db::lock_connection,
    extract::Json,
    response::ApiResponse,
    savings_goal::{
        SavingsGoalForm, create_savings_goal,
        list::{SavingsGoalData, SavingsGoalState},
    },
    timezone::local_today,
    user::UserID,
};

/// A route handler for creating a savings goal.
pub async fn create_savings_goal_endpoint(
    State(state): State<SavingsGoalState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<SavingsGoalForm>,
) -> Result<impl IntoResponse, Error> {
    let today = local_today(&state.local_timezone)?;
    let new_goal = form.validate(today)?;

    let connection = lock_connection(&state.db_connection)?;
    let goal = create_savings_goal(user_id, new_goal, &connection)?;

    Ok(ApiResponse::created(
        "Savings goal created successfully",
        SavingsGoalData {
            goal: goal.progress(today),
        },
    ))
}

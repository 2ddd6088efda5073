//! Route handlers for listing savings goals and fetching a single goal.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    db::lock_connection,
    extract::{Path, Query},
    response::ApiResponse,
    savings_goal::{GoalProgress, SavingsGoalId, get_savings_goal, get_savings_goals},
    timezone::local_today,
    user::UserID,
};

/// The state needed to read and write savings goals.
#[derive(Debug, Clone)]
pub struct SavingsGoalState {
    /// The local timezone as a canonical timezone name, e.g. "America/Bogota".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SavingsGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Query parameters for listing savings goals.
#[derive(Debug, Default, Deserialize)]
pub struct SavingsGoalQuery {
    /// "achieved" or "active". Anything else lists every goal.
    pub status: Option<String>,
}

impl SavingsGoalQuery {
    fn achieved(&self) -> Option<bool> {
        match self.status.as_deref() {
            Some("achieved") => Some(true),
            Some("active") => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct SavingsGoalListData {
    goals: Vec<GoalProgress>,
}

#[derive(Debug, Serialize)]
pub(super) struct SavingsGoalData {
    pub goal: GoalProgress,
}

/// A route handler that lists the user's savings goals with their progress.
pub async fn get_savings_goals_endpoint(
    State(state): State<SavingsGoalState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<SavingsGoalQuery>,
) -> Result<impl IntoResponse, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = lock_connection(&state.db_connection)?;
    let goals = get_savings_goals(user_id, query.achieved(), &connection)?
        .into_iter()
        .map(|goal| goal.progress(today))
        .collect();

    Ok(ApiResponse::ok(SavingsGoalListData { goals }))
}

/// A route handler that returns one of the user's savings goals with its progress.
pub async fn get_savings_goal_endpoint(
    State(state): State<SavingsGoalState>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<SavingsGoalId>,
) -> Result<impl IntoResponse, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = lock_connection(&state.db_connection)?;
    let goal = get_savings_goal(goal_id, user_id, &connection)?.progress(today);

    Ok(ApiResponse::ok(SavingsGoalData { goal }))
}

//! Route handlers that change an existing savings goal.

use axum::{Extension, extract::State, response::IntoResponse};

use crate::{
    Error,
    db::lock_connection,
    extract::{Json, Path},
    money::validate_positive_amount,
    response::ApiResponse,
    savings_goal::{
        AddMoneyForm, SavingsGoalId, SavingsGoalUpdateForm, add_money_to_savings_goal,
        get_savings_goal,
        list::{SavingsGoalData, SavingsGoalState},
        update_savings_goal,
    },
    timezone::local_today,
    user::UserID,
};

/// A route handler for a partial update of one of the user's savings goals.
pub async fn update_savings_goal_endpoint(
    State(state): State<SavingsGoalState>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<SavingsGoalId>,
    Json(form): Json<SavingsGoalUpdateForm>,
) -> Result<impl IntoResponse, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = lock_connection(&state.db_connection)?;
    get_savings_goal(goal_id, user_id, &connection)?;

    let update = form.validate(today)?;
    let goal = update_savings_goal(goal_id, user_id, update, &connection)?;

    Ok(ApiResponse::ok_with_message(
        "Savings goal updated successfully",
        SavingsGoalData {
            goal: goal.progress(today),
        },
    ))
}

/// A route handler that adds money to one of the user's savings goals.
pub async fn add_money_endpoint(
    State(state): State<SavingsGoalState>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<SavingsGoalId>,
    Json(form): Json<AddMoneyForm>,
) -> Result<impl IntoResponse, Error> {
    let amount = validate_positive_amount(form.amount, "amount")?;
    let today = local_today(&state.local_timezone)?;

    let connection = lock_connection(&state.db_connection)?;
    let goal = add_money_to_savings_goal(goal_id, user_id, amount, &connection)?;

    tracing::debug!("Added {amount} to savings goal {goal_id}");

    Ok(ApiResponse::ok_with_message(
        &format!("Added {amount} to the savings goal"),
        SavingsGoalData {
            goal: goal.progress(today),
        },
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{get_test_server, register_test_user},
    };

    async fn create_goal(server: &axum_test::TestServer, token: &str) -> i64 {
        server
            .post(endpoints::SAVINGS_GOALS)
            .authorization_bearer(token)
            .json(&json!({"name": "Moto", "targetAmount": "200.00"}))
            .await
            .json::<Value>()["data"]["goal"]["id"]
            .as_i64()
            .unwrap()
    }

    #[tokio::test]
    async fn update_current_amount_past_target_achieves_goal() {
        let server = get_test_server();
        let (_, token) = register_test_user(&server, "ana@example.com").await;
        let id = create_goal(&server, &token).await;

        let response = server
            .put(&format_endpoint(endpoints::SAVINGS_GOAL, id))
            .authorization_bearer(&token)
            .json(&json!({"currentAmount": 250}))
            .await;

        response.assert_status_ok();
        let goal = &response.json::<Value>()["data"]["goal"];
        assert_eq!(goal["isAchieved"], true);
        assert_eq!(goal["progress"], 100.0);
        assert_eq!(goal["name"], "Moto");
    }

    #[tokio::test]
    async fn update_missing_goal_is_not_found() {
        let server = get_test_server();
        let (_, token) = register_test_user(&server, "ana@example.com").await;

        let response = server
            .put(&format_endpoint(endpoints::SAVINGS_GOAL, 42))
            .authorization_bearer(&token)
            .json(&json!({"name": "Moto"}))
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn add_money_accumulates() {
        let server = get_test_server();
        let (_, token) = register_test_user(&server, "ana@example.com").await;
        let id = create_goal(&server, &token).await;

        server
            .post(&format_endpoint(endpoints::SAVINGS_GOAL_ADD_MONEY, id))
            .authorization_bearer(&token)
            .json(&json!({"amount": "50.25"}))
            .await
            .assert_status_ok();
        let response = server
            .post(&format_endpoint(endpoints::SAVINGS_GOAL_ADD_MONEY, id))
            .authorization_bearer(&token)
            .json(&json!({"amount": "49.75"}))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["data"]["goal"]["currentAmount"], "100.00");
        assert_eq!(body["data"]["goal"]["progress"], 50.0);
        assert_eq!(body["message"], "Added 49.75 to the savings goal");
    }

    #[tokio::test]
    async fn add_money_rejects_non_positive_amount() {
        let server = get_test_server();
        let (_, token) = register_test_user(&server, "ana@example.com").await;
        let id = create_goal(&server, &token).await;

        let response = server
            .post(&format_endpoint(endpoints::SAVINGS_GOAL_ADD_MONEY, id))
            .authorization_bearer(&token)
            .json(&json!({"amount": -5}))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn add_money_past_max_amount_is_rejected() {
        let server = get_test_server();
        let (_, token) = register_test_user(&server, "ana@example.com").await;
        let id = create_goal(&server, &token).await;
        let add_money = format_endpoint(endpoints::SAVINGS_GOAL_ADD_MONEY, id);

        server
            .post(&add_money)
            .authorization_bearer(&token)
            .json(&json!({"amount": "9999999999999.99"}))
            .await
            .assert_status_ok();
        let response = server
            .post(&add_money)
            .authorization_bearer(&token)
            .json(&json!({"amount": "9999999999999.99"}))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["error"],
            "currentAmount must be at most 9999999999999.99"
        );

        // The database is still usable after the rejected update.
        let response = server
            .get(&format_endpoint(endpoints::SAVINGS_GOAL, id))
            .authorization_bearer(&token)
            .await;
        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>()["data"]["goal"]["currentAmount"],
            "9999999999999.99"
        );
    }

    #[tokio::test]
    async fn add_money_rejects_amount_above_max() {
        let server = get_test_server();
        let (_, token) = register_test_user(&server, "ana@example.com").await;
        let id = create_goal(&server, &token).await;

        let response = server
            .post(&format_endpoint(endpoints::SAVINGS_GOAL_ADD_MONEY, id))
            .authorization_bearer(&token)
            .json(&json!({"amount": "79228162514264337593543950335"}))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["error"],
            "amount must be at most 9999999999999.99"
        );
    }
}

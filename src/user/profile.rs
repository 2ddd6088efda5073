//! Route handlers for viewing and editing the logged-in user's profile.

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
    extract::Json,
    response::ApiResponse,
    user::{
        User, UserID,
        core::{validate_email, validate_name},
        db::{get_user_by_id, update_user_profile},
    },
};

/// The state needed to view or edit a user profile.
#[derive(Debug, Clone)]
pub struct ProfileState {
    /// The database connection for managing users.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProfileState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The payload wrapping a single user.
#[derive(Debug, Serialize)]
pub struct UserData {
    /// The user.
    pub user: User,
}

/// The fields of a profile that a user may change.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    /// The new display name.
    pub name: Option<String>,
    /// The new email address.
    pub email: Option<String>,
}

/// A route handler that returns the logged-in user's profile.
pub async fn get_profile(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserID>,
) -> Result<impl IntoResponse, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let user = get_user_by_id(user_id, &connection).map_err(|error| match error {
        Error::NotFound => Error::UnknownUser,
        error => error,
    })?;

    Ok(ApiResponse::ok(UserData { user }))
}

/// A route handler that updates the logged-in user's name and/or email.
///
/// Fields that are omitted keep their current value.
pub async fn update_profile(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<ProfileForm>,
) -> Result<impl IntoResponse, Error> {
    let name = form.name.as_deref().map(validate_name).transpose()?;
    let email = form.email.as_deref().map(validate_email).transpose()?;

    let connection = lock_connection(&state.db_connection)?;
    let current = get_user_by_id(user_id, &connection).map_err(|error| match error {
        Error::NotFound => Error::UnknownUser,
        error => error,
    })?;

    let user = update_user_profile(
        user_id,
        name.as_deref().unwrap_or(&current.name),
        email.as_deref().unwrap_or(&current.email),
        &connection,
    )?;

    tracing::info!("User {user_id} updated their profile");

    Ok(ApiResponse::ok_with_message(
        "Profile updated successfully",
        UserData { user },
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        endpoints,
        test_utils::{get_test_server, register_test_user},
    };

    #[tokio::test]
    async fn get_profile_returns_user() {
        let server = get_test_server();
        let (_, token) = register_test_user(&server, "ana@example.com").await;

        let response = server
            .get(endpoints::USER_PROFILE)
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["data"]["user"]["email"], "ana@example.com");
        assert!(body["data"]["user"].get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn update_profile_changes_only_given_fields() {
        let server = get_test_server();
        let (_, token) = register_test_user(&server, "ana@example.com").await;

        let response = server
            .put(endpoints::USER_PROFILE)
            .authorization_bearer(&token)
            .json(&json!({"name": "Ana Updated"}))
            .await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["data"]["user"]["name"], "Ana Updated");
        assert_eq!(body["data"]["user"]["email"], "ana@example.com");
    }

    #[tokio::test]
    async fn update_profile_with_taken_email_fails() {
        let server = get_test_server();
        register_test_user(&server, "ana@example.com").await;
        let (_, token) = register_test_user(&server, "bob@example.com").await;

        let response = server
            .put(endpoints::USER_PROFILE)
            .authorization_bearer(&token)
            .json(&json!({"email": "ana@example.com"}))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn update_profile_with_invalid_email_fails() {
        let server = get_test_server();
        let (_, token) = register_test_user(&server, "ana@example.com").await;

        let response = server
            .put(endpoints::USER_PROFILE)
            .authorization_bearer(&token)
            .json(&json!({"email": "nope"}))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }
}

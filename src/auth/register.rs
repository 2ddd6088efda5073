//! The route handler for creating a new user account.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::IntoResponse,
};
use jsonwebtoken::EncodingKey;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{PasswordHash, ValidatedPassword, encode_token},
    category::create_default_categories,
    db::lock_connection,
    extract::Json,
    response::ApiResponse,
    user::{User, create_user, validate_email, validate_name},
};

/// The state needed for registering a new user.
#[derive(Clone)]
pub struct RegistrationState {
    /// The key for signing the access token returned to the new user.
    pub encoding_key: EncodingKey,
    /// How long the returned access token is valid.
    pub token_duration: Duration,
    /// The bcrypt cost for hashing the new user's password.
    pub password_hash_cost: u32,
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            encoding_key: state.jwt_keys.encoding_key.clone(),
            token_duration: state.token_duration,
            password_hash_cost: state.password_hash_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The data needed to register a new user.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    /// The user's display name.
    pub name: String,
    /// The email address to log in with.
    pub email: String,
    /// The password to log in with.
    pub password: String,
}

/// An authenticated user and the token that proves it.
#[derive(Debug, Serialize)]
pub struct AuthenticatedUser {
    /// The user that was registered or logged in.
    pub user: User,
    /// The bearer token for subsequent requests.
    pub token: String,
}

/// A route handler for registering a new user.
///
/// The new user gets a default set of income and expense categories.
///
/// # Errors
///
/// Returns a 400 response if a field is invalid or the email is already registered.
pub async fn register_user(
    State(state): State<RegistrationState>,
    Json(form): Json<RegisterForm>,
) -> Result<impl IntoResponse, Error> {
    let name = validate_name(&form.name)?;
    let email = validate_email(&form.email)?;
    let password = ValidatedPassword::new(&form.password)?;
    let password_hash = PasswordHash::new(password, state.password_hash_cost)?;

    let mut connection = lock_connection(&state.db_connection)?;
    let transaction = connection.transaction()?;
    let user = create_user(&name, &email, password_hash, &transaction)?;
    create_default_categories(user.id, &transaction)?;
    transaction.commit()?;
    drop(connection);

    let token = encode_token(user.id, state.token_duration, &state.encoding_key)?;

    tracing::info!("Registered new user {}", user.id);

    Ok(ApiResponse::created(
        "User registered successfully",
        AuthenticatedUser { user, token },
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{endpoints, test_utils::get_test_server};

    #[tokio::test]
    async fn register_returns_user_and_token() {
        let server = get_test_server();

        let response = server
            .post(endpoints::REGISTER)
            .json(&json!({
                "name": "Ana",
                "email": "ana@example.com",
                "password": "password123"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::CREATED);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["user"]["name"], "Ana");
        assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(body["data"]["user"].get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn register_creates_default_categories() {
        let server = get_test_server();
        let response = server
            .post(endpoints::REGISTER)
            .json(&json!({
                "name": "Ana",
                "email": "ana@example.com",
                "password": "password123"
            }))
            .await;
        let token = response.json::<serde_json::Value>()["data"]["token"]
            .as_str()
            .unwrap()
            .to_owned();

        let response = server
            .get(endpoints::CATEGORIES)
            .authorization_bearer(&token)
            .await;

        let body = response.json::<serde_json::Value>();
        let categories = body["data"]["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 10);
        let income_count = categories
            .iter()
            .filter(|category| category["type"] == "INCOME")
            .count();
        assert_eq!(income_count, 3);
    }

    #[tokio::test]
    async fn register_duplicate_email_fails() {
        let server = get_test_server();
        let body = json!({
            "name": "Ana",
            "email": "ana@example.com",
            "password": "password123"
        });
        server.post(endpoints::REGISTER).json(&body).await;

        let response = server.post(endpoints::REGISTER).json(&body).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["error"], "The email is already registered");
    }

    #[tokio::test]
    async fn register_short_password_fails() {
        let server = get_test_server();

        let response = server
            .post(endpoints::REGISTER)
            .json(&json!({
                "name": "Ana",
                "email": "ana@example.com",
                "password": "12345"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_short_name_fails() {
        let server = get_test_server();

        let response = server
            .post(endpoints::REGISTER)
            .json(&json!({
                "name": "A",
                "email": "ana@example.com",
                "password": "password123"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }
}

//! The route handlers for logging in and checking an existing token.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::IntoResponse,
};
use jsonwebtoken::EncodingKey;
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{encode_token, register::AuthenticatedUser},
    db::lock_connection,
    extract::Json,
    response::ApiResponse,
    user::{UserData, UserID, get_user_by_email, get_user_by_id},
};

/// The state needed to process a log-in request.
#[derive(Clone)]
pub struct LoginState {
    /// The key for signing access tokens.
    pub encoding_key: EncodingKey,
    /// How long issued access tokens are valid.
    pub token_duration: Duration,
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            encoding_key: state.jwt_keys.encoding_key.clone(),
            token_duration: state.token_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The credentials entered during log-in.
#[derive(Debug, Deserialize)]
pub struct LogInData {
    /// Email entered during log-in.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
}

/// Handler for log-in requests.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] if the email does not belong to a
/// registered user or the password is not correct.
pub async fn post_log_in(
    State(state): State<LoginState>,
    Json(credentials): Json<LogInData>,
) -> Result<impl IntoResponse, Error> {
    let email = credentials.email.trim().to_lowercase();

    let connection = lock_connection(&state.db_connection)?;
    let user = get_user_by_email(&email, &connection).map_err(|error| match error {
        Error::NotFound => Error::InvalidCredentials,
        error => error,
    })?;
    drop(connection);

    let is_password_correct = user
        .password_hash
        .verify(&credentials.password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if !is_password_correct {
        tracing::debug!("Failed log-in attempt for user {}", user.id);
        return Err(Error::InvalidCredentials);
    }

    let token = encode_token(user.id, state.token_duration, &state.encoding_key)?;

    Ok(ApiResponse::ok_with_message(
        "Logged in successfully",
        AuthenticatedUser { user, token },
    ))
}

/// Handler that confirms the bearer token is valid and returns its user.
///
/// The auth middleware has already verified the token by the time this runs.
pub async fn get_verify_token(
    State(state): State<LoginState>,
    Extension(user_id): Extension<UserID>,
) -> Result<impl IntoResponse, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let user = get_user_by_id(user_id, &connection).map_err(|error| match error {
        Error::NotFound => Error::UnknownUser,
        error => error,
    })?;

    Ok(ApiResponse::ok(UserData { user }))
}

//! Authentication middleware that validates bearer tokens.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use jsonwebtoken::DecodingKey;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::token::decode_token,
    db::lock_connection,
    user::{UserID, get_user_by_id},
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key used to verify access tokens.
    pub decoding_key: DecodingKey,
    /// The database connection for checking that the token's user still exists.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            decoding_key: state.jwt_keys.decoding_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Middleware function that checks for a valid bearer token in the `Authorization` header.
///
/// The user ID is placed into the request and then the request executed normally if the token
/// is valid, otherwise a JSON error response is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    match authenticate(&state, &request) {
        Ok(user_id) => {
            let (mut parts, body) = request.into_parts();
            parts.extensions.insert(user_id);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(error) => {
            tracing::debug!(
                "Rejected request to {}: {error}",
                request.uri().path()
            );
            error.into_response()
        }
    }
}

fn authenticate(state: &AuthState, request: &Request) -> Result<UserID, Error> {
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(Error::MissingToken)?;

    let claims = decode_token(bearer.token(), &state.decoding_key)?;

    let connection = lock_connection(&state.db_connection)?;
    match get_user_by_id(claims.sub, &connection) {
        Ok(user) => Ok(user.id),
        Err(Error::NotFound) => Err(Error::UnknownUser),
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod auth_guard_tests {
    use axum::{
        Extension, Router,
        http::StatusCode,
        middleware,
        routing::get,
    };
    use axum_test::TestServer;
    use jsonwebtoken::EncodingKey;
    use rusqlite::Connection;
    use std::sync::{Arc, Mutex};
    use time::Duration;

    use crate::{
        PasswordHash,
        auth::{AuthState, DEFAULT_TOKEN_DURATION, auth_guard, encode_token},
        initialize_db,
        user::{UserID, create_user},
    };

    const SECRET: &[u8] = b"nafstenoas";
    const TEST_PROTECTED_ROUTE: &str = "/protected";

    async fn test_handler(Extension(user_id): Extension<UserID>) -> String {
        user_id.to_string()
    }

    fn get_test_server() -> (TestServer, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        let user = create_user(
            "Ana",
            "ana@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        let state = AuthState {
            decoding_key: jsonwebtoken::DecodingKey::from_secret(SECRET),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(test_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
            .with_state(state);

        (
            TestServer::try_new(app).expect("Could not create test server."),
            user.id,
        )
    }

    fn token_for(user_id: UserID, duration: Duration) -> String {
        encode_token(user_id, duration, &EncodingKey::from_secret(SECRET)).unwrap()
    }

    #[tokio::test]
    async fn valid_token_passes_user_id_to_handler() {
        let (server, user_id) = get_test_server();

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer(token_for(user_id, DEFAULT_TOKEN_DURATION))
            .await;

        response.assert_status_ok();
        response.assert_text(user_id.to_string());
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let (server, _) = get_test_server();

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["error"], "Access token required");
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized() {
        let (server, user_id) = get_test_server();

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer(token_for(user_id, Duration::hours(-2)))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["error"], "Token expired");
    }

    #[tokio::test]
    async fn malformed_token_is_forbidden() {
        let (server, _) = get_test_server();

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer("FOOBAR")
            .await;

        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["error"], "Invalid token");
    }

    #[tokio::test]
    async fn token_for_unknown_user_is_unauthorized() {
        let (server, _) = get_test_server();

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer(token_for(UserID::new(999), DEFAULT_TOKEN_DURATION))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["error"], "User not found");
    }
}

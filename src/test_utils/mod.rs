//! Helpers shared by the route handler tests.

use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::{Value, json};
use time::Date;

use crate::{AppState, PaginationConfig, build_router, endpoints, timezone::local_today};

/// The password used by [register_test_user].
pub(crate) const TEST_PASSWORD: &str = "password123";

const TEST_TIMEZONE: &str = "Etc/UTC";

/// A test server backed by an empty in-memory database.
pub(crate) fn get_test_server() -> TestServer {
    let connection = Connection::open_in_memory().unwrap();
    let state = AppState::new(
        connection,
        "a-test-secret",
        TEST_TIMEZONE,
        PaginationConfig::default(),
    )
    .unwrap()
    .with_password_hash_cost(4);

    TestServer::try_new(build_router(state)).unwrap()
}

/// Register a user with [TEST_PASSWORD] and return their ID and access token.
#[track_caller]
pub(crate) async fn register_test_user(server: &TestServer, email: &str) -> (i64, String) {
    let response = server
        .post(endpoints::REGISTER)
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": TEST_PASSWORD,
        }))
        .await;

    let body = response.json::<Value>();
    let user_id = body["data"]["user"]["id"]
        .as_i64()
        .expect("register response should contain the user ID");
    let token = body["data"]["token"]
        .as_str()
        .expect("register response should contain a token")
        .to_owned();

    (user_id, token)
}

/// Today's date in the test server's timezone.
pub(crate) fn today() -> Date {
    local_today(TEST_TIMEZONE).unwrap()
}

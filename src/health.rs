//! The health check route.

use axum::{Json, response::IntoResponse};
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
}

/// Report that the server is up. Does not need a token.
pub async fn get_health() -> impl IntoResponse {
    Json(Health {
        status: "OK",
        timestamp: OffsetDateTime::now_utc(),
    })
}

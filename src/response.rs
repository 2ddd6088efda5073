//! The JSON envelope wrapped around every successful response.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// A successful API response: `{"success": true, "message"?: ..., "data"?: ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// A human readable description of what happened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The response payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip)]
    status: StatusCode,
}

impl<T> ApiResponse<T> {
    /// A 200 OK response carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            status: StatusCode::OK,
        }
    }

    /// A 201 Created response carrying `data`.
    pub fn created(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.to_owned()),
            data: Some(data),
            status: StatusCode::CREATED,
        }
    }

    /// A 200 OK response with a message as well as data.
    pub fn ok_with_message(message: &str, data: T) -> Self {
        Self {
            message: Some(message.to_owned()),
            ..Self::ok(data)
        }
    }
}

impl ApiResponse<()> {
    /// A 200 OK response that carries only a message.
    pub fn message(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_owned()),
            data: None,
            status: StatusCode::OK,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use super::ApiResponse;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn ok_omits_message() {
        let response = ApiResponse::ok(json!({"answer": 42})).into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"success": true, "data": {"answer": 42}})
        );
    }

    #[tokio::test]
    async fn created_sets_status_and_message() {
        let response = ApiResponse::created("Created", json!({})).into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(response).await,
            json!({"success": true, "message": "Created", "data": {}})
        );
    }

    #[tokio::test]
    async fn message_only_omits_data() {
        let response = ApiResponse::message("Deleted").into_response();

        assert_eq!(
            body_json(response).await,
            json!({"success": true, "message": "Deleted"})
        );
    }
}

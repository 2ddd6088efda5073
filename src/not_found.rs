use axum::{
    Json,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::ErrorBody;

/// The fallback for requests that match no route.
pub async fn get_404_not_found(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new(format!("Route not found - {}", uri.path()))),
    )
        .into_response()
}

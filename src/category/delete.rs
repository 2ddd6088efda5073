//! Category deletion endpoint.

use axum::{
    Extension,
    extract::State,
    response::IntoResponse,
};

use crate::{
    Error,
    category::{CategoryId, CategoryState, delete_category},
    db::lock_connection,
    extract::Path,
    response::ApiResponse,
    user::UserID,
};

/// A route handler for deleting a category that no transaction uses.
pub async fn delete_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
) -> Result<impl IntoResponse, Error> {
    let connection = lock_connection(&state.db_connection)?;
    delete_category(category_id, user_id, &connection)?;

    Ok(ApiResponse::message("Category deleted successfully"))
}

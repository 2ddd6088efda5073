//! Category creation endpoint.

use axum::{Extension, extract::State, response::IntoResponse};

use crate::{
    Error,
    category::{
        CategoryData, CategoryFormData, CategoryState, create_category,
        domain::DEFAULT_CATEGORY_COLOR,
    },
    db::lock_connection,
    extract::Json,
    response::ApiResponse,
    user::UserID,
};

/// A route handler for creating a new category.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<CategoryFormData>,
) -> Result<impl IntoResponse, Error> {
    let new_category = form.validate(DEFAULT_CATEGORY_COLOR)?;

    let connection = lock_connection(&state.db_connection)?;
    let category = create_category(user_id, new_category, &connection)?;

    Ok(ApiResponse::created(
        "Category created successfully",
        CategoryData { category },
    ))
}

//! Category editing endpoint.

use axum::{Extension, extract::State, response::IntoResponse};

use crate::{
    Error,
    category::{
        CategoryData, CategoryFormData, CategoryId, CategoryState, get_category, update_category,
    },
    db::lock_connection,
    extract::{Json, Path},
    response::ApiResponse,
    user::UserID,
};

/// A route handler for editing one of the user's categories.
///
/// The existing color is kept when the form omits one.
pub async fn update_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
    Json(form): Json<CategoryFormData>,
) -> Result<impl IntoResponse, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let existing = get_category(category_id, user_id, &connection)?;

    let new_category = form.validate(existing.color.as_ref())?;
    let category = update_category(category_id, user_id, new_category, &connection)?;

    Ok(ApiResponse::ok_with_message(
        "Category updated successfully",
        CategoryData { category },
    ))
}

//! Route handlers for listing categories and fetching a single category.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, TransactionType,
    category::{Category, CategoryId, CategoryWithCount, get_categories_with_counts, get_category},
    db::lock_connection,
    extract::{Path, Query},
    response::ApiResponse,
    user::UserID,
};

/// The state needed to read categories.
#[derive(Debug, Clone)]
pub struct CategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Query parameters for listing categories.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    /// Only list categories of this type. Unknown values are ignored.
    #[serde(rename = "type")]
    pub category_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct CategoryListData {
    categories: Vec<CategoryWithCount>,
}

/// The payload wrapping a single category.
#[derive(Debug, Serialize)]
pub struct CategoryData {
    pub category: Category,
}

/// A route handler that lists the user's categories with their transaction counts.
pub async fn get_categories_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<CategoryQuery>,
) -> Result<impl IntoResponse, Error> {
    let type_filter = TransactionType::parse_filter(query.category_type.as_deref());

    let connection = lock_connection(&state.db_connection)?;
    let categories = get_categories_with_counts(user_id, type_filter, &connection)?;

    Ok(ApiResponse::ok(CategoryListData { categories }))
}

/// A route handler that returns one of the user's categories.
pub async fn get_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
) -> Result<impl IntoResponse, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let category = get_category(category_id, user_id, &connection)?;

    Ok(ApiResponse::ok(CategoryData { category }))
}

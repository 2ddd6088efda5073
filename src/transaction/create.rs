//! Transaction creation endpoint.

use axum::{Extension, extract::State, response::IntoResponse};

use crate::{
    Error,
    db::lock_connection,
    extract::Json,
    response::ApiResponse,
    timezone::local_today,
    transaction::{
        TransactionForm, check_transaction_category, create_transaction, get_transaction,
        list::{TransactionData, TransactionState},
    },
    user::UserID,
};

/// A route handler for recording a new transaction.
///
/// Responds with the stored transaction and its category summary.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<TransactionForm>,
) -> Result<impl IntoResponse, Error> {
    let today = local_today(&state.local_timezone)?;
    let builder = form.validate(today)?;

    let connection = lock_connection(&state.db_connection)?;
    check_transaction_category(&builder, user_id, &connection)?;
    let transaction = create_transaction(user_id, builder, &connection)?;
    let transaction = get_transaction(transaction.id, user_id, &connection)?;

    tracing::debug!("User {user_id} created transaction {}", transaction.transaction.id);

    Ok(ApiResponse::created(
        "Transaction created successfully",
        TransactionData { transaction },
    ))
}

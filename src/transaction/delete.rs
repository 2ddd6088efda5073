use axum::{
    Extension,
    extract::State,
    response::IntoResponse,
};

use crate::{
    Error,
    db::lock_connection,
    extract::Path,
    response::ApiResponse,
    transaction::{TransactionId, delete_transaction, list::TransactionState},
    user::UserID,
};

/// A route handler for deleting one of the user's transactions.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<impl IntoResponse, Error> {
    let connection = lock_connection(&state.db_connection)?;
    delete_transaction(transaction_id, user_id, &connection)?;

    Ok(ApiResponse::message("Transaction deleted successfully"))
}

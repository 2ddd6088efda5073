//! Transaction editing endpoint.

use axum::{Extension, extract::State, response::IntoResponse};

use crate::{
    Error,
    db::lock_connection,
    extract::{Json, Path},
    response::ApiResponse,
    timezone::local_today,
    transaction::{
        TransactionForm, TransactionId, check_transaction_category, get_transaction,
        list::{TransactionData, TransactionState},
        update_transaction,
    },
    user::UserID,
};

/// A route handler for replacing the fields of one of the user's transactions.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    Json(form): Json<TransactionForm>,
) -> Result<impl IntoResponse, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = lock_connection(&state.db_connection)?;
    // Unknown ids are reported before any validation error.
    get_transaction(transaction_id, user_id, &connection)?;

    let builder = form.validate(today)?;
    check_transaction_category(&builder, user_id, &connection)?;
    update_transaction(transaction_id, user_id, builder, &connection)?;
    let transaction = get_transaction(transaction_id, user_id, &connection)?;

    Ok(ApiResponse::ok_with_message(
        "Transaction updated successfully",
        TransactionData { transaction },
    ))
}

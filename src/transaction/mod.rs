//! Transaction management.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - Route handlers for the transaction endpoints

mod core;
mod create;
mod delete;
mod edit;
mod list;
mod query;

pub use core::{
    MAX_DESCRIPTION_LENGTH, Transaction, TransactionBuilder, TransactionForm, TransactionId,
    TransactionWithCategory, check_transaction_category, count_transactions, create_transaction,
    create_transaction_table, delete_transaction, get_recent_transactions, get_transaction,
    get_transactions_in_window, map_transaction_row, update_transaction,
};
pub use create::create_transaction_endpoint;
pub use delete::delete_transaction_endpoint;
pub use edit::update_transaction_endpoint;
pub use list::{
    TransactionQuery, TransactionState, get_transaction_endpoint, get_transactions_endpoint,
};
pub use query::{TransactionFilter, query_transactions};

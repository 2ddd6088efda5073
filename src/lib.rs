//! MiBalance is a web app for tracking personal finances.
//!
//! This library provides a JSON REST API for managing categorized income and
//! expense transactions, monthly budgets and savings goals, along with
//! analytics derived from them (balance, category breakdown, monthly trends,
//! savings statistics and budget-vs-actual reports).

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::{Deserialize, Serialize};
use time::Date;
use tokio::signal;

pub mod analytics;
mod app_state;
mod auth;
pub mod budget;
pub mod category;
mod db;
pub mod endpoints;
mod extract;
mod health;
mod logging;
pub mod money;
mod not_found;
mod pagination;
mod response;
mod routing;
pub mod savings_goal;
mod timezone;
pub mod transaction;
pub mod transaction_type;
pub mod user;
pub mod window;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{Claims, PasswordHash, ValidatedPassword, encode_token};
pub use category::{CategoryId, create_default_categories};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use transaction_type::TransactionType;
pub use user::{User, UserID};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
///
/// The display string of each client-facing variant is sent to the client as
/// the `error` field of the JSON error body.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email does not belong to a registered user or the password is wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The request did not include a bearer token.
    #[error("Access token required")]
    MissingToken,

    /// The bearer token was valid but has expired.
    #[error("Token expired")]
    ExpiredToken,

    /// The bearer token could not be decoded or verified.
    #[error("Invalid token")]
    InvalidToken,

    /// The bearer token refers to a user that no longer exists.
    #[error("User not found")]
    UnknownUser,

    /// The JSON web token could not be encoded.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A field in the request failed validation. The string describes the problem.
    #[error("{0}")]
    Validation(String),

    /// The email is already used by another user.
    #[error("The email is already registered")]
    DuplicateEmail,

    /// The user already has a category with the same name and type.
    #[error("A category with this name and type already exists")]
    DuplicateCategory,

    /// The category ID in the request body does not refer to one of the user's categories.
    #[error("Category not found")]
    InvalidCategory(i64),

    /// The transaction type differs from the type of its category.
    #[error("The transaction type does not match the category type")]
    CategoryTypeMismatch,

    /// Budgets may only be set for the user's expense categories.
    #[error("Category not found or is not an expense category")]
    InvalidBudgetCategory,

    /// Tried to delete a category that is referenced by transactions.
    #[error("Cannot delete a category that has transactions")]
    CategoryInUse,

    /// A date in the future was used to create a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// A date in the past was used as the target date of a savings goal.
    #[error("{0} is a date in the past, which is not allowed")]
    PastDate(Date),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("The requested resource could not be found")]
    NotFound,

    /// The transaction does not exist or belongs to another user.
    #[error("Transaction not found")]
    MissingTransaction,

    /// The category does not exist or belongs to another user.
    #[error("Category not found")]
    MissingCategory,

    /// The savings goal does not exist or belongs to another user.
    #[error("Savings goal not found")]
    MissingSavingsGoal,

    /// The budget does not exist or belongs to another user.
    #[error("Budget not found")]
    MissingBudget,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials
            | Error::MissingToken
            | Error::ExpiredToken
            | Error::UnknownUser => StatusCode::UNAUTHORIZED,
            Error::InvalidToken => StatusCode::FORBIDDEN,
            Error::Validation(_)
            | Error::DuplicateEmail
            | Error::DuplicateCategory
            | Error::InvalidCategory(_)
            | Error::CategoryTypeMismatch
            | Error::InvalidBudgetCategory
            | Error::CategoryInUse
            | Error::FutureDate(_)
            | Error::PastDate(_) => StatusCode::BAD_REQUEST,
            Error::NotFound
            | Error::MissingTransaction
            | Error::MissingCategory
            | Error::MissingSavingsGoal
            | Error::MissingBudget => StatusCode::NOT_FOUND,
            Error::TokenCreation(_)
            | Error::HashingError(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// A description of what went wrong.
    pub error: String,
}

impl ErrorBody {
    /// Create an error body with the message `error`.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal errors are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "Internal server error".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}

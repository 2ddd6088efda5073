//! Route handlers for listing transactions and fetching a single transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error, TransactionType,
    db::lock_connection,
    extract::{Path, Query},
    pagination::{Pagination, PaginationConfig},
    response::ApiResponse,
    transaction::{
        TransactionFilter, TransactionId, TransactionWithCategory, get_transaction,
        query_transactions,
    },
    user::UserID,
};

/// The state needed to read and write transactions.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The local timezone as a canonical timezone name, e.g. "America/Bogota".
    pub local_timezone: String,
    /// The config that controls how to page lists of transactions.
    pub pagination_config: PaginationConfig,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            pagination_config: state.pagination_config.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Query parameters for the transaction list.
///
/// Numbers and the type are read leniently: values that do not parse are
/// treated as if they were not given.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub category_id: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub search: Option<String>,
}

impl TransactionQuery {
    fn filter(&self) -> TransactionFilter {
        TransactionFilter {
            transaction_type: TransactionType::parse_filter(self.transaction_type.as_deref()),
            category_id: parse_number(self.category_id.as_deref()),
            start_date: self.start_date,
            end_date: self.end_date,
            search: self.search.clone(),
        }
    }
}

fn parse_number<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|value| value.trim().parse().ok())
}

#[derive(Debug, Serialize)]
struct TransactionListData {
    transactions: Vec<TransactionWithCategory>,
    pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub(super) struct TransactionData<T> {
    pub transaction: T,
}

/// A route handler that returns a page of the user's transactions, newest first.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<TransactionQuery>,
) -> Result<impl IntoResponse, Error> {
    let page = state.pagination_config.resolve(
        parse_number(query.page.as_deref()),
        parse_number(query.limit.as_deref()),
    );
    let filter = query.filter();

    let connection = lock_connection(&state.db_connection)?;
    let (transactions, total_items) = query_transactions(user_id, &filter, page, &connection)?;

    Ok(ApiResponse::ok(TransactionListData {
        transactions,
        pagination: Pagination::new(page, total_items),
    }))
}

/// A route handler that returns one of the user's transactions with its category.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<impl IntoResponse, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let transaction = get_transaction(transaction_id, user_id, &connection)?;

    Ok(ApiResponse::ok(TransactionData { transaction }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{get_test_server, register_test_user, today},
    };

    async fn post_transaction(
        server: &axum_test::TestServer,
        token: &str,
        amount: &str,
        description: &str,
    ) -> i64 {
        let response = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(token)
            .json(&json!({
                "amount": amount,
                "type": "EXPENSE",
                "date": today().to_string(),
                "description": description,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        response.json::<Value>()["data"]["transaction"]["id"]
            .as_i64()
            .unwrap()
    }

    #[tokio::test]
    async fn list_is_paginated() {
        let server = get_test_server();
        let (_, token) = register_test_user(&server, "ana@example.com").await;
        for i in 0..3 {
            post_transaction(&server, &token, "10.00", &format!("compra {i}")).await;
        }

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("page", 2)
            .add_query_param("limit", 2)
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["data"]["transactions"].as_array().unwrap().len(), 1);
        assert_eq!(
            body["data"]["pagination"],
            json!({
                "currentPage": 2,
                "totalPages": 2,
                "totalItems": 3,
                "itemsPerPage": 2,
                "hasNext": false,
                "hasPrev": true,
            })
        );
    }

    #[tokio::test]
    async fn list_past_last_page_is_empty_for_huge_page() {
        let server = get_test_server();
        let (_, token) = register_test_user(&server, "ana@example.com").await;
        post_transaction(&server, &token, "10.00", "pan").await;

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("page", u64::MAX)
            .add_query_param("limit", 2)
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["data"]["transactions"], json!([]));
        assert_eq!(body["data"]["pagination"]["currentPage"], u64::MAX);
        assert_eq!(body["data"]["pagination"]["totalItems"], 1);
        assert_eq!(body["data"]["pagination"]["hasNext"], false);
    }

    #[tokio::test]
    async fn list_uses_defaults_for_unparsable_numbers() {
        let server = get_test_server();
        let (_, token) = register_test_user(&server, "ana@example.com").await;
        post_transaction(&server, &token, "10.00", "pan").await;

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("page", "abc")
            .add_query_param("categoryId", "none")
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["data"]["pagination"]["currentPage"], 1);
        assert_eq!(body["data"]["pagination"]["itemsPerPage"], 20);
        assert_eq!(body["data"]["pagination"]["totalItems"], 1);
    }

    #[tokio::test]
    async fn list_searches_description() {
        let server = get_test_server();
        let (_, token) = register_test_user(&server, "ana@example.com").await;
        post_transaction(&server, &token, "10.00", "Supermercado").await;
        post_transaction(&server, &token, "5.00", "Cine").await;

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("search", "SUPER")
            .authorization_bearer(&token)
            .await;

        let body = response.json::<Value>();
        let transactions = body["data"]["transactions"].as_array().unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0]["description"], "Supermercado");
        assert_eq!(transactions[0]["amount"], "10.00");
    }

    #[tokio::test]
    async fn get_returns_transaction() {
        let server = get_test_server();
        let (_, token) = register_test_user(&server, "ana@example.com").await;
        let id = post_transaction(&server, &token, "7.25", "Café").await;

        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION, id))
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["data"]["transaction"]["id"], id);
        assert_eq!(body["data"]["transaction"]["category"], Value::Null);
    }

    #[tokio::test]
    async fn get_other_users_transaction_is_not_found() {
        let server = get_test_server();
        let (_, ana_token) = register_test_user(&server, "ana@example.com").await;
        let (_, bob_token) = register_test_user(&server, "bob@example.com").await;
        let id = post_transaction(&server, &ana_token, "7.25", "Café").await;

        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION, id))
            .authorization_bearer(&bob_token)
            .await;

        response.assert_status_not_found();
        assert_eq!(response.json::<Value>()["error"], "Transaction not found");
    }
}

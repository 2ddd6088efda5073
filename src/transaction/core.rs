//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error, TransactionType,
    category::{CategoryColor, CategoryId, CategorySummary, get_category},
    money::{get_decimal, validate_positive_amount},
    user::UserID,
    window::DateWindow,
};

// ============================================================================
// MODELS
// ============================================================================

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// The longest description accepted for a transaction.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that owns the transaction.
    pub user_id: UserID,
    /// The amount of money spent or earned in this transaction. Always positive.
    pub amount: Decimal,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The ID of the category the transaction belongs to.
    pub category_id: Option<CategoryId>,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: Decimal, transaction_type: TransactionType, date: Date) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            transaction_type,
            date,
            description: String::new(),
            category_id: None,
        }
    }
}

/// A transaction along with a summary of its category, if it has one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionWithCategory {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub category: Option<CategorySummary>,
}

/// A builder for the data needed to insert or replace a transaction.
///
/// Use [TransactionForm::validate] to build one from client input, or
/// [Transaction::build] when the data is already known to be valid.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The monetary amount of the transaction. Always positive, the direction
    /// of the money is given by `transaction_type`.
    pub amount: Decimal,

    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,

    /// The date when the transaction occurred.
    ///
    /// The date must not be in the future.
    pub date: Date,

    /// A human-readable description of the transaction.
    pub description: String,

    /// The category of the transaction, e.g. "Alimentación", "Transporte", "Salario".
    pub category_id: Option<CategoryId>,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category id for the transaction.
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }
}

/// The JSON body for creating or replacing a transaction.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionForm {
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category_id: Option<CategoryId>,
    pub date: Date,
    pub description: Option<String>,
}

impl TransactionForm {
    /// Check the fields that do not need the database.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] for a bad amount or description, or
    /// [Error::FutureDate] if `date` is after `today`.
    pub fn validate(self, today: Date) -> Result<TransactionBuilder, Error> {
        let amount = validate_positive_amount(self.amount, "amount")?;

        let description = self.description.unwrap_or_default().trim().to_owned();
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(Error::Validation(format!(
                "description must be at most {MAX_DESCRIPTION_LENGTH} characters"
            )));
        }

        if self.date > today {
            return Err(Error::FutureDate(self.date));
        }

        Ok(Transaction::build(amount, self.transaction_type, self.date)
            .description(&description)
            .category_id(self.category_id))
    }
}

/// Check that the builder's category belongs to `user_id` and has the same type.
///
/// # Errors
///
/// Returns [Error::InvalidCategory] if the category does not belong to the
/// user and [Error::CategoryTypeMismatch] if its type differs.
pub fn check_transaction_category(
    builder: &TransactionBuilder,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let Some(category_id) = builder.category_id else {
        return Ok(());
    };

    let category = get_category(category_id, user_id, connection).map_err(|error| match error {
        Error::MissingCategory => Error::InvalidCategory(category_id),
        error => error,
    })?;

    if category.category_type != builder.transaction_type {
        return Err(Error::CategoryTypeMismatch);
    }

    Ok(())
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

pub(crate) const TRANSACTION_COLUMNS: &str = "t.id, t.user_id, t.amount, t.type, t.category_id, t.date, t.description, t.created_at";

pub(crate) const TRANSACTION_WITH_CATEGORY_COLUMNS: &str = "t.id, t.user_id, t.amount, t.type, t.category_id, t.date, t.description, t.created_at, c.name, c.color, c.icon, c.type";

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                amount TEXT NOT NULL,
                type TEXT NOT NULL,
                category_id INTEGER,
                date TEXT NOT NULL,
                description TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON DELETE CASCADE,
                FOREIGN KEY(category_id) REFERENCES category(id) ON DELETE RESTRICT
                )",
        (),
    )?;

    // Composite index used by the date-windowed reports.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Create a new transaction for `user_id` in the database from a builder.
///
/// The caller should check the category with [check_transaction_category] first.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    user_id: UserID,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "INSERT INTO \"transaction\"
                (user_id, amount, type, category_id, date, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, user_id, amount, type, category_id, date, description, created_at",
        )?
        .query_row(
            (
                user_id.as_i64(),
                builder.amount.to_string(),
                builder.transaction_type,
                builder.category_id,
                builder.date,
                &builder.description,
                OffsetDateTime::now_utc(),
            ),
            map_transaction_row,
        )
        .map_err(|error| map_category_error(error, builder.category_id))
}

/// Retrieve one of the user's transactions with its category summary.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingTransaction] if `id` does not refer to one of the user's transactions,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<TransactionWithCategory, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_WITH_CATEGORY_COLUMNS}
             FROM \"transaction\" t LEFT JOIN category c ON c.id = t.category_id
             WHERE t.id = :id AND t.user_id = :user_id"
        ))?
        .query_one(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_transaction_with_category_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::MissingTransaction,
            error => error.into(),
        })
}

/// Replace the fields of one of the user's transactions.
///
/// # Errors
/// Returns [Error::MissingTransaction] if `id` does not refer to one of the user's transactions.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserID,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "UPDATE \"transaction\"
             SET amount = ?1, type = ?2, category_id = ?3, date = ?4, description = ?5
             WHERE id = ?6 AND user_id = ?7
             RETURNING id, user_id, amount, type, category_id, date, description, created_at",
        )?
        .query_row(
            (
                builder.amount.to_string(),
                builder.transaction_type,
                builder.category_id,
                builder.date,
                &builder.description,
                id,
                user_id.as_i64(),
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::MissingTransaction,
            error => map_category_error(error, builder.category_id),
        })
}

/// Delete one of the user's transactions.
///
/// # Errors
/// Returns [Error::MissingTransaction] if `id` does not refer to one of the user's transactions.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::MissingTransaction);
    }

    Ok(())
}

/// Get the number of transactions owned by `user_id`.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(user_id: UserID, connection: &Connection) -> Result<u64, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM \"transaction\" WHERE user_id = ?1",
            [user_id.as_i64()],
            |row| row.get::<_, i64>(0),
        )
        .map(|count| count as u64)
        .map_err(|error| error.into())
}

/// Get the user's transactions dated within `window`, bounds included.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_transactions_in_window(
    user_id: UserID,
    window: DateWindow,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" t
             WHERE t.user_id = ?1 AND t.date BETWEEN ?2 AND ?3
             ORDER BY t.date ASC, t.id ASC"
        ))?
        .query_map(
            (user_id.as_i64(), window.start_date, window.end_date),
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Get the user's `limit` most recently recorded transactions.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_recent_transactions(
    user_id: UserID,
    limit: u32,
    connection: &Connection,
) -> Result<Vec<TransactionWithCategory>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_WITH_CATEGORY_COLUMNS}
             FROM \"transaction\" t LEFT JOIN category c ON c.id = t.category_id
             WHERE t.user_id = ?1
             ORDER BY t.created_at DESC, t.id DESC
             LIMIT ?2"
        ))?
        .query_map((user_id.as_i64(), limit), map_transaction_with_category_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

fn map_category_error(error: rusqlite::Error, category_id: Option<CategoryId>) -> Error {
    match (error, category_id) {
        (
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ),
            Some(category_id),
        ) => Error::InvalidCategory(category_id),
        (error, _) => error.into(),
    }
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        amount: get_decimal(row, 2)?,
        transaction_type: row.get(3)?,
        category_id: row.get(4)?,
        date: row.get(5)?,
        description: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Map a row selected with the category columns appended to the transaction columns.
pub(crate) fn map_transaction_with_category_row(
    row: &Row,
) -> Result<TransactionWithCategory, rusqlite::Error> {
    let transaction = map_transaction_row(row)?;

    let category_name: Option<String> = row.get(8)?;
    let category = match (transaction.category_id, category_name) {
        (Some(id), Some(name)) => {
            let raw_color: String = row.get(9)?;
            Some(CategorySummary {
                id,
                name,
                color: CategoryColor::new_unchecked(&raw_color),
                icon: row.get(10)?,
                category_type: row.get(11)?,
            })
        }
        _ => None,
    };

    Ok(TransactionWithCategory {
        transaction,
        category,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod validation_tests {
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error, TransactionType,
        transaction::{Transaction, TransactionForm},
    };

    fn form(amount: rust_decimal::Decimal, date: time::Date) -> TransactionForm {
        TransactionForm {
            amount,
            transaction_type: TransactionType::Expense,
            category_id: None,
            date,
            description: Some("  Café  ".to_owned()),
        }
    }

    #[test]
    fn valid_form_builds_transaction() {
        let today = date!(2025 - 06 - 15);

        let builder = form(dec!(4.50), today).validate(today).unwrap();

        assert_eq!(
            builder,
            Transaction::build(dec!(4.50), TransactionType::Expense, today).description("Café")
        );
    }

    #[test]
    fn future_date_is_rejected() {
        let today = date!(2025 - 06 - 15);

        let result = form(dec!(4.50), date!(2025 - 06 - 16)).validate(today);

        assert_eq!(result, Err(Error::FutureDate(date!(2025 - 06 - 16))));
    }

    #[test]
    fn zero_amount_is_rejected() {
        let today = date!(2025 - 06 - 15);

        let result = form(dec!(0), today).validate(today);

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn long_description_is_rejected() {
        let today = date!(2025 - 06 - 15);
        let mut form = form(dec!(1), today);
        form.description = Some("a".repeat(501));

        assert!(matches!(form.validate(today), Err(Error::Validation(_))));
    }
}

//! Monthly budget models, validation and database queries.

use rusqlite::{Connection, Row};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error, TransactionType,
    category::{CategoryColor, CategoryId, CategorySummary, get_category},
    money::{get_decimal, validate_positive_amount},
    user::UserID,
    window::parse_month,
};

/// Database identifier for a monthly budget.
pub type BudgetId = i64;

/// The earliest year a budget may be set for.
pub const MIN_BUDGET_YEAR: i32 = 2020;

/// The latest year a budget may be set for.
pub const MAX_BUDGET_YEAR: i32 = 2030;

/// A spending limit for one expense category in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBudget {
    pub id: BudgetId,
    pub user_id: UserID,
    pub category_id: CategoryId,
    pub budget_amount: Decimal,
    /// The month number, 1 to 12.
    pub month: u8,
    pub year: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A budget along with a summary of its category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetWithCategory {
    #[serde(flatten)]
    pub budget: MonthlyBudget,
    pub category: CategorySummary,
}

/// The JSON body for creating or replacing a budget.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetForm {
    pub category_id: CategoryId,
    pub budget_amount: Decimal,
    pub month: u8,
    pub year: i32,
}

/// A validated budget, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    pub category_id: CategoryId,
    pub budget_amount: Decimal,
    pub month: u8,
    pub year: i32,
}

impl BudgetForm {
    /// Check the amount, month and year.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] describing the first rule that failed.
    pub fn validate(self) -> Result<NewBudget, Error> {
        let budget_amount = validate_positive_amount(self.budget_amount, "budgetAmount")?;
        parse_month(self.month)?;
        validate_year(self.year)?;

        Ok(NewBudget {
            category_id: self.category_id,
            budget_amount,
            month: self.month,
            year: self.year,
        })
    }
}

/// Check that budgets may be set for `year`.
///
/// # Errors
///
/// Returns [Error::Validation] if `year` is outside [MIN_BUDGET_YEAR] to [MAX_BUDGET_YEAR].
pub fn validate_year(year: i32) -> Result<i32, Error> {
    if !(MIN_BUDGET_YEAR..=MAX_BUDGET_YEAR).contains(&year) {
        return Err(Error::Validation(format!(
            "year must be between {MIN_BUDGET_YEAR} and {MAX_BUDGET_YEAR}"
        )));
    }

    Ok(year)
}

/// Check that `category_id` is one of the user's expense categories.
///
/// # Errors
///
/// Returns [Error::InvalidBudgetCategory] if the category does not belong to
/// the user or is an income category.
pub fn check_budget_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    match get_category(category_id, user_id, connection) {
        Ok(category) if category.category_type == TransactionType::Expense => Ok(()),
        Ok(_) | Err(Error::MissingCategory) => Err(Error::InvalidBudgetCategory),
        Err(error) => Err(error),
    }
}

const BUDGET_WITH_CATEGORY_COLUMNS: &str = "b.id, b.user_id, b.category_id, b.budget_amount, b.month, b.year, b.created_at, c.name, c.color, c.icon, c.type";

/// Create the monthly budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS monthly_budget (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                category_id INTEGER NOT NULL,
                budget_amount TEXT NOT NULL,
                month INTEGER NOT NULL,
                year INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE(user_id, category_id, month, year),
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Set the budget for a category and month, replacing the amount of an
/// existing budget for the same category and month.
///
/// The caller should check the category with [check_budget_category] first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn upsert_budget(
    user_id: UserID,
    budget: NewBudget,
    connection: &Connection,
) -> Result<BudgetWithCategory, Error> {
    let id: BudgetId = connection.query_row(
        "INSERT INTO monthly_budget (user_id, category_id, budget_amount, month, year, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(user_id, category_id, month, year)
         DO UPDATE SET budget_amount = excluded.budget_amount
         RETURNING id",
        (
            user_id.as_i64(),
            budget.category_id,
            budget.budget_amount.to_string(),
            budget.month,
            budget.year,
            OffsetDateTime::now_utc(),
        ),
        |row| row.get(0),
    )?;

    get_budget(id, user_id, connection)
}

/// Retrieve one of the user's budgets with its category.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingBudget] if `id` does not refer to one of the user's budgets,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_budget(
    id: BudgetId,
    user_id: UserID,
    connection: &Connection,
) -> Result<BudgetWithCategory, Error> {
    connection
        .prepare(&format!(
            "SELECT {BUDGET_WITH_CATEGORY_COLUMNS}
             FROM monthly_budget b INNER JOIN category c ON c.id = b.category_id
             WHERE b.id = ?1 AND b.user_id = ?2"
        ))?
        .query_one((id, user_id.as_i64()), map_budget_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::MissingBudget,
            error => error.into(),
        })
}

/// Get the user's budgets for `month` of `year`, ordered by category name.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_budgets_for_month(
    user_id: UserID,
    month: u8,
    year: i32,
    connection: &Connection,
) -> Result<Vec<BudgetWithCategory>, Error> {
    connection
        .prepare(&format!(
            "SELECT {BUDGET_WITH_CATEGORY_COLUMNS}
             FROM monthly_budget b INNER JOIN category c ON c.id = b.category_id
             WHERE b.user_id = ?1 AND b.month = ?2 AND b.year = ?3
             ORDER BY c.name ASC, b.id ASC"
        ))?
        .query_map((user_id.as_i64(), month, year), map_budget_row)?
        .map(|maybe_budget| maybe_budget.map_err(|error| error.into()))
        .collect()
}

/// Delete one of the user's budgets.
///
/// # Errors
/// Returns [Error::MissingBudget] if `id` does not refer to one of the user's budgets.
pub fn delete_budget(id: BudgetId, user_id: UserID, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM monthly_budget WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::MissingBudget);
    }

    Ok(())
}

fn map_budget_row(row: &Row) -> Result<BudgetWithCategory, rusqlite::Error> {
    let category_id = row.get(2)?;
    let raw_color: String = row.get(8)?;

    Ok(BudgetWithCategory {
        budget: MonthlyBudget {
            id: row.get(0)?,
            user_id: UserID::new(row.get(1)?),
            category_id,
            budget_amount: get_decimal(row, 3)?,
            month: row.get(4)?,
            year: row.get(5)?,
            created_at: row.get(6)?,
        },
        category: CategorySummary {
            id: category_id,
            name: row.get(7)?,
            color: CategoryColor::new_unchecked(&raw_color),
            icon: row.get(9)?,
            category_type: row.get(10)?,
        },
    })
}

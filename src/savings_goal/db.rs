//! Database access for savings goals.

use rusqlite::{Connection, Row};
use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::{
    Error,
    money::{add_amounts, get_decimal},
    savings_goal::{NewSavingsGoal, SavingsGoal, SavingsGoalId, SavingsGoalUpdate, is_achieved},
    user::UserID,
};

const SAVINGS_GOAL_COLUMNS: &str =
    "id, user_id, name, target_amount, current_amount, target_date, is_achieved, created_at";

/// Create the savings goal table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_savings_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS savings_goal (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                target_amount TEXT NOT NULL,
                current_amount TEXT NOT NULL DEFAULT '0',
                target_date TEXT,
                is_achieved INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Insert a new savings goal with nothing saved yet.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn create_savings_goal(
    user_id: UserID,
    goal: NewSavingsGoal,
    connection: &Connection,
) -> Result<SavingsGoal, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO savings_goal
                (user_id, name, target_amount, current_amount, target_date, is_achieved, created_at)
             VALUES (?1, ?2, ?3, '0', ?4, 0, ?5)
             RETURNING {SAVINGS_GOAL_COLUMNS}"
        ))?
        .query_row(
            (
                user_id.as_i64(),
                &goal.name,
                goal.target_amount.to_string(),
                goal.target_date,
                OffsetDateTime::now_utc(),
            ),
            map_savings_goal_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve one of the user's savings goals.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingSavingsGoal] if `id` does not refer to one of the user's goals,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_savings_goal(
    id: SavingsGoalId,
    user_id: UserID,
    connection: &Connection,
) -> Result<SavingsGoal, Error> {
    connection
        .prepare(&format!(
            "SELECT {SAVINGS_GOAL_COLUMNS} FROM savings_goal WHERE id = ?1 AND user_id = ?2"
        ))?
        .query_one((id, user_id.as_i64()), map_savings_goal_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::MissingSavingsGoal,
            error => error.into(),
        })
}

/// Get the user's savings goals, optionally only those with the given achieved status.
///
/// Unachieved goals come first, then goals by nearest target date (goals
/// without one last), then the most recently created.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_savings_goals(
    user_id: UserID,
    achieved: Option<bool>,
    connection: &Connection,
) -> Result<Vec<SavingsGoal>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SAVINGS_GOAL_COLUMNS} FROM savings_goal
             WHERE user_id = ?1 AND (?2 IS NULL OR is_achieved = ?2)
             ORDER BY is_achieved ASC, target_date IS NULL, target_date ASC,
                      created_at DESC, id DESC"
        ))?
        .query_map((user_id.as_i64(), achieved), map_savings_goal_row)?
        .map(|maybe_goal| maybe_goal.map_err(|error| error.into()))
        .collect()
}

/// Apply `update` to one of the user's savings goals.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingSavingsGoal] if `id` does not refer to one of the user's goals,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_savings_goal(
    id: SavingsGoalId,
    user_id: UserID,
    update: SavingsGoalUpdate,
    connection: &Connection,
) -> Result<SavingsGoal, Error> {
    let goal = update.apply_to(get_savings_goal(id, user_id, connection)?);
    save_savings_goal(&goal, connection)?;

    Ok(goal)
}

/// Add `amount` to the money saved for one of the user's goals.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingSavingsGoal] if `id` does not refer to one of the user's goals,
/// - [Error::Validation] if the new total would be above [MAX_AMOUNT](crate::money::MAX_AMOUNT),
/// - or [Error::SqlError] there is some other SQL error.
pub fn add_money_to_savings_goal(
    id: SavingsGoalId,
    user_id: UserID,
    amount: Decimal,
    connection: &Connection,
) -> Result<SavingsGoal, Error> {
    let mut goal = get_savings_goal(id, user_id, connection)?;
    goal.current_amount = add_amounts(goal.current_amount, amount, "currentAmount")?;
    goal.is_achieved = is_achieved(goal.current_amount, goal.target_amount);
    save_savings_goal(&goal, connection)?;

    Ok(goal)
}

fn save_savings_goal(goal: &SavingsGoal, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "UPDATE savings_goal
         SET name = ?1, target_amount = ?2, current_amount = ?3, target_date = ?4, is_achieved = ?5
         WHERE id = ?6 AND user_id = ?7",
        (
            &goal.name,
            goal.target_amount.to_string(),
            goal.current_amount.to_string(),
            goal.target_date,
            goal.is_achieved,
            goal.id,
            goal.user_id.as_i64(),
        ),
    )?;

    Ok(())
}

/// Delete one of the user's savings goals.
///
/// # Errors
/// Returns [Error::MissingSavingsGoal] if `id` does not refer to one of the user's goals.
pub fn delete_savings_goal(
    id: SavingsGoalId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM savings_goal WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::MissingSavingsGoal);
    }

    Ok(())
}

/// Get the number of savings goals owned by `user_id`.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_savings_goals(user_id: UserID, connection: &Connection) -> Result<u64, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM savings_goal WHERE user_id = ?1",
            [user_id.as_i64()],
            |row| row.get::<_, i64>(0),
        )
        .map(|count| count as u64)
        .map_err(|error| error.into())
}

fn map_savings_goal_row(row: &Row) -> Result<SavingsGoal, rusqlite::Error> {
    Ok(SavingsGoal {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: row.get(2)?,
        target_amount: get_decimal(row, 3)?,
        current_amount: get_decimal(row, 4)?,
        target_date: row.get(5)?,
        is_achieved: row.get(6)?,
        created_at: row.get(7)?,
    })
}

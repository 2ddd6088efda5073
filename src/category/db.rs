//! Database operations for categories.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error, TransactionType,
    category::{
        Category, CategoryColor, CategoryId, CategoryWithCount, NewCategory,
        domain::DEFAULT_CATEGORIES,
    },
    db::{is_foreign_key_violation, is_unique_violation},
    user::UserID,
};

/// Create the category table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                type TEXT NOT NULL,
                color TEXT NOT NULL,
                icon TEXT,
                created_at TEXT NOT NULL,
                UNIQUE(user_id, name, type),
                FOREIGN KEY(user_id) REFERENCES user(id) ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

const CATEGORY_COLUMNS: &str = "id, user_id, name, type, color, icon, created_at";

/// Create a category for `user_id` and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::DuplicateCategory] if the user already has a category with
/// the same name and type.
pub fn create_category(
    user_id: UserID,
    category: NewCategory,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO category (user_id, name, type, color, icon, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {CATEGORY_COLUMNS}"
        ))?
        .query_row(
            (
                user_id.as_i64(),
                &category.name,
                category.category_type,
                category.color.as_ref(),
                &category.icon,
                OffsetDateTime::now_utc(),
            ),
            map_category_row,
        )
        .map_err(map_write_error)
}

/// Create the default income and expense categories for a new user.
///
/// # Errors
///
/// Returns an error if any category could not be inserted.
pub fn create_default_categories(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(name, category_type, color, icon)| {
            create_category(
                user_id,
                NewCategory {
                    name: (*name).to_owned(),
                    category_type: *category_type,
                    color: CategoryColor::new_unchecked(color),
                    icon: Some((*icon).to_owned()),
                },
                connection,
            )
        })
        .collect()
}

/// Retrieve one of the user's categories by ID.
///
/// # Errors
///
/// Returns [Error::MissingCategory] if the category does not exist or belongs to another user.
pub fn get_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM category WHERE id = :id AND user_id = :user_id"
        ))?
        .query_row(
            &[(":id", &category_id), (":user_id", &user_id.as_i64())],
            map_category_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::MissingCategory,
            error => error.into(),
        })
}

/// Retrieve all of the user's categories ordered by type and then name.
pub fn get_categories(user_id: UserID, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM category WHERE user_id = :user_id
             ORDER BY type ASC, name ASC"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the user's categories with the number of transactions using each.
///
/// When `type_filter` is given only categories of that type are returned.
pub fn get_categories_with_counts(
    user_id: UserID,
    type_filter: Option<TransactionType>,
    connection: &Connection,
) -> Result<Vec<CategoryWithCount>, Error> {
    connection
        .prepare(
            "SELECT c.id, c.user_id, c.name, c.type, c.color, c.icon, c.created_at,
                    COUNT(t.id)
             FROM category c
             LEFT JOIN \"transaction\" t ON t.category_id = c.id
             WHERE c.user_id = ?1 AND (?2 IS NULL OR c.type = ?2)
             GROUP BY c.id
             ORDER BY c.type ASC, c.name ASC",
        )?
        .query_map((user_id.as_i64(), type_filter), |row| {
            let category = map_category_row(row)?;
            let transaction_count: i64 = row.get(7)?;

            Ok(CategoryWithCount {
                category,
                transaction_count: transaction_count as u64,
            })
        })?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Replace the name, type, color and icon of one of the user's categories.
///
/// # Errors
///
/// Returns [Error::MissingCategory] if the category does not exist or belongs
/// to another user, or [Error::DuplicateCategory] if the new name and type
/// clash with another of the user's categories.
pub fn update_category(
    category_id: CategoryId,
    user_id: UserID,
    category: NewCategory,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(&format!(
            "UPDATE category SET name = ?1, type = ?2, color = ?3, icon = ?4
             WHERE id = ?5 AND user_id = ?6
             RETURNING {CATEGORY_COLUMNS}"
        ))?
        .query_row(
            (
                &category.name,
                category.category_type,
                category.color.as_ref(),
                &category.icon,
                category_id,
                user_id.as_i64(),
            ),
            map_category_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::MissingCategory,
            error => map_write_error(error),
        })
}

/// Delete one of the user's categories.
///
/// # Errors
///
/// Returns [Error::CategoryInUse] if any transaction references the category,
/// or [Error::MissingCategory] if it does not exist or belongs to another user.
pub fn delete_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let transaction_count: i64 = connection.query_row(
        "SELECT COUNT(id) FROM \"transaction\" WHERE category_id = ?1 AND user_id = ?2",
        (category_id, user_id.as_i64()),
        |row| row.get(0),
    )?;

    if transaction_count > 0 {
        return Err(Error::CategoryInUse);
    }

    let rows_affected = connection
        .execute(
            "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
            (category_id, user_id.as_i64()),
        )
        .map_err(|error| {
            if is_foreign_key_violation(&error) {
                Error::CategoryInUse
            } else {
                error.into()
            }
        })?;

    if rows_affected == 0 {
        return Err(Error::MissingCategory);
    }

    Ok(())
}

/// Count the categories owned by `user_id`.
pub fn count_categories(user_id: UserID, connection: &Connection) -> Result<u64, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM category WHERE user_id = ?1",
            [user_id.as_i64()],
            |row| row.get::<_, i64>(0),
        )
        .map(|count| count as u64)
        .map_err(|error| error.into())
}

fn map_write_error(error: rusqlite::Error) -> Error {
    if is_unique_violation(&error) {
        Error::DuplicateCategory
    } else {
        error.into()
    }
}

pub(crate) fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let raw_color: String = row.get(4)?;

    Ok(Category {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: row.get(2)?,
        category_type: row.get(3)?,
        color: CategoryColor::new_unchecked(&raw_color),
        icon: row.get(5)?,
        created_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        Error, PasswordHash, TransactionType,
        category::{
            CategoryColor, NewCategory, count_categories, create_category,
            create_default_categories, delete_category, get_categories,
            get_categories_with_counts, get_category, update_category,
        },
        initialize_db,
        user::{User, create_user},
    };

    fn get_test_connection() -> (Connection, User) {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        let user = create_user(
            "Ana",
            "ana@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        (connection, user)
    }

    fn new_category(name: &str, category_type: TransactionType) -> NewCategory {
        NewCategory {
            name: name.to_owned(),
            category_type,
            color: CategoryColor::new_unchecked("#123456"),
            icon: None,
        }
    }

    #[test]
    fn create_and_get_category() {
        let (connection, user) = get_test_connection();

        let created = create_category(
            user.id,
            new_category("Mascotas", TransactionType::Expense),
            &connection,
        )
        .unwrap();
        let fetched = get_category(created.id, user.id, &connection).unwrap();

        assert_eq!(created, fetched);
    }

    #[test]
    fn same_name_with_other_type_is_allowed() {
        let (connection, user) = get_test_connection();
        create_category(
            user.id,
            new_category("Regalos", TransactionType::Expense),
            &connection,
        )
        .unwrap();

        let result = create_category(
            user.id,
            new_category("Regalos", TransactionType::Income),
            &connection,
        );

        assert!(result.is_ok());
    }

    #[test]
    fn duplicate_name_and_type_is_rejected() {
        let (connection, user) = get_test_connection();
        create_category(
            user.id,
            new_category("Regalos", TransactionType::Expense),
            &connection,
        )
        .unwrap();

        let result = create_category(
            user.id,
            new_category("Regalos", TransactionType::Expense),
            &connection,
        );

        assert_eq!(result, Err(Error::DuplicateCategory));
    }

    #[test]
    fn other_users_category_is_missing() {
        let (connection, user) = get_test_connection();
        let other = create_user(
            "Bob",
            "bob@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();
        let category = create_category(
            user.id,
            new_category("Mascotas", TransactionType::Expense),
            &connection,
        )
        .unwrap();

        assert_eq!(
            get_category(category.id, other.id, &connection),
            Err(Error::MissingCategory)
        );
        assert_eq!(
            delete_category(category.id, other.id, &connection),
            Err(Error::MissingCategory)
        );
    }

    #[test]
    fn default_categories_are_created() {
        let (connection, user) = get_test_connection();

        let categories = create_default_categories(user.id, &connection).unwrap();

        assert_eq!(categories.len(), 10);
        assert_eq!(count_categories(user.id, &connection), Ok(10));
    }

    #[test]
    fn categories_are_ordered_by_type_then_name() {
        let (connection, user) = get_test_connection();
        create_category(user.id, new_category("Zeta", TransactionType::Income), &connection)
            .unwrap();
        create_category(user.id, new_category("Beta", TransactionType::Expense), &connection)
            .unwrap();
        create_category(user.id, new_category("Alfa", TransactionType::Expense), &connection)
            .unwrap();

        let names: Vec<String> = get_categories(user.id, &connection)
            .unwrap()
            .into_iter()
            .map(|category| category.name)
            .collect();

        assert_eq!(names, ["Alfa", "Beta", "Zeta"]);
    }

    #[test]
    fn counts_filter_by_type() {
        let (connection, user) = get_test_connection();
        create_default_categories(user.id, &connection).unwrap();

        let income =
            get_categories_with_counts(user.id, Some(TransactionType::Income), &connection)
                .unwrap();

        assert_eq!(income.len(), 3);
        assert!(income.iter().all(|c| c.transaction_count == 0));
    }

    #[test]
    fn update_changes_fields() {
        let (connection, user) = get_test_connection();
        let category = create_category(
            user.id,
            new_category("Mascotas", TransactionType::Expense),
            &connection,
        )
        .unwrap();

        let updated = update_category(
            category.id,
            user.id,
            NewCategory {
                icon: Some("paw".to_owned()),
                ..new_category("Perros", TransactionType::Expense)
            },
            &connection,
        )
        .unwrap();

        assert_eq!(updated.name, "Perros");
        assert_eq!(updated.icon.as_deref(), Some("paw"));
    }

    #[test]
    fn delete_unused_category_succeeds() {
        let (connection, user) = get_test_connection();
        let category = create_category(
            user.id,
            new_category("Mascotas", TransactionType::Expense),
            &connection,
        )
        .unwrap();

        delete_category(category.id, user.id, &connection).unwrap();

        assert_eq!(
            get_category(category.id, user.id, &connection),
            Err(Error::MissingCategory)
        );
    }
}

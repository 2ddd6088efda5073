//! Filtered, paginated transaction queries.

use rusqlite::{Connection, named_params};
use time::Date;

use crate::{
    Error, TransactionType,
    category::CategoryId,
    pagination::PageRequest,
    transaction::{
        TransactionWithCategory,
        core::{TRANSACTION_WITH_CATEGORY_COLUMNS, map_transaction_with_category_row},
    },
    user::UserID,
};

/// Optional filters for listing transactions. `None` fields match everything.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
    pub category_id: Option<CategoryId>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    /// Case-insensitive text to look for in the description or the category name.
    pub search: Option<String>,
}

const FILTER_CLAUSE: &str = "
    FROM \"transaction\" t LEFT JOIN category c ON c.id = t.category_id
    WHERE t.user_id = :user_id
      AND (:type IS NULL OR t.type = :type)
      AND (:category_id IS NULL OR t.category_id = :category_id)
      AND (:start_date IS NULL OR t.date >= :start_date)
      AND (:end_date IS NULL OR t.date <= :end_date)
      AND (:search IS NULL
           OR t.description LIKE :search ESCAPE '\\'
           OR c.name LIKE :search ESCAPE '\\')";

/// Get one page of the user's transactions matching `filter`, newest first,
/// along with the total number of matching transactions.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn query_transactions(
    user_id: UserID,
    filter: &TransactionFilter,
    page: PageRequest,
    connection: &Connection,
) -> Result<(Vec<TransactionWithCategory>, u64), Error> {
    let search_pattern = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|search| !search.is_empty())
        .map(like_pattern);

    let total: i64 = connection.query_row(
        &format!("SELECT COUNT(t.id) {FILTER_CLAUSE}"),
        named_params! {
            ":user_id": user_id.as_i64(),
            ":type": filter.transaction_type,
            ":category_id": filter.category_id,
            ":start_date": filter.start_date,
            ":end_date": filter.end_date,
            ":search": search_pattern,
        },
        |row| row.get(0),
    )?;

    let transactions = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_WITH_CATEGORY_COLUMNS} {FILTER_CLAUSE}
             ORDER BY t.date DESC, t.id DESC
             LIMIT :limit OFFSET :offset"
        ))?
        .query_map(
            named_params! {
                ":user_id": user_id.as_i64(),
                ":type": filter.transaction_type,
                ":category_id": filter.category_id,
                ":start_date": filter.start_date,
                ":end_date": filter.end_date,
                ":search": search_pattern,
                ":limit": i64::try_from(page.limit).unwrap_or(i64::MAX),
                ":offset": i64::try_from(page.offset()).unwrap_or(i64::MAX),
            },
            map_transaction_with_category_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect::<Result<Vec<_>, Error>>()?;

    Ok((transactions, total as u64))
}

/// Wrap `search` in wildcards, escaping the LIKE metacharacters it contains.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');

    pattern
}

//! Filtered queries for listing expenses joined with their categories.

use rusqlite::{Connection, Row, ToSql};
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName},
    expense::ExpenseId,
    user::UserId,
};

/// The query parameters accepted by the expense listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseQuery {
    /// Restrict results to one calendar month, given as `YYYY-MM`.
    pub month: Option<String>,
    /// Restrict results to expenses whose category name matches exactly.
    pub category: Option<String>,
}

/// An expense joined with its category, as served to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseWithCategory {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The amount of money spent.
    pub amount: f64,
    /// The calendar day the money was spent on.
    pub date: Date,
    /// An optional text description of what the expense was for.
    pub description: Option<String>,
    /// The ID of the category the expense belongs to.
    pub category_id: CategoryId,
    /// The ID of the user the expense belongs to.
    pub user_id: UserId,
    /// The category the expense belongs to.
    pub category: Category,
}

/// A half-open date interval covering one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MonthRange {
    /// The first day of the month.
    pub start: Date,
    /// The first day of the following month (excluded from the range).
    pub end: Date,
}

/// Parse a `YYYY-MM` token into the month range it names.
///
/// Returns `None` for tokens that do not parse to a valid year and month;
/// callers treat that as no month filter at all rather than an error.
pub(crate) fn parse_month_token(token: &str) -> Option<MonthRange> {
    let (year, month) = token.split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: u8 = month.parse().ok()?;
    let month = Month::try_from(month).ok()?;

    let start = Date::from_calendar_date(year, month, 1).ok()?;
    let end = match month {
        Month::December => Date::from_calendar_date(year + 1, Month::January, 1),
        month => Date::from_calendar_date(year, month.next(), 1),
    }
    .ok()?;

    Some(MonthRange { start, end })
}

/// Get a user's expenses matching `query`, joined with their categories and
/// sorted by ascending date.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Expense row mapping fails
pub fn get_expenses(
    query: &ExpenseQuery,
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<ExpenseWithCategory>, Error> {
    let month_range = query.month.as_deref().and_then(parse_month_token);

    let mut sql = String::from(
        "SELECT expense.id, expense.amount, expense.date, expense.description, \
         expense.category_id, expense.user_id, category.id, category.name, category.user_id \
         FROM expense \
         INNER JOIN category ON expense.category_id = category.id \
         WHERE expense.user_id = :user_id",
    );

    let user_id_value = user_id.as_i64();
    let mut params: Vec<(&str, &dyn ToSql)> = vec![(":user_id", &user_id_value)];

    if let Some(range) = &month_range {
        sql.push_str(" AND expense.date >= :month_start AND expense.date < :month_end");
        params.push((":month_start", &range.start));
        params.push((":month_end", &range.end));
    }

    if let Some(category_name) = &query.category {
        sql.push_str(" AND category.name = :category_name");
        params.push((":category_name", category_name));
    }

    // Sort by date, and then ID to keep expense order stable after updates
    sql.push_str(" ORDER BY expense.date ASC, expense.id ASC");

    connection
        .prepare(&sql)?
        .query_map(params.as_slice(), map_expense_with_category_row)?
        .map(|maybe_expense| maybe_expense.map_err(Error::SqlError))
        .collect()
}

/// Retrieve a single expense owned by `user_id`, joined with its category.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an expense owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_expense_with_category(
    id: ExpenseId,
    user_id: UserId,
    connection: &Connection,
) -> Result<ExpenseWithCategory, Error> {
    connection
        .prepare(
            "SELECT expense.id, expense.amount, expense.date, expense.description, \
             expense.category_id, expense.user_id, category.id, category.name, category.user_id \
             FROM expense \
             INNER JOIN category ON expense.category_id = category.id \
             WHERE expense.id = :id AND expense.user_id = :user_id",
        )?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_expense_with_category_row,
        )
        .map_err(|error| error.into())
}

fn map_expense_with_category_row(row: &Row) -> Result<ExpenseWithCategory, rusqlite::Error> {
    let raw_category_name: String = row.get(7)?;

    Ok(ExpenseWithCategory {
        id: row.get(0)?,
        amount: row.get(1)?,
        date: row.get(2)?,
        description: row.get(3)?,
        category_id: row.get(4)?,
        user_id: UserId::new(row.get(5)?),
        category: Category {
            id: row.get(6)?,
            name: CategoryName::new_unchecked(&raw_category_name),
            user_id: UserId::new(row.get(8)?),
        },
    })
}

#[cfg(test)]
mod month_token_tests {
    use time::macros::date;

    use super::{MonthRange, parse_month_token};

    #[test]
    fn parses_valid_token() {
        let range = parse_month_token("2025-01");

        assert_eq!(
            range,
            Some(MonthRange {
                start: date!(2025 - 01 - 01),
                end: date!(2025 - 02 - 01),
            })
        );
    }

    #[test]
    fn december_rolls_over_to_next_year() {
        let range = parse_month_token("2025-12");

        assert_eq!(
            range,
            Some(MonthRange {
                start: date!(2025 - 12 - 01),
                end: date!(2026 - 01 - 01),
            })
        );
    }

    #[test]
    fn rejects_malformed_tokens() {
        for token in ["", "2025", "garbage", "2025-13", "2025-00", "01-2025", "2025-01-15"] {
            assert_eq!(parse_month_token(token), None, "token {token:?} should not parse");
        }
    }
}

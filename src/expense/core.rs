//! Defines the core data model and database queries for expenses.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, category::CategoryId, user::UserId};

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// Money spent on a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The amount of money spent.
    pub amount: f64,
    /// The calendar day the money was spent on. There is no time-of-day component.
    pub date: Date,
    /// An optional text description of what the expense was for.
    pub description: Option<String>,
    /// The ID of the category the expense belongs to.
    pub category_id: CategoryId,
    /// The ID of the user the expense belongs to.
    pub user_id: UserId,
}

/// The fields needed to create an expense or replace an existing one.
///
/// The category must already exist and belong to the same user as the
/// expense; callers resolve category names through
/// [crate::category::get_or_create_category] first.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    /// The amount of money spent.
    pub amount: f64,
    /// The calendar day the money was spent on.
    pub date: Date,
    /// An optional text description of what the expense was for.
    pub description: Option<String>,
    /// The ID of the category the expense belongs to.
    pub category_id: CategoryId,
}

/// Create a new expense in the database for `user_id`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error,
/// including when `category_id` does not refer to a real category.
pub fn create_expense(
    draft: ExpenseDraft,
    user_id: UserId,
    connection: &Connection,
) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "INSERT INTO expense (amount, date, description, category_id, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, amount, date, description, category_id, user_id",
        )?
        .query_row(
            (
                draft.amount,
                draft.date,
                draft.description,
                draft.category_id,
                user_id.as_i64(),
            ),
            map_expense_row,
        )?;

    Ok(expense)
}

/// Retrieve an expense from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "SELECT id, amount, date, description, category_id, user_id FROM expense WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_expense_row)?;

    Ok(expense)
}

/// Replace the stored fields of the expense `id` belonging to `user_id`.
///
/// Expenses belonging to other users are not touched.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingExpense] if `id` does not refer to an expense owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_expense(
    id: ExpenseId,
    draft: ExpenseDraft,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE expense SET amount = ?1, date = ?2, description = ?3, category_id = ?4
         WHERE id = ?5 AND user_id = ?6",
        (
            draft.amount,
            draft.date,
            draft.description,
            draft.category_id,
            id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingExpense);
    }

    Ok(())
}

/// Delete the expense `id` belonging to `user_id`.
///
/// Expenses belonging to other users are not touched.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingExpense] if `id` does not refer to an expense owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_expense(
    id: ExpenseId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM expense WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

/// Get the number of expenses `user_id` has in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn count_expenses(user_id: UserId, connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM expense WHERE user_id = ?1",
            [user_id.as_i64()],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                description TEXT,
                category_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                );

        CREATE INDEX IF NOT EXISTS idx_expense_user_date ON expense(user_id, date);",
    )?;

    Ok(())
}

/// Map a database row to an [Expense].
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        amount: row.get(1)?,
        date: row.get(2)?,
        description: row.get(3)?,
        category_id: row.get(4)?,
        user_id: UserId::new(row.get(5)?),
    })
}

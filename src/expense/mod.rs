//! Expense management for the tracker.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model and `ExpenseDraft` for creating and replacing expenses
//! - Database functions for storing, filtering, and managing expenses
//! - The JSON endpoints for listing, creating, updating, and deleting expenses

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod list_endpoint;
mod query;

pub use self::core::{
    Expense, ExpenseDraft, ExpenseId, count_expenses, create_expense, create_expense_table,
    map_expense_row,
};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use edit_endpoint::edit_expense_endpoint;
pub use form::ExpenseData;
pub use list_endpoint::list_expenses_endpoint;
pub use query::{ExpenseQuery, ExpenseWithCategory, get_expense_with_category, get_expenses};

#[cfg(test)]
pub use self::core::get_expense;

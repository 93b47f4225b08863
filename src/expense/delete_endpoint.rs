//! Defines the endpoint for deleting an expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;

use crate::{
    AppState,
    expense::{ExpenseId, core::delete_expense},
    user::ensure_demo_user,
};

/// The state needed to delete an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The email address identifying the demo user.
    pub demo_user_email: String,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            demo_user_email: state.demo_user_email.clone(),
        }
    }
}

/// A route handler for deleting an expense, responds with no content on success.
///
/// The expense must belong to the demo user, otherwise the request is
/// rejected and nothing is deleted.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    Path(expense_id): Path<ExpenseId>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    let user = match ensure_demo_user(&state.demo_user_email, &connection) {
        Ok(user) => user,
        Err(error) => return error.into_response(),
    };

    match delete_expense(expense_id, user.id, &connection) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => {
            tracing::error!("Could not delete expense {expense_id}: {error}");
            error.into_response()
        }
    }
}

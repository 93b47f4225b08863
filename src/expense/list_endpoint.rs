//! Defines the endpoint for listing expenses with optional filters.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::IntoResponse,
};
use rusqlite::Connection;

use crate::{
    AppState,
    expense::query::{ExpenseQuery, get_expenses},
    user::ensure_demo_user,
};

/// The state needed to list expenses.
#[derive(Debug, Clone)]
pub struct ListExpensesState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The email address identifying the demo user.
    pub demo_user_email: String,
}

impl FromRef<AppState> for ListExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            demo_user_email: state.demo_user_email.clone(),
        }
    }
}

/// A route handler for listing the demo user's expenses as JSON.
///
/// Supports optional `month` (`YYYY-MM`) and `category` query parameters.
/// A malformed month token is ignored rather than rejected.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_expenses_endpoint(
    State(state): State<ListExpensesState>,
    Query(query): Query<ExpenseQuery>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    let user = match ensure_demo_user(&state.demo_user_email, &connection) {
        Ok(user) => user,
        Err(error) => return error.into_response(),
    };

    match get_expenses(&query, user.id, &connection) {
        Ok(expenses) => Json(expenses).into_response(),
        Err(error) => error.into_response(),
    }
}

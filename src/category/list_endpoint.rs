//! Defines the endpoint for listing the demo user's categories.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;

use crate::{AppState, category::get_all_categories, user::ensure_demo_user};

/// The state needed to list categories.
#[derive(Debug, Clone)]
pub struct ListCategoriesState {
    /// The database connection for reading categories.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The email address identifying the demo user.
    pub demo_user_email: String,
}

impl FromRef<AppState> for ListCategoriesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            demo_user_email: state.demo_user_email.clone(),
        }
    }
}

/// A route handler for listing the demo user's categories as JSON.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_categories_endpoint(
    State(state): State<ListCategoriesState>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    let user = match ensure_demo_user(&state.demo_user_email, &connection) {
        Ok(user) => user,
        Err(error) => return error.into_response(),
    };

    match get_all_categories(user.id, &connection) {
        Ok(categories) => Json(categories).into_response(),
        Err(error) => error.into_response(),
    }
}

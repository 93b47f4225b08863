//! Defines the endpoint for creating a new expense.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::get_or_create_category,
    expense::{
        ExpenseDraft,
        core::create_expense,
        form::{ExpenseData, ValidatedExpenseData},
        query::{ExpenseWithCategory, get_expense_with_category},
    },
    user::ensure_demo_user,
};

/// The state needed to create an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The email address identifying the demo user.
    pub demo_user_email: String,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            demo_user_email: state.demo_user_email.clone(),
        }
    }
}

/// A route handler for creating a new expense, responds with the created
/// expense and its category on success.
///
/// A category name that has not been seen before is created on the fly.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Json(data): Json<ExpenseData>,
) -> impl IntoResponse {
    let form = match data.validate() {
        Ok(form) => form,
        Err(error) => return error.into_response(),
    };

    let connection = state.db_connection.lock().unwrap();

    match create_expense_from_form(form, &state.demo_user_email, &connection) {
        Ok(expense) => (StatusCode::CREATED, Json(expense)).into_response(),
        Err(error) => error.into_response(),
    }
}

fn create_expense_from_form(
    form: ValidatedExpenseData,
    demo_user_email: &str,
    connection: &Connection,
) -> Result<ExpenseWithCategory, Error> {
    let user = ensure_demo_user(demo_user_email, connection)?;
    let category = get_or_create_category(form.category_name, user.id, connection)?;

    let expense = create_expense(
        ExpenseDraft {
            amount: form.amount,
            date: form.date,
            description: form.description,
            category_id: category.id,
        },
        user.id,
        connection,
    )?;

    get_expense_with_category(expense.id, user.id, connection)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;
    use serde_json::Value;
    use time::macros::date;

    use crate::db::initialize;

    use super::{CreateExpenseState, ExpenseData, create_expense_endpoint};

    fn get_test_state() -> CreateExpenseState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        CreateExpenseState {
            db_connection: Arc::new(Mutex::new(connection)),
            demo_user_email: "demo@example.com".to_owned(),
        }
    }

    fn complete_form() -> ExpenseData {
        ExpenseData {
            amount: Some(12.3),
            date: Some(date!(2025 - 01 - 15)),
            category_name: Some("Groceries".to_owned()),
            description: Some("weekly shop".to_owned()),
        }
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        serde_json::from_slice(&body).expect("response body should be JSON")
    }

    #[tokio::test]
    async fn can_create_expense() {
        let state = get_test_state();

        let response = create_expense_endpoint(State(state.clone()), Json(complete_form()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        let expense = response_json(response).await;
        assert_eq!(expense["amount"], 12.3);
        assert_eq!(expense["date"], "2025-01-15");
        assert_eq!(expense["description"], "weekly shop");
        assert_eq!(expense["category"]["name"], "Groceries");
    }

    #[tokio::test]
    async fn unseen_category_name_creates_exactly_one_category() {
        let state = get_test_state();

        create_expense_endpoint(State(state.clone()), Json(complete_form()))
            .await
            .into_response();
        create_expense_endpoint(State(state.clone()), Json(complete_form()))
            .await
            .into_response();

        let connection = state.db_connection.lock().unwrap();
        let count: i64 = connection
            .query_row("SELECT COUNT(id) FROM category", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1, "want exactly one category row, got {count}");
    }

    #[tokio::test]
    async fn create_expense_fails_on_missing_amount() {
        let state = get_test_state();
        let form = ExpenseData {
            amount: None,
            ..complete_form()
        };

        let response = create_expense_endpoint(State(state.clone()), Json(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert_eq!(body["error"], "missing required field: amount");

        let connection = state.db_connection.lock().unwrap();
        let count: i64 = connection
            .query_row("SELECT COUNT(id) FROM expense", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0, "no expense should be created, got {count}");
    }

    #[tokio::test]
    async fn create_expense_fails_on_empty_category_name() {
        let state = get_test_state();
        let form = ExpenseData {
            category_name: Some("".to_owned()),
            ..complete_form()
        };

        let response = create_expense_endpoint(State(state), Json(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert_eq!(body["error"], "category name cannot be empty");
    }
}

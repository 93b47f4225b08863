//! Defines the endpoint for updating an existing expense.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::IntoResponse,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::get_or_create_category,
    expense::{
        ExpenseDraft, ExpenseId,
        core::update_expense,
        form::{ExpenseData, ValidatedExpenseData},
        query::{ExpenseWithCategory, get_expense_with_category},
    },
    user::ensure_demo_user,
};

/// The state needed to update an expense.
#[derive(Debug, Clone)]
pub struct EditExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The email address identifying the demo user.
    pub demo_user_email: String,
}

impl FromRef<AppState> for EditExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            demo_user_email: state.demo_user_email.clone(),
        }
    }
}

/// A route handler for updating an expense, responds with the updated
/// expense and its category on success.
///
/// The expense must belong to the demo user. Reassigning the expense to a
/// category name that has not been seen before creates that category; the
/// old category row is left in place.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn edit_expense_endpoint(
    State(state): State<EditExpenseState>,
    Path(expense_id): Path<ExpenseId>,
    Json(data): Json<ExpenseData>,
) -> impl IntoResponse {
    let form = match data.validate() {
        Ok(form) => form,
        Err(error) => return error.into_response(),
    };

    let connection = state.db_connection.lock().unwrap();

    match update_expense_from_form(expense_id, form, &state.demo_user_email, &connection) {
        Ok(expense) => Json(expense).into_response(),
        Err(error) => error.into_response(),
    }
}

fn update_expense_from_form(
    expense_id: ExpenseId,
    form: ValidatedExpenseData,
    demo_user_email: &str,
    connection: &Connection,
) -> Result<ExpenseWithCategory, Error> {
    let user = ensure_demo_user(demo_user_email, connection)?;
    let category = get_or_create_category(form.category_name, user.id, connection)?;

    update_expense(
        expense_id,
        ExpenseDraft {
            amount: form.amount,
            date: form.date,
            description: form.description,
            category_id: category.id,
        },
        user.id,
        connection,
    )?;

    get_expense_with_category(expense_id, user.id, connection)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use serde_json::Value;
    use time::macros::date;

    use crate::{
        category::{CategoryName, get_category_by_name, get_or_create_category},
        db::initialize,
        expense::{ExpenseDraft, ExpenseId, create_expense},
        user::{UserId, create_user},
    };

    use super::{EditExpenseState, ExpenseData, edit_expense_endpoint};

    fn get_test_state() -> EditExpenseState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        EditExpenseState {
            db_connection: Arc::new(Mutex::new(connection)),
            demo_user_email: "demo@example.com".to_owned(),
        }
    }

    fn insert_expense(state: &EditExpenseState, email: &str) -> (ExpenseId, UserId) {
        let connection = state.db_connection.lock().unwrap();
        let user = create_user(email, &connection).unwrap();
        let category = get_or_create_category(
            CategoryName::new_unchecked("Groceries"),
            user.id,
            &connection,
        )
        .unwrap();
        let expense = create_expense(
            ExpenseDraft {
                amount: 12.3,
                date: date!(2025 - 01 - 15),
                description: Some("weekly shop".to_owned()),
                category_id: category.id,
            },
            user.id,
            &connection,
        )
        .unwrap();

        (expense.id, user.id)
    }

    fn updated_form() -> ExpenseData {
        ExpenseData {
            amount: Some(99.99),
            date: Some(date!(2025 - 02 - 01)),
            category_name: Some("Eating Out".to_owned()),
            description: None,
        }
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        serde_json::from_slice(&body).expect("response body should be JSON")
    }

    #[tokio::test]
    async fn can_update_expense_and_reassign_category() {
        let state = get_test_state();
        let (expense_id, user_id) = insert_expense(&state, "demo@example.com");

        let response = edit_expense_endpoint(
            State(state.clone()),
            Path(expense_id),
            Json(updated_form()),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let expense = response_json(response).await;
        assert_eq!(expense["amount"], 99.99);
        assert_eq!(expense["date"], "2025-02-01");
        assert_eq!(expense["description"], Value::Null);
        assert_eq!(expense["category"]["name"], "Eating Out");

        // The old category row is never deleted.
        let connection = state.db_connection.lock().unwrap();
        assert!(
            get_category_by_name(
                &CategoryName::new_unchecked("Groceries"),
                user_id,
                &connection
            )
            .is_ok(),
            "old category row should remain"
        );
    }

    #[tokio::test]
    async fn update_fails_on_missing_expense() {
        let state = get_test_state();

        let response = edit_expense_endpoint(State(state), Path(1337), Json(updated_form()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response_json(response).await;
        assert_eq!(
            body["error"],
            "tried to update an expense that is not in the database"
        );
    }

    #[tokio::test]
    async fn update_fails_on_foreign_user_expense() {
        let state = get_test_state();
        let (expense_id, _user_id) = insert_expense(&state, "other@example.com");

        let response = edit_expense_endpoint(
            State(state.clone()),
            Path(expense_id),
            Json(updated_form()),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_fails_on_missing_required_field() {
        let state = get_test_state();
        let (expense_id, _user_id) = insert_expense(&state, "demo@example.com");
        let form = ExpenseData {
            date: None,
            ..updated_form()
        };

        let response = edit_expense_endpoint(State(state), Path(expense_id), Json(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

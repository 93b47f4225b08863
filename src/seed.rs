//! Defines the endpoint for idempotent demo-data seeding.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::macros::date;

use crate::{
    AppState, Error,
    category::{Category, CategoryName, get_or_create_category},
    expense::{ExpenseDraft, count_expenses, create_expense},
    user::ensure_demo_user,
};

/// The categories that the demo data is spread across.
const DEMO_CATEGORIES: [&str; 4] = ["Groceries", "Rent", "Transport", "Entertainment"];

/// The state needed to seed demo data.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection for writing demo data.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The email address identifying the demo user.
    pub demo_user_email: String,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            demo_user_email: state.demo_user_email.clone(),
        }
    }
}

/// What the database contained after a seeding run.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    /// Fixed "ok" marker for the client.
    pub status: String,
    /// How many categories the demo user has.
    pub categories: usize,
    /// How many expenses the demo user has.
    pub expenses: u32,
}

/// A route handler that fills the database with demo data.
///
/// Running it more than once does not duplicate data: categories are
/// resolved by name and expenses are only inserted into an empty database.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn seed_endpoint(State(state): State<SeedState>) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match seed_demo_data(&state.demo_user_email, &connection) {
        Ok(summary) => Json(summary).into_response(),
        Err(error) => error.into_response(),
    }
}

fn seed_demo_data(demo_user_email: &str, connection: &Connection) -> Result<SeedSummary, Error> {
    let user = ensure_demo_user(demo_user_email, connection)?;

    let mut categories = Vec::with_capacity(DEMO_CATEGORIES.len());
    for name in DEMO_CATEGORIES {
        categories.push(get_or_create_category(
            CategoryName::new_unchecked(name),
            user.id,
            connection,
        )?);
    }

    if count_expenses(user.id, connection)? == 0 {
        for draft in demo_expenses(&categories) {
            create_expense(draft, user.id, connection)?;
        }
    }

    Ok(SeedSummary {
        status: "ok".to_owned(),
        categories: categories.len(),
        expenses: count_expenses(user.id, connection)?,
    })
}

fn demo_expenses(categories: &[Category]) -> Vec<ExpenseDraft> {
    let [groceries, rent, transport, entertainment] = categories else {
        unreachable!("demo data covers exactly the categories in DEMO_CATEGORIES");
    };

    vec![
        ExpenseDraft {
            amount: 82.45,
            date: date!(2025 - 07 - 02),
            description: Some("Weekly shop".to_owned()),
            category_id: groceries.id,
        },
        ExpenseDraft {
            amount: 1450.0,
            date: date!(2025 - 07 - 01),
            description: Some("July rent".to_owned()),
            category_id: rent.id,
        },
        ExpenseDraft {
            amount: 36.2,
            date: date!(2025 - 07 - 08),
            description: Some("Fuel".to_owned()),
            category_id: transport.id,
        },
        ExpenseDraft {
            amount: 18.9,
            date: date!(2025 - 07 - 12),
            description: None,
            category_id: entertainment.id,
        },
        ExpenseDraft {
            amount: 64.1,
            date: date!(2025 - 07 - 16),
            description: Some("Weekly shop".to_owned()),
            category_id: groceries.id,
        },
    ]
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::db::initialize;

    use super::{SeedState, SeedSummary, seed_endpoint};

    fn get_test_state() -> SeedState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SeedState {
            db_connection: Arc::new(Mutex::new(connection)),
            demo_user_email: "demo@example.com".to_owned(),
        }
    }

    async fn seed(state: &SeedState) -> (StatusCode, SeedSummary) {
        let response = seed_endpoint(State(state.clone())).await.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn seeding_fills_empty_database() {
        let state = get_test_state();

        let (status, summary) = seed(&state).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary.status, "ok");
        assert_eq!(summary.categories, 4);
        assert!(summary.expenses > 0, "want demo expenses, got none");
    }

    #[tokio::test]
    async fn seeding_twice_does_not_duplicate_data() {
        let state = get_test_state();

        let (_, first) = seed(&state).await;
        let (_, second) = seed(&state).await;

        assert_eq!(first, second);
    }
}

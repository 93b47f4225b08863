//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::{
    AppState,
    category::list_categories_endpoint,
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, edit_expense_endpoint,
        list_expenses_endpoint,
    },
    logging::logging_middleware,
    seed::seed_endpoint,
};

/// Return a router with all the app's routes.
///
/// CORS is left permissive so the single-page client served from another
/// origin (e.g. the Vite dev server) can call the API.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(
            endpoints::EXPENSES,
            get(list_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            put(edit_expense_endpoint).delete(delete_expense_endpoint),
        )
        .route(endpoints::CATEGORIES, get(list_categories_endpoint))
        .route(endpoints::SEED, get(seed_endpoint).post(seed_endpoint))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Report that the API is up.
async fn get_health() -> Response {
    Json(json!({ "status": "ok" })).into_response()
}

/// The JSON fallback for unknown routes.
async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "not found" })),
    )
        .into_response()
}

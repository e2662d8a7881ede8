//! API module
//!
//! HTTP API endpoints and middleware.

pub mod middleware;
pub mod routes;

use axum::{middleware as axum_middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::store::ExpenseStore;

pub use middleware::{AuthState, RequestUser};
pub use routes::{create_router, AppState};

/// Build the full application: `/api/health` plus the authenticated
/// expense routes under `/api`.
pub fn build_app<S: ExpenseStore>(state: AppState<S>, auth: AuthState) -> Router {
    // Layers run last-added first: auth -> logging -> handler
    let protected_routes = create_router::<S>()
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(axum_middleware::from_fn_with_state(
            auth,
            middleware::auth_middleware,
        ));

    let api_router = Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes);

    Router::new()
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> Json<Value> {
    Json(json!({ "message": "Expense Tracker API is running" }))
}

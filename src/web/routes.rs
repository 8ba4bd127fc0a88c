//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Pages
        .route("/", get(handlers::index))
        .route("/gallery", get(handlers::gallery))
        // Widget bridge
        .route("/tools", get(handlers::list_tools))
        .route("/tools/:name", post(handlers::call_tool))
        .route("/widget/call", post(handlers::widget_call))
        .route(
            "/person",
            get(handlers::person).post(handlers::update_person),
        )
        // API routes
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        .layer(cors)
        .with_state(state)
}

//! API Routes
//!
//! Configures the Axum router with all bucket endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    bucket_handler, create_handler, delete_handler, health_handler, list_handler, read_handler,
    stat_handler, stats_handler, update_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// Object names may contain `/`, so object routes capture the rest of the
/// path.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/bucket", get(bucket_handler))
        .route("/objects", get(list_handler))
        .route(
            "/objects/*name",
            get(read_handler)
                .put(create_handler)
                .patch(update_handler)
                .delete(delete_handler),
        )
        .route("/stat/*name", get(stat_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

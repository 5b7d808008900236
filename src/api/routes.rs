//! API Routes
//!
//! Key operations and server administration live in separate route groups,
//! merged under one CORS and tracing stack.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_handler, get_handler, health_handler, set_handler, stats_handler,
    AppState,
};

// == Route Groups ==
/// Per-key operations: write (a null value removes), read, delete.
fn key_routes() -> Router<AppState> {
    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/del/:key", delete(delete_handler))
}

/// Whole-cache operations and liveness.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/clear", post(clear_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Builds the cache server router around `state`.
pub fn create_router(state: AppState) -> Router {
    key_routes()
        .merge(admin_routes())
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

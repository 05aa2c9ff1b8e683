use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get},
    Router,
};

/// Creates all API routes with state
pub fn create_api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/stats", get(handlers::get_stats))
        .route("/cache", get(handlers::get_cache_snapshot))
        .route(
            "/cache/{domain}/{record_type}",
            delete(handlers::evict_cache_entry),
        )
        .with_state(state)
}

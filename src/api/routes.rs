//! API Routes
//!
//! Configures the Axum router with all corpus server endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_clear_handler, cache_stats_handler, call_handler, corpora_handler, health_handler,
    item_handler, list_handler, module_handler, search_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /search/:corpus?q=` - Ranked full-text search
/// - `GET /list/:corpus` - Name-sorted listing with descriptions
/// - `GET /item/:corpus/*name` - Single file content
/// - `GET /module/:corpus/:name` - README and direct files of a module
/// - `GET /corpora` - Corpus availability
/// - `GET /cache/stats` - Cache statistics
/// - `DELETE /cache` - Drop all cached results
/// - `POST /call` - Dispatch by method name
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/search/:corpus", get(search_handler))
        .route("/list/:corpus", get(list_handler))
        .route("/item/:corpus/*name", get(item_handler))
        .route("/module/:corpus/:name", get(module_handler))
        .route("/corpora", get(corpora_handler))
        .route("/cache/stats", get(cache_stats_handler))
        .route("/cache", delete(cache_clear_handler))
        .route("/call", post(call_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

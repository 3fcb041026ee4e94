use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;

/// Build and configure the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // SSE events endpoint
        .route("/events", get(handlers::stream_events))
        // Public read API
        .route("/v1/promos", get(handlers::get_promos))
        // Rendered surfaces
        .route("/promos/render", get(handlers::render_promos))
        .route("/promos/load", post(handlers::load_promos))
        // Administrative signals
        .route("/admin/items", post(handlers::create_item))
        .route("/admin/items/{id}", get(handlers::get_item))
        .route("/admin/items/{id}", put(handlers::update_item))
        .route("/admin/items/{id}", delete(handlers::delete_item))
        .route("/admin/settings", get(handlers::get_settings))
        .route("/admin/settings", put(handlers::update_settings))
        .route("/admin/cache/clear", post(handlers::clear_cache))
        // Middleware
        .layer(NormalizePathLayer::trim_trailing_slash())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! missive server library logic.

pub mod api;
pub mod api_messages;
pub mod config;

use axum::{
    routing::{get, MethodRouter},
    Extension, Json, Router,
};
use missive_db::DbPool;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
///
/// Built once at startup and handed to [`app`]; tests build one per store.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
}

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

fn messages_route() -> MethodRouter {
    get(api_messages::list_messages_handler)
        .post(api_messages::create_message_handler)
        .put(api_messages::update_message_handler)
        .delete(api_messages::delete_message_handler)
        .fallback(api_messages::method_not_allowed_handler)
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/messages", messages_route())
        .layer(TraceLayer::new_for_http())
        .layer(Extension(Arc::new(state)))
}

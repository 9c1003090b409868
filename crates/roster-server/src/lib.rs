//! Roster server library logic.

pub mod api;
pub mod api_users;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use roster_users::UserStore;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// User accessors over the shared store session.
    pub users: Arc<UserStore>,
    /// Deadline applied to each store call.
    pub request_timeout: Duration,
}

/// Maximum request body size (64 KiB). User payloads are a few short strings.
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/users",
            post(api_users::create_user_handler).get(api_users::list_users_handler),
        )
        .route(
            "/api/users/{id}",
            get(api_users::get_user_handler)
                .put(api_users::update_user_handler)
                .delete(api_users::delete_user_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}

//! Shared plumbing for the HTTP handlers: error mapping and store calls.

use crate::AppState;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use roster_users::{UserError, UserStore};
use std::sync::Arc;
use thiserror::Error;

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::AlreadyExists { .. } => ApiError::Conflict(err.to_string()),
            UserError::Unavailable(ref source) => {
                tracing::error!(error = %source, "user store unavailable");
                ApiError::ServiceUnavailable(err.to_string())
            }
            UserError::Store(ref source) => {
                tracing::error!(error = %source, "user store operation failed");
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

/// Runs a blocking store call on tokio's blocking pool under the request deadline.
///
/// On deadline expiry the response is abandoned but the call itself runs to
/// completion; its transaction still commits or rolls back as a unit.
pub(crate) async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&UserStore) -> Result<T, UserError> + Send + 'static,
    T: Send + 'static,
{
    let users = Arc::clone(&state.users);
    let task = tokio::task::spawn_blocking(move || op(&users));

    match tokio::time::timeout(state.request_timeout, task).await {
        Ok(Ok(result)) => result.map_err(ApiError::from),
        Ok(Err(e)) => Err(ApiError::InternalServerError(format!(
            "task join error: {}",
            e
        ))),
        Err(_) => {
            tracing::warn!(
                timeout_ms = state.request_timeout.as_millis() as u64,
                "store call exceeded request deadline"
            );
            Err(ApiError::ServiceUnavailable(
                "store did not respond in time".to_string(),
            ))
        }
    }
}

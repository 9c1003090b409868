//! HTTP handlers for the user resource.

use crate::api::{with_store, ApiError};
use crate::AppState;
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use roster_users::{NewUser, User, UserChanges};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Maximum length for a username.
const MAX_USERNAME_LEN: usize = 64;
/// Maximum length for an email address.
const MAX_EMAIL_LEN: usize = 254;
/// Maximum length for a password hash.
const MAX_PASSWORD_HASH_LEN: usize = 512;

/// Request body for `POST /api/users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Request body for `PUT /api/users/{id}`. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

/// A user as returned over HTTP. The password hash is never echoed.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

fn validate_field(name: &str, value: &str, max_len: usize) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{} must not be empty", name)));
    }
    if value.len() > max_len {
        return Err(ApiError::BadRequest(format!(
            "{} must be at most {} bytes",
            name, max_len
        )));
    }
    Ok(())
}

/// POST /api/users
pub async fn create_user_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validate_field("username", &payload.username, MAX_USERNAME_LEN)?;
    validate_field("email", &payload.email, MAX_EMAIL_LEN)?;
    validate_field("password_hash", &payload.password_hash, MAX_PASSWORD_HASH_LEN)?;

    let new_user = NewUser {
        username: payload.username,
        email: payload.email,
        password_hash: payload.password_hash,
    };

    let user = with_store(&state, move |users| users.create_user(&new_user)).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/users
pub async fn list_users_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = with_store(&state, |users| users.get_all_users()).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/users/{id}
pub async fn get_user_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = with_store(&state, move |users| users.get_user_by_id(id)).await?;

    Ok(Json(user.into()))
}

/// PUT /api/users/{id}
pub async fn update_user_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    if let Some(ref username) = payload.username {
        validate_field("username", username, MAX_USERNAME_LEN)?;
    }
    if let Some(ref email) = payload.email {
        validate_field("email", email, MAX_EMAIL_LEN)?;
    }
    if let Some(ref hash) = payload.password_hash {
        validate_field("password_hash", hash, MAX_PASSWORD_HASH_LEN)?;
    }

    let changes = UserChanges {
        username: payload.username,
        email: payload.email,
        password_hash: payload.password_hash,
    };

    let user = with_store(&state, move |users| users.update_user(id, &changes)).await?;

    Ok(Json(user.into()))
}

/// DELETE /api/users/{id}
///
/// Responds with the user as it was immediately before removal.
pub async fn delete_user_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = with_store(&state, move |users| users.delete_user(id)).await?;

    Ok(Json(user.into()))
}

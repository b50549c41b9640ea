//! Account management endpoints (superadmin only).

use super::{
    AppState,
    attendees::validate_section,
    auth::CurrentUser,
    error::{ApiError, ApiResult},
};
use crate::{
    entities::{Role, user},
    models::NewUser,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub attendee_id: Option<i64>,
}

pub async fn list_users(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<user::Model>>> {
    user.require_superadmin()?;
    Ok(Json(state.repo.list_users().await?))
}

pub async fn create_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<user::Model>)> {
    user.require_superadmin()?;
    if request.password.is_empty() {
        return Err(ApiError::BadRequest("Password cannot be empty".to_string()));
    }
    let section = request
        .section
        .as_deref()
        .map(|s| validate_section(&state, s))
        .transpose()?;

    let password_hash = state.passwords.hash(&request.password).await?;
    let created = state
        .repo
        .create_user(NewUser {
            username: request.username,
            password_hash,
            role: request.role,
            section,
            attendee_id: request.attendee_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(user_id): Path<i64>,
) -> ApiResult<StatusCode> {
    user.require_superadmin()?;
    if user_id == user.0.user_id {
        return Err(ApiError::BadRequest(
            "Cannot delete the account you are logged in with".to_string(),
        ));
    }
    if !state.repo.delete_user(user_id).await? {
        return Err(ApiError::NotFound("user"));
    }
    let closed = state.sessions.remove_user(user_id).await;
    info!(user_id, closed_sessions = closed, "Deleted user account");
    Ok(StatusCode::NO_CONTENT)
}

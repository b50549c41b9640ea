//! Session cookie handling, the [`CurrentUser`] extractor and the login endpoints.

use super::{
    AppState,
    error::{ApiError, ApiResult},
};
use crate::auth::{self, Principal};
use axum::{
    Json,
    extract::{FromRequestParts, State},
    http::{
        HeaderMap,
        header::{COOKIE, SET_COOKIE},
        request::Parts,
    },
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::info;

/// The logged-in caller, resolved from the session cookie.
///
/// Rejects with 401 when the cookie is missing or the session is unknown or expired.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Principal);

impl CurrentUser {
    pub fn require_admin(&self) -> ApiResult<()> {
        if self.0.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }

    pub fn require_superadmin(&self) -> ApiResult<()> {
        if self.0.is_superadmin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }

    pub fn require_section(&self, section: &str) -> ApiResult<()> {
        if self.0.can_access_section(section) {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> ApiResult<Self> {
        let session_id = session_cookie(&parts.headers, &state.config.session.cookie_name)
            .ok_or(ApiError::Unauthorized)?;
        let session = state
            .sessions
            .get(&session_id)
            .await
            .ok_or(ApiError::Unauthorized)?;
        Ok(Self(session.principal))
    }
}

/// Value of the cookie called `name`, if the request carries one.
fn session_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

fn set_cookie(state: &AppState, value: &str, max_age_secs: i64) -> String {
    let mut cookie = format!(
        "{}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}",
        state.config.session.cookie_name
    );
    if state.config.session.secure_cookie {
        cookie.push_str("; Secure");
    }
    cookie
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let account = auth::authenticate(
        state.repo.as_ref(),
        &state.passwords,
        &request.username,
        &request.password,
    )
    .await?;

    let session = state.sessions.create(Principal::from(&account)).await;
    let max_age = (session.expires_at - session.created_at).num_seconds();
    info!(user_id = account.id, "User logged in");

    Ok((
        [(SET_COOKIE, set_cookie(&state, &session.id, max_age))],
        Json(session.principal),
    ))
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(session_id) = session_cookie(&headers, &state.config.session.cookie_name) {
        state.sessions.remove(&session_id).await;
    }
    [(SET_COOKIE, set_cookie(&state, "", 0))]
}

pub async fn me(CurrentUser(principal): CurrentUser) -> Json<Principal> {
    Json(principal)
}

//! Contribution ledger endpoints.

use super::{
    AppState,
    attendees::visible_attendee,
    auth::CurrentUser,
    error::{ApiError, ApiResult},
};
use crate::{
    core::contribution::TotalDrift,
    entities::contribution,
    models::{ContributionChanges, ContributionFilter},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContribution {
    pub attendee_id: i64,
    pub amount: i64,
    /// Defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Loads a contribution whose attendee the caller may manage.
async fn managed_contribution(
    state: &AppState,
    user: &CurrentUser,
    contribution_id: i64,
) -> ApiResult<contribution::Model> {
    user.require_admin()?;
    let existing = state
        .repo
        .get_contribution(contribution_id)
        .await?
        .ok_or(ApiError::NotFound("contribution"))?;
    let attendee = visible_attendee(state, user, existing.attendee_id).await?;
    user.require_section(&attendee.section)?;
    Ok(existing)
}

pub async fn list_contributions(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(mut filter): Query<ContributionFilter>,
) -> ApiResult<Json<Vec<contribution::Model>>> {
    if user.0.is_admin() {
        if let Some(scope) = user.0.section_scope() {
            filter.section = Some(scope.to_string());
        }
    } else {
        let Some(own) = user.0.attendee_id else {
            return Ok(Json(Vec::new()));
        };
        filter.attendee_id = Some(own);
    }
    Ok(Json(state.repo.list_contributions(&filter).await?))
}

pub async fn get_contribution(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(contribution_id): Path<i64>,
) -> ApiResult<Json<contribution::Model>> {
    let found = state
        .repo
        .get_contribution(contribution_id)
        .await?
        .ok_or(ApiError::NotFound("contribution"))?;
    visible_attendee(&state, &user, found.attendee_id).await?;
    Ok(Json(found))
}

pub async fn create_contribution(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(new): Json<NewContribution>,
) -> ApiResult<(StatusCode, Json<contribution::Model>)> {
    user.require_admin()?;
    let attendee = visible_attendee(&state, &user, new.attendee_id).await?;
    user.require_section(&attendee.section)?;

    let date = new.date.unwrap_or_else(|| Utc::now().date_naive());
    let created = state
        .repo
        .create_contribution(attendee.id, new.amount, date, Some(user.0.user_id))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_contribution(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(contribution_id): Path<i64>,
    Json(changes): Json<ContributionChanges>,
) -> ApiResult<Json<contribution::Model>> {
    managed_contribution(&state, &user, contribution_id).await?;
    state
        .repo
        .update_contribution(contribution_id, changes)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("contribution"))
}

pub async fn delete_contribution(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(contribution_id): Path<i64>,
) -> ApiResult<StatusCode> {
    managed_contribution(&state, &user, contribution_id).await?;
    if state.repo.delete_contribution(contribution_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("contribution"))
    }
}

/// Rebuilds cached totals from the ledger and reports what changed.
pub async fn reconcile_contributions(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<TotalDrift>>> {
    user.require_superadmin()?;
    Ok(Json(state.repo.reconcile_contribution_totals().await?))
}

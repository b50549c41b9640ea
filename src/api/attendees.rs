//! Attendee endpoints.
//!
//! Section admins only ever see and change attendees of their own section. Students
//! can read nothing but their own record.

use super::{
    AppState,
    auth::CurrentUser,
    error::{ApiError, ApiResult},
};
use crate::{
    auth::{ensure_student_account, sync_student_account},
    core::import::ImportReport,
    entities::attendee,
    models::{AttendeeChanges, AttendeeFilter, NewAttendee},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::{info, warn};

/// Rejects sections that are not in the configured list.
pub(crate) fn validate_section(state: &AppState, section: &str) -> ApiResult<String> {
    let section = section.trim();
    if state.config.event.is_valid_section(section) {
        Ok(section.to_string())
    } else {
        Err(ApiError::BadRequest(format!("Unknown section: {section}")))
    }
}

/// Loads an attendee the caller may read, or fails with 404/403.
pub(crate) async fn visible_attendee(
    state: &AppState,
    user: &CurrentUser,
    attendee_id: i64,
) -> ApiResult<attendee::Model> {
    let attendee = state
        .repo
        .get_attendee(attendee_id)
        .await?
        .ok_or(ApiError::NotFound("attendee"))?;
    if user.0.can_view_attendee(&attendee) {
        Ok(attendee)
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Provisions a student login, logging rather than failing when that is not possible.
async fn provision_account(state: &AppState, attendee: &attendee::Model) {
    if let Err(e) = ensure_student_account(state.repo.as_ref(), &state.passwords, attendee).await
    {
        warn!(attendee_id = attendee.id, error = %e, "Could not create student account");
    }
}

/// Keeps the attendee's login in step with an edited record, logging any failure.
async fn sync_account(state: &AppState, previous: &attendee::Model, updated: &attendee::Model) {
    if let Err(e) =
        sync_student_account(state.repo.as_ref(), &state.passwords, previous, updated).await
    {
        warn!(attendee_id = updated.id, error = %e, "Could not update student account");
    }
}

pub async fn list_attendees(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(mut filter): Query<AttendeeFilter>,
) -> ApiResult<Json<Vec<attendee::Model>>> {
    if !user.0.is_admin() {
        let own = match user.0.attendee_id {
            Some(id) => state.repo.get_attendee(id).await?.into_iter().collect(),
            None => Vec::new(),
        };
        return Ok(Json(own));
    }

    if let Some(scope) = user.0.section_scope() {
        filter.section = Some(scope.to_string());
    }
    Ok(Json(state.repo.list_attendees(&filter).await?))
}

pub async fn get_attendee(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(attendee_id): Path<i64>,
) -> ApiResult<Json<attendee::Model>> {
    Ok(Json(visible_attendee(&state, &user, attendee_id).await?))
}

pub async fn create_attendee(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(mut new): Json<NewAttendee>,
) -> ApiResult<(StatusCode, Json<attendee::Model>)> {
    user.require_admin()?;
    new.section = validate_section(&state, &new.section)?;
    user.require_section(&new.section)?;

    let created = state.repo.create_attendee(new).await?;
    provision_account(&state, &created).await;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_attendee(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(attendee_id): Path<i64>,
    Json(mut changes): Json<AttendeeChanges>,
) -> ApiResult<Json<attendee::Model>> {
    user.require_admin()?;
    let existing = visible_attendee(&state, &user, attendee_id).await?;
    user.require_section(&existing.section)?;
    if let Some(section) = &changes.section {
        let section = validate_section(&state, section)?;
        user.require_section(&section)?;
        changes.section = Some(section);
    }

    let updated = state
        .repo
        .update_attendee(attendee_id, changes)
        .await?
        .ok_or(ApiError::NotFound("attendee"))?;
    sync_account(&state, &existing, &updated).await;
    Ok(Json(updated))
}

pub async fn delete_attendee(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(attendee_id): Path<i64>,
) -> ApiResult<StatusCode> {
    user.require_admin()?;
    let existing = visible_attendee(&state, &user, attendee_id).await?;
    user.require_section(&existing.section)?;

    let account = state.repo.find_user_by_attendee(attendee_id).await?;
    if !state.repo.delete_attendee(attendee_id).await? {
        return Err(ApiError::NotFound("attendee"));
    }
    if let Some(account) = account {
        state.sessions.remove_user(account.id).await;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Upserts attendees by mobile number; rows with unknown sections are reported as failures.
pub async fn import_attendees(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(records): Json<Vec<NewAttendee>>,
) -> ApiResult<Json<ImportReport>> {
    user.require_superadmin()?;

    let mut rejected = ImportReport::default();
    let mut accepted = Vec::with_capacity(records.len());
    let mut positions = Vec::with_capacity(records.len());
    for (index, mut record) in records.into_iter().enumerate() {
        match validate_section(&state, &record.section) {
            Ok(section) => {
                record.section = section;
                positions.push(index);
                accepted.push(record);
            }
            Err(e) => rejected.skip(index, &record.mobile, e.to_string()),
        }
    }

    let mut report = state.repo.bulk_import_attendees(accepted).await?;
    for failure in &mut report.failures {
        failure.index = positions.get(failure.index).copied().unwrap_or(failure.index);
    }
    report.failures.append(&mut rejected.failures);
    report.failures.sort_by_key(|f| f.index);

    for attendee in report.attendees.iter().filter(|a| report.was_created(a.id)) {
        provision_account(&state, attendee).await;
    }

    info!(
        created = report.created,
        updated = report.updated,
        skipped = report.failures.len(),
        "Attendee import request finished"
    );
    Ok(Json(report))
}

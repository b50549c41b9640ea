//! Dashboard and budget summary endpoints.

use super::{AppState, auth::CurrentUser, error::ApiResult};
use crate::core::summary::{BudgetSummary, DashboardSummary};
use axum::{Json, extract::State};
use chrono::Utc;

pub async fn dashboard_summary(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<DashboardSummary>> {
    user.require_admin()?;
    let settings = state.config.event.summary_settings();
    let today = Utc::now().date_naive();
    Ok(Json(
        state.repo.get_dashboard_summary(&settings, today).await?,
    ))
}

pub async fn budget_summary(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<BudgetSummary>> {
    user.require_admin()?;
    let settings = state.config.event.summary_settings();
    Ok(Json(state.repo.get_budget_summary(&settings).await?))
}

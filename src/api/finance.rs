//! Expense, budget line and category endpoints.
//!
//! Admins may read expenses and budget lines, any logged-in user may read categories,
//! and only superadmins write any of them.

use super::{
    AppState,
    auth::CurrentUser,
    error::{ApiError, ApiResult},
};
use crate::{
    entities::{CategoryType, budget_item, category, expense},
    models::{
        BudgetItemChanges, CategoryChanges, ExpenseChanges, NewBudgetItem, NewCategory, NewExpense,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryTypeQuery {
    #[serde(rename = "type")]
    pub category_type: Option<CategoryType>,
}

fn deleted(found: bool, entity: &'static str) -> ApiResult<StatusCode> {
    if found {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(entity))
    }
}

pub async fn list_expenses(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<CategoryQuery>,
) -> ApiResult<Json<Vec<expense::Model>>> {
    user.require_admin()?;
    Ok(Json(
        state.repo.list_expenses(query.category.as_deref()).await?,
    ))
}

pub async fn get_expense(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(expense_id): Path<i64>,
) -> ApiResult<Json<expense::Model>> {
    user.require_admin()?;
    state
        .repo
        .get_expense(expense_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("expense"))
}

pub async fn create_expense(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(new): Json<NewExpense>,
) -> ApiResult<(StatusCode, Json<expense::Model>)> {
    user.require_superadmin()?;
    let created = state
        .repo
        .create_expense(new, Some(user.0.user_id))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_expense(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(expense_id): Path<i64>,
    Json(changes): Json<ExpenseChanges>,
) -> ApiResult<Json<expense::Model>> {
    user.require_superadmin()?;
    state
        .repo
        .update_expense(expense_id, changes)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("expense"))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(expense_id): Path<i64>,
) -> ApiResult<StatusCode> {
    user.require_superadmin()?;
    deleted(state.repo.delete_expense(expense_id).await?, "expense")
}

pub async fn list_budget_items(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<CategoryQuery>,
) -> ApiResult<Json<Vec<budget_item::Model>>> {
    user.require_admin()?;
    Ok(Json(
        state
            .repo
            .list_budget_items(query.category.as_deref())
            .await?,
    ))
}

pub async fn get_budget_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(item_id): Path<i64>,
) -> ApiResult<Json<budget_item::Model>> {
    user.require_admin()?;
    state
        .repo
        .get_budget_item(item_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("budget item"))
}

pub async fn create_budget_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(new): Json<NewBudgetItem>,
) -> ApiResult<(StatusCode, Json<budget_item::Model>)> {
    user.require_superadmin()?;
    let created = state.repo.create_budget_item(new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_budget_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(item_id): Path<i64>,
    Json(changes): Json<BudgetItemChanges>,
) -> ApiResult<Json<budget_item::Model>> {
    user.require_superadmin()?;
    state
        .repo
        .update_budget_item(item_id, changes)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("budget item"))
}

pub async fn delete_budget_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(item_id): Path<i64>,
) -> ApiResult<StatusCode> {
    user.require_superadmin()?;
    deleted(state.repo.delete_budget_item(item_id).await?, "budget item")
}

pub async fn list_categories(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<CategoryTypeQuery>,
) -> ApiResult<Json<Vec<category::Model>>> {
    Ok(Json(state.repo.list_categories(query.category_type).await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(new): Json<NewCategory>,
) -> ApiResult<(StatusCode, Json<category::Model>)> {
    user.require_superadmin()?;
    let created = state.repo.create_category(new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_category(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(category_id): Path<i64>,
    Json(changes): Json<CategoryChanges>,
) -> ApiResult<Json<category::Model>> {
    user.require_superadmin()?;
    state
        .repo
        .update_category(category_id, changes)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("category"))
}

pub async fn delete_category(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(category_id): Path<i64>,
) -> ApiResult<StatusCode> {
    user.require_superadmin()?;
    deleted(state.repo.delete_category(category_id).await?, "category")
}

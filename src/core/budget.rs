//! Budget item business logic - plain CRUD over planned spend lines.

use crate::{
    core::attendee::{optional_text, require_text},
    entities::{BudgetItem, budget_item},
    errors::{Error, Result},
    models::{BudgetItemChanges, NewBudgetItem},
};
use sea_orm::{QueryOrder, Set, prelude::*};

pub(crate) fn require_estimate(amount: i64) -> Result<i64> {
    if amount < 0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Adds a budget line. The estimate may be zero but not negative.
pub async fn create_budget_item(
    db: &DatabaseConnection,
    new: NewBudgetItem,
) -> Result<budget_item::Model> {
    budget_item::ActiveModel {
        name: Set(require_text("name", &new.name)?),
        description: Set(optional_text(new.description)),
        category: Set(require_text("category", &new.category)?),
        estimated_amount: Set(require_estimate(new.estimated_amount)?),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

pub async fn get_budget_item(
    db: &DatabaseConnection,
    item_id: i64,
) -> Result<Option<budget_item::Model>> {
    BudgetItem::find_by_id(item_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists budget lines by category then name.
pub async fn list_budget_items(
    db: &DatabaseConnection,
    category: Option<&str>,
) -> Result<Vec<budget_item::Model>> {
    let mut query = BudgetItem::find();
    if let Some(category) = category {
        query = query.filter(budget_item::Column::Category.eq(category));
    }
    query
        .order_by_asc(budget_item::Column::Category)
        .order_by_asc(budget_item::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update. Returns `Ok(None)` when the item does not exist.
pub async fn update_budget_item(
    db: &DatabaseConnection,
    item_id: i64,
    changes: BudgetItemChanges,
) -> Result<Option<budget_item::Model>> {
    let Some(existing) = get_budget_item(db, item_id).await? else {
        return Ok(None);
    };
    if changes == BudgetItemChanges::default() {
        return Ok(Some(existing));
    }

    let mut active: budget_item::ActiveModel = existing.into();
    if let Some(name) = changes.name {
        active.name = Set(require_text("name", &name)?);
    }
    if changes.description.is_some() {
        active.description = Set(optional_text(changes.description));
    }
    if let Some(category) = changes.category {
        active.category = Set(require_text("category", &category)?);
    }
    if let Some(amount) = changes.estimated_amount {
        active.estimated_amount = Set(require_estimate(amount)?);
    }

    Ok(Some(active.update(db).await?))
}

/// Deletes a budget line. Returns `Ok(false)` when it does not exist.
pub async fn delete_budget_item(db: &DatabaseConnection, item_id: i64) -> Result<bool> {
    let result = BudgetItem::delete_by_id(item_id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

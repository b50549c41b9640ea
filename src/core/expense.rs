//! Expense business logic - plain CRUD over recorded spend.

use crate::{
    core::attendee::{optional_text, require_text},
    entities::{Expense, expense},
    errors::{Error, Result},
    models::{ExpenseChanges, NewExpense},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::debug;

pub(crate) fn require_positive(amount: i64) -> Result<i64> {
    if amount <= 0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Records a new expense. The amount must be positive.
pub async fn create_expense(
    db: &DatabaseConnection,
    new: NewExpense,
    created_by: Option<i64>,
) -> Result<expense::Model> {
    let model = expense::ActiveModel {
        title: Set(require_text("title", &new.title)?),
        description: Set(optional_text(new.description)),
        category: Set(require_text("category", &new.category)?),
        amount: Set(require_positive(new.amount)?),
        date: Set(new.date),
        receipt: Set(optional_text(new.receipt)),
        created_by: Set(created_by),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    debug!(expense_id = created.id, amount = created.amount, "Recorded expense");
    Ok(created)
}

/// Finds an expense by id.
pub async fn get_expense(db: &DatabaseConnection, expense_id: i64) -> Result<Option<expense::Model>> {
    Expense::find_by_id(expense_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists expenses, newest first, optionally restricted to one category.
pub async fn list_expenses(
    db: &DatabaseConnection,
    category: Option<&str>,
) -> Result<Vec<expense::Model>> {
    let mut query = Expense::find();
    if let Some(category) = category {
        query = query.filter(expense::Column::Category.eq(category));
    }
    query
        .order_by_desc(expense::Column::Date)
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update. Returns `Ok(None)` when the expense does not exist.
pub async fn update_expense(
    db: &DatabaseConnection,
    expense_id: i64,
    changes: ExpenseChanges,
) -> Result<Option<expense::Model>> {
    let Some(existing) = get_expense(db, expense_id).await? else {
        return Ok(None);
    };
    if changes == ExpenseChanges::default() {
        return Ok(Some(existing));
    }

    let mut active: expense::ActiveModel = existing.into();
    if let Some(title) = changes.title {
        active.title = Set(require_text("title", &title)?);
    }
    if changes.description.is_some() {
        active.description = Set(optional_text(changes.description));
    }
    if let Some(category) = changes.category {
        active.category = Set(require_text("category", &category)?);
    }
    if let Some(amount) = changes.amount {
        active.amount = Set(require_positive(amount)?);
    }
    if let Some(date) = changes.date {
        active.date = Set(date);
    }
    if changes.receipt.is_some() {
        active.receipt = Set(optional_text(changes.receipt));
    }

    Ok(Some(active.update(db).await?))
}

/// Deletes an expense. Returns `Ok(false)` when it does not exist.
pub async fn delete_expense(db: &DatabaseConnection, expense_id: i64) -> Result<bool> {
    let result = Expense::delete_by_id(expense_id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

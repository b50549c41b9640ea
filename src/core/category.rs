//! Category business logic - the vocabulary for expenses and budget items.
//!
//! Categories are referenced by name from expenses and budget items; that reference is
//! not enforced, so renaming or deleting a category leaves existing rows untouched.

use crate::{
    core::attendee::{optional_text, require_text},
    entities::{Category, CategoryType, category},
    errors::{Error, Result},
    models::{CategoryChanges, NewCategory},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

async fn find_by_name<C>(db: &C, name: &str) -> Result<Option<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find()
        .filter(category::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a category. Names are unique.
pub async fn create_category<C>(db: &C, new: NewCategory) -> Result<category::Model>
where
    C: ConnectionTrait,
{
    let name = require_text("name", &new.name)?;
    if find_by_name(db, &name).await?.is_some() {
        return Err(Error::Conflict {
            field: "category name",
            value: name,
        });
    }

    category::ActiveModel {
        name: Set(name),
        category_type: Set(new.category_type),
        description: Set(optional_text(new.description)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Lists categories by name; a type filter also matches `both` categories.
pub async fn list_categories(
    db: &DatabaseConnection,
    category_type: Option<CategoryType>,
) -> Result<Vec<category::Model>> {
    let categories = Category::find()
        .order_by_asc(category::Column::Name)
        .all(db)
        .await?;

    Ok(match category_type {
        Some(wanted) => categories
            .into_iter()
            .filter(|c| c.category_type.matches(wanted))
            .collect(),
        None => categories,
    })
}

/// Applies a partial update. Returns `Ok(None)` when the category does not exist.
pub async fn update_category(
    db: &DatabaseConnection,
    category_id: i64,
    changes: CategoryChanges,
) -> Result<Option<category::Model>> {
    let Some(existing) = Category::find_by_id(category_id).one(db).await? else {
        return Ok(None);
    };
    if changes == CategoryChanges::default() {
        return Ok(Some(existing));
    }

    let current_name = existing.name.clone();
    let mut active: category::ActiveModel = existing.into();
    if let Some(name) = changes.name {
        let name = require_text("name", &name)?;
        if name != current_name {
            if find_by_name(db, &name).await?.is_some() {
                return Err(Error::Conflict {
                    field: "category name",
                    value: name,
                });
            }
            active.name = Set(name);
        }
    }
    if let Some(category_type) = changes.category_type {
        active.category_type = Set(category_type);
    }
    if changes.description.is_some() {
        active.description = Set(optional_text(changes.description));
    }

    Ok(Some(active.update(db).await?))
}

/// Deletes a category. Returns `Ok(false)` when it does not exist.
pub async fn delete_category(db: &DatabaseConnection, category_id: i64) -> Result<bool> {
    let result = Category::delete_by_id(category_id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

/// Creates a `both`-type category for each configured name that is missing.
///
/// Returns the number of categories created.
pub async fn seed_categories(db: &DatabaseConnection, names: &[String]) -> Result<usize> {
    let mut seeded = 0;
    for name in names {
        if find_by_name(db, name).await?.is_some() {
            continue;
        }
        create_category(
            db,
            NewCategory {
                name: name.clone(),
                category_type: CategoryType::Both,
                description: None,
            },
        )
        .await?;
        seeded += 1;
    }
    if seeded > 0 {
        info!(seeded, "Seeded categories from configuration");
    }
    Ok(seeded)
}

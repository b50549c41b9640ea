//! Category entity - the vocabulary used to classify expenses and budget items.

use super::enums::CategoryType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique category name (e.g. "venue")
    #[sea_orm(unique)]
    pub name: String,
    /// Whether it applies to expenses, budget items or both
    pub category_type: CategoryType,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
}

/// Categories are referenced by name only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

//! Budget item entity - a planned spend line, compared against actual expenses.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_items")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Line item name (e.g. "Catering")
    pub name: String,
    pub description: Option<String>,
    /// Category name; a soft reference into the category vocabulary
    pub category: String,
    /// Planned spend
    pub estimated_amount: i64,
    pub created_at: DateTimeUtc,
}

/// Budget items are independent of every other table
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

//! Expense entity - money actually spent on the event.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short title (e.g. "Hall deposit")
    pub title: String,
    pub description: Option<String>,
    /// Category name; a soft reference into the category vocabulary
    pub category: String,
    /// Amount spent
    pub amount: i64,
    /// Date of the expense
    pub date: Date,
    /// Receipt reference (file name or URL)
    pub receipt: Option<String>,
    /// User id of the creator
    pub created_by: Option<i64>,
    pub created_at: DateTimeUtc,
}

/// Expenses are independent of every other table
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

//! Contribution entity - one row of the contribution ledger.
//!
//! Every row belongs to exactly one attendee. `recorded_by` is a soft reference
//! to the user who entered it and is not enforced by a foreign key.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Contribution database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contributions")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the contribution
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Attendee this contribution is credited to
    pub attendee_id: i64,
    /// Amount received, always positive
    pub amount: i64,
    /// Date the money was received
    pub date: Date,
    /// User id of the admin who recorded it
    pub recorded_by: Option<i64>,
    /// When the row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Contribution and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each contribution belongs to one attendee
    #[sea_orm(
        belongs_to = "super::attendee::Entity",
        from = "Column::AttendeeId",
        to = "super::attendee::Column::Id"
    )]
    Attendee,
}

impl Related<super::attendee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

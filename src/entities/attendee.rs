//! Attendee entity - a tracked reunion participant.
//!
//! `contribution_amount` is a cached running total of the attendee's ledger rows.
//! Only the contribution ledger operations write it.

use super::enums::{AttendingStatus, PaidStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Attendee database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendees")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the attendee
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Section code (e.g. "A")
    pub section: String,
    /// Mobile number; unique, doubles as the self-account login
    #[sea_orm(unique)]
    pub mobile: String,
    /// Contact email
    pub email: Option<String>,
    /// Self-described gender
    pub gender: Option<String>,
    /// Current occupation
    pub occupation: Option<String>,
    /// Current city of residence
    pub city: Option<String>,
    /// Attendance confirmation
    pub attending_status: AttendingStatus,
    /// Payment standing
    pub paid_status: PaidStatus,
    /// Sum of all contributions recorded for this attendee
    pub contribution_amount: i64,
    /// When the attendee was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Attendee and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One attendee has many contributions
    #[sea_orm(has_many = "super::contribution::Entity")]
    Contributions,
}

impl Related<super::contribution::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contributions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! User entity - login accounts for administrators and attendees.

use super::enums::Role;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name; attendee accounts use their mobile number
    #[sea_orm(unique)]
    pub username: String,
    /// Argon2 PHC string, never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Authorization role
    pub role: Role,
    /// Section for section admins and students
    pub section: Option<String>,
    /// Linked attendee for student accounts
    pub attendee_id: Option<i64>,
    /// When the account was created
    pub created_at: DateTimeUtc,
}

/// `User` references attendees by id only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

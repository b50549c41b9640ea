//! Enumerated column types shared by several entities.
//!
//! Each enum is stored as its snake_case string value so the database stays
//! readable and matches the JSON representation used by the HTTP layer.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether an attendee has confirmed they will attend the reunion.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum AttendingStatus {
    /// Confirmed attending
    #[sea_orm(string_value = "attending")]
    Attending,
    /// Confirmed not attending
    #[sea_orm(string_value = "not_attending")]
    NotAttending,
    /// No answer yet
    #[sea_orm(string_value = "not_confirmed")]
    NotConfirmed,
}

/// Payment standing of an attendee.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum PaidStatus {
    /// Has paid; set automatically on the first contribution
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Promised but not yet received
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Nothing received
    #[sea_orm(string_value = "not_paid")]
    NotPaid,
    /// Exempt from contributing
    #[sea_orm(string_value = "not_applicable")]
    NotApplicable,
}

/// Account role used for authorization.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Unrestricted administrator
    #[sea_orm(string_value = "superadmin")]
    Superadmin,
    /// Administrator restricted to one section
    #[sea_orm(string_value = "section_admin")]
    SectionAdmin,
    /// Attendee self-account
    #[sea_orm(string_value = "student")]
    Student,
}

/// Which records a category may classify.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum CategoryType {
    /// Expenses only
    #[sea_orm(string_value = "expense")]
    Expense,
    /// Budget items only
    #[sea_orm(string_value = "budget")]
    Budget,
    /// Both expenses and budget items
    #[sea_orm(string_value = "both")]
    Both,
}

impl CategoryType {
    /// Whether a category of this type shows up when filtering for `wanted`.
    #[must_use]
    pub fn matches(self, wanted: Self) -> bool {
        self == Self::Both || wanted == Self::Both || self == wanted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_type_matches() {
        assert!(CategoryType::Both.matches(CategoryType::Expense));
        assert!(CategoryType::Expense.matches(CategoryType::Expense));
        assert!(!CategoryType::Budget.matches(CategoryType::Expense));
        assert!(CategoryType::Budget.matches(CategoryType::Both));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&PaidStatus::NotApplicable).unwrap_or_default();
        assert_eq!(json, "\"not_applicable\"");
        let parsed: AttendingStatus =
            serde_json::from_str("\"not_confirmed\"").unwrap_or(AttendingStatus::Attending);
        assert_eq!(parsed, AttendingStatus::NotConfirmed);
    }
}

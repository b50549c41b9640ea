//! Input and filter records passed to repository operations.
//!
//! These are the shapes the HTTP layer deserializes request bodies and query
//! strings into. Entity models in [`crate::entities`] are what comes back out.

use crate::entities::{AttendingStatus, CategoryType, PaidStatus, Role};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A new attendee, or one row of a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttendee {
    pub first_name: String,
    pub last_name: String,
    pub section: String,
    pub mobile: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    /// Defaults to `not_confirmed` on create
    #[serde(default)]
    pub attending_status: Option<AttendingStatus>,
    /// Defaults to `not_paid` on create
    #[serde(default)]
    pub paid_status: Option<PaidStatus>,
}

/// Partial attendee update; `None` leaves a field unchanged.
///
/// There is deliberately no contribution amount here: only the ledger writes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttendeeChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub section: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub occupation: Option<String>,
    pub city: Option<String>,
    pub attending_status: Option<AttendingStatus>,
    pub paid_status: Option<PaidStatus>,
}

impl From<NewAttendee> for AttendeeChanges {
    /// Import rows overwrite names and section; optional fields only when supplied.
    fn from(record: NewAttendee) -> Self {
        Self {
            first_name: Some(record.first_name),
            last_name: Some(record.last_name),
            section: Some(record.section),
            mobile: None,
            email: record.email,
            gender: record.gender,
            occupation: record.occupation,
            city: record.city,
            attending_status: record.attending_status,
            paid_status: record.paid_status,
        }
    }
}

/// Attendee list filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttendeeFilter {
    pub section: Option<String>,
    pub attending_status: Option<AttendingStatus>,
    pub paid_status: Option<PaidStatus>,
    /// Substring of first name, last name or mobile
    pub search: Option<String>,
}

/// Partial contribution update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContributionChanges {
    pub amount: Option<i64>,
    pub date: Option<NaiveDate>,
}

/// Contribution list filter and pagination
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContributionFilter {
    pub attendee_id: Option<i64>,
    /// Only contributions of attendees in this section
    pub section: Option<String>,
    pub limit: Option<u64>,
    /// Ignored unless `limit` is also set
    pub offset: Option<u64>,
}

/// A new expense
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub amount: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub receipt: Option<String>,
}

/// Partial expense update
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpenseChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub amount: Option<i64>,
    pub date: Option<NaiveDate>,
    pub receipt: Option<String>,
}

/// A new budget line
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudgetItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub estimated_amount: i64,
}

/// Partial budget line update
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetItemChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub estimated_amount: Option<i64>,
}

/// A new category
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    pub category_type: CategoryType,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial category update
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub category_type: Option<CategoryType>,
    pub description: Option<String>,
}

/// A new login account; the password arrives already hashed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub section: Option<String>,
    pub attendee_id: Option<i64>,
}

/// Login fields to change on an existing account; the password arrives already hashed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginChanges {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub section: Option<String>,
}

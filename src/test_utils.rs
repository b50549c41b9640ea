//! Shared test utilities for the reunion hub.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

#![allow(clippy::unwrap_used, missing_docs)]

use crate::{
    core::{attendee, budget, contribution, expense, user},
    entities::{self, AttendingStatus, PaidStatus, Role},
    errors::Result,
    models::{NewAttendee, NewBudgetItem, NewExpense, NewUser},
};
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, sea_query::Expr};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A date in January 2026; `day` 1-31.
pub fn test_date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
}

/// Builds an attendee input with only the required fields set.
pub fn new_attendee(first_name: &str, section: &str, mobile: &str) -> NewAttendee {
    NewAttendee {
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        section: section.to_string(),
        mobile: mobile.to_string(),
        ..Default::default()
    }
}

/// Creates a test attendee with last name "Tester" and default statuses.
pub async fn create_test_attendee(
    db: &DatabaseConnection,
    first_name: &str,
    section: &str,
    mobile: &str,
) -> Result<entities::attendee::Model> {
    attendee::create_attendee(db, new_attendee(first_name, section, mobile)).await
}

/// Sets up a complete test environment with one attendee in section A.
/// Returns (db, attendee) for common test scenarios.
pub async fn setup_with_attendee() -> Result<(DatabaseConnection, entities::attendee::Model)> {
    let db = setup_test_db().await?;
    let attendee = create_test_attendee(&db, "Ana", "A", "0917000001").await?;
    Ok((db, attendee))
}

/// Records a contribution dated 2026-01-01 with no recording user.
pub async fn create_test_contribution(
    db: &DatabaseConnection,
    attendee_id: i64,
    amount: i64,
) -> Result<entities::contribution::Model> {
    contribution::create_contribution(db, attendee_id, amount, test_date(1), None).await
}

/// Overwrites an attendee's cached total directly, bypassing the ledger.
/// Used to simulate drift.
pub async fn force_contribution_amount(
    db: &DatabaseConnection,
    attendee_id: i64,
    amount: i64,
) -> Result<()> {
    entities::Attendee::update_many()
        .col_expr(entities::AttendeeColumn::ContributionAmount, Expr::value(amount))
        .filter(entities::AttendeeColumn::Id.eq(attendee_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Records an expense titled "Test expense" dated 2026-01-01.
pub async fn create_test_expense(
    db: &DatabaseConnection,
    category: &str,
    amount: i64,
) -> Result<entities::expense::Model> {
    expense::create_expense(
        db,
        NewExpense {
            title: "Test expense".to_string(),
            description: None,
            category: category.to_string(),
            amount,
            date: test_date(1),
            receipt: None,
        },
        None,
    )
    .await
}

/// Creates a budget line named after its category.
pub async fn create_test_budget_item(
    db: &DatabaseConnection,
    category: &str,
    estimated_amount: i64,
) -> Result<entities::budget_item::Model> {
    budget::create_budget_item(
        db,
        NewBudgetItem {
            name: format!("{category} budget"),
            description: None,
            category: category.to_string(),
            estimated_amount,
        },
    )
    .await
}

/// Creates an account with a placeholder (unverifiable) password hash.
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
    role: Role,
    section: Option<&str>,
) -> Result<entities::user::Model> {
    user::create_user(
        db,
        NewUser {
            username: username.to_string(),
            password_hash: "not-a-hash".to_string(),
            role,
            section: section.map(String::from),
            attendee_id: None,
        },
    )
    .await
}

/// In-memory attendee row for pure summary tests.
pub fn attendee_row(id: i64, section: &str) -> entities::attendee::Model {
    entities::attendee::Model {
        id,
        first_name: format!("First{id}"),
        last_name: "Row".to_string(),
        section: section.to_string(),
        mobile: format!("0917{id:06}"),
        email: None,
        gender: None,
        occupation: None,
        city: None,
        attending_status: AttendingStatus::NotConfirmed,
        paid_status: PaidStatus::NotPaid,
        contribution_amount: 0,
        created_at: chrono::Utc::now(),
    }
}

/// In-memory expense row for pure summary tests.
pub fn expense_row(id: i64, category: &str, amount: i64) -> entities::expense::Model {
    entities::expense::Model {
        id,
        title: format!("Expense {id}"),
        description: None,
        category: category.to_string(),
        amount,
        date: test_date(1),
        receipt: None,
        created_by: None,
        created_at: chrono::Utc::now(),
    }
}

/// In-memory budget row for pure summary tests.
pub fn budget_item_row(id: i64, category: &str, estimated_amount: i64) -> entities::budget_item::Model {
    entities::budget_item::Model {
        id,
        name: format!("Item {id}"),
        description: None,
        category: category.to_string(),
        estimated_amount,
        created_at: chrono::Utc::now(),
    }
}

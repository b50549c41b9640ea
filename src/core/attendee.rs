//! Attendee business logic - Handles attendee records and their plain fields.
//!
//! Provides functions for creating, retrieving, updating and deleting attendees.
//! The cached `contribution_amount` is never written here; see
//! [`crate::core::contribution`] for the ledger operations that own it.

use crate::{
    entities::{
        Attendee, AttendingStatus, Contribution, PaidStatus, User, attendee, contribution, user,
    },
    errors::{Error, Result},
    models::{AttendeeChanges, AttendeeFilter, NewAttendee},
};
use sea_orm::{
    Condition, QueryOrder, Set, TransactionTrait,
    prelude::*,
    sea_query::{Expr, LikeExpr},
};
use tracing::{debug, info};

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional field, mapping blank input to `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Finds an attendee by primary key.
pub async fn get_attendee<C>(db: &C, attendee_id: i64) -> Result<Option<attendee::Model>>
where
    C: ConnectionTrait,
{
    Attendee::find_by_id(attendee_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an attendee by their (unique) mobile number.
pub async fn get_attendee_by_mobile<C>(db: &C, mobile: &str) -> Result<Option<attendee::Model>>
where
    C: ConnectionTrait,
{
    Attendee::find()
        .filter(attendee::Column::Mobile.eq(mobile.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// `%search%` for a LIKE match, with `%`, `_` and `\` in `search` taken literally.
fn contains_pattern(search: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape('\\')
}

/// Lists attendees matching `filter`, ordered by section, last name, first name.
pub async fn list_attendees(
    db: &DatabaseConnection,
    filter: &AttendeeFilter,
) -> Result<Vec<attendee::Model>> {
    let mut query = Attendee::find();

    if let Some(section) = &filter.section {
        query = query.filter(attendee::Column::Section.eq(section.as_str()));
    }
    if let Some(status) = filter.attending_status {
        query = query.filter(attendee::Column::AttendingStatus.eq(status));
    }
    if let Some(status) = filter.paid_status {
        query = query.filter(attendee::Column::PaidStatus.eq(status));
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(Expr::col(attendee::Column::FirstName).like(contains_pattern(search)))
                .add(Expr::col(attendee::Column::LastName).like(contains_pattern(search)))
                .add(Expr::col(attendee::Column::Mobile).like(contains_pattern(search))),
        );
    }

    query
        .order_by_asc(attendee::Column::Section)
        .order_by_asc(attendee::Column::LastName)
        .order_by_asc(attendee::Column::FirstName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new attendee with a zero contribution total.
///
/// Names, section and mobile are trimmed and must not be blank. The mobile number must
/// not belong to another attendee. Statuses default to `not_confirmed` / `not_paid`.
pub async fn create_attendee<C>(db: &C, new: NewAttendee) -> Result<attendee::Model>
where
    C: ConnectionTrait,
{
    let first_name = require_text("first name", &new.first_name)?;
    let last_name = require_text("last name", &new.last_name)?;
    let section = require_text("section", &new.section)?;
    let mobile = require_text("mobile", &new.mobile)?;

    if get_attendee_by_mobile(db, &mobile).await?.is_some() {
        return Err(Error::Conflict {
            field: "mobile",
            value: mobile,
        });
    }

    let model = attendee::ActiveModel {
        first_name: Set(first_name),
        last_name: Set(last_name),
        section: Set(section),
        mobile: Set(mobile),
        email: Set(optional_text(new.email)),
        gender: Set(optional_text(new.gender)),
        occupation: Set(optional_text(new.occupation)),
        city: Set(optional_text(new.city)),
        attending_status: Set(new
            .attending_status
            .unwrap_or(AttendingStatus::NotConfirmed)),
        paid_status: Set(new.paid_status.unwrap_or(PaidStatus::NotPaid)),
        contribution_amount: Set(0),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    debug!(attendee_id = created.id, "Created attendee");
    Ok(created)
}

/// Applies a partial update to an existing attendee.
///
/// Returns `Ok(None)` when the attendee does not exist. A changed mobile number is
/// checked for uniqueness. `paid_status` may be set by hand; nothing downgrades it later.
pub async fn update_attendee<C>(
    db: &C,
    attendee_id: i64,
    changes: AttendeeChanges,
) -> Result<Option<attendee::Model>>
where
    C: ConnectionTrait,
{
    let Some(existing) = get_attendee(db, attendee_id).await? else {
        return Ok(None);
    };

    if changes == AttendeeChanges::default() {
        return Ok(Some(existing));
    }

    let current_mobile = existing.mobile.clone();
    let mut active: attendee::ActiveModel = existing.into();

    if let Some(first_name) = changes.first_name {
        active.first_name = Set(require_text("first name", &first_name)?);
    }
    if let Some(last_name) = changes.last_name {
        active.last_name = Set(require_text("last name", &last_name)?);
    }
    if let Some(section) = changes.section {
        active.section = Set(require_text("section", &section)?);
    }
    if let Some(mobile) = changes.mobile {
        let mobile = require_text("mobile", &mobile)?;
        if mobile != current_mobile {
            if get_attendee_by_mobile(db, &mobile).await?.is_some() {
                return Err(Error::Conflict {
                    field: "mobile",
                    value: mobile,
                });
            }
            active.mobile = Set(mobile);
        }
    }
    if changes.email.is_some() {
        active.email = Set(optional_text(changes.email));
    }
    if changes.gender.is_some() {
        active.gender = Set(optional_text(changes.gender));
    }
    if changes.occupation.is_some() {
        active.occupation = Set(optional_text(changes.occupation));
    }
    if changes.city.is_some() {
        active.city = Set(optional_text(changes.city));
    }
    if let Some(status) = changes.attending_status {
        active.attending_status = Set(status);
    }
    if let Some(status) = changes.paid_status {
        active.paid_status = Set(status);
    }

    let updated = active.update(db).await?;
    Ok(Some(updated))
}

/// Deletes an attendee together with their ledger rows and self-account.
///
/// Returns `Ok(false)` when the attendee does not exist.
pub async fn delete_attendee(db: &DatabaseConnection, attendee_id: i64) -> Result<bool> {
    let txn = db.begin().await?;

    // Writes only, so the transaction never has to upgrade a read lock
    let removed_contributions = Contribution::delete_many()
        .filter(contribution::Column::AttendeeId.eq(attendee_id))
        .exec(&txn)
        .await?
        .rows_affected;
    User::delete_many()
        .filter(user::Column::AttendeeId.eq(attendee_id))
        .exec(&txn)
        .await?;
    let removed = Attendee::delete_by_id(attendee_id)
        .exec(&txn)
        .await?
        .rows_affected;
    if removed == 0 {
        return Ok(false);
    }

    txn.commit().await?;
    info!(attendee_id, removed_contributions, "Deleted attendee");
    Ok(true)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_attendee_defaults() -> Result<()> {
        let db = setup_test_db().await?;

        let attendee = create_test_attendee(&db, "Ana", "A", "0917000001").await?;

        assert_eq!(attendee.first_name, "Ana");
        assert_eq!(attendee.section, "A");
        assert_eq!(attendee.contribution_amount, 0);
        assert_eq!(attendee.attending_status, AttendingStatus::NotConfirmed);
        assert_eq!(attendee.paid_status, PaidStatus::NotPaid);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_attendee_rejects_duplicate_mobile() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_attendee(&db, "Ana", "A", "0917000001").await?;

        let result = create_test_attendee(&db, "Ben", "B", " 0917000001 ").await;
        assert!(matches!(
            result,
            Err(Error::Conflict { field: "mobile", .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_attendee_rejects_blank_names() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_attendee(
            &db,
            NewAttendee {
                first_name: "   ".to_string(),
                last_name: "Cruz".to_string(),
                section: "A".to_string(),
                mobile: "0917000009".to_string(),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_attendees_filters() -> Result<()> {
        let db = setup_test_db().await?;
        let ana = create_test_attendee(&db, "Ana", "A", "0917000001").await?;
        create_test_attendee(&db, "Ben", "B", "0917000002").await?;
        update_attendee(
            &db,
            ana.id,
            AttendeeChanges {
                attending_status: Some(AttendingStatus::Attending),
                ..Default::default()
            },
        )
        .await?;

        let section_a = list_attendees(
            &db,
            &AttendeeFilter {
                section: Some("A".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(section_a.len(), 1);
        assert_eq!(section_a[0].id, ana.id);

        let attending = list_attendees(
            &db,
            &AttendeeFilter {
                attending_status: Some(AttendingStatus::Attending),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(attending.len(), 1);

        let by_mobile = list_attendees(
            &db,
            &AttendeeFilter {
                search: Some("0002".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(by_mobile.len(), 1);
        assert_eq!(by_mobile[0].first_name, "Ben");

        let all = list_attendees(&db, &AttendeeFilter::default()).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].section, "A");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_attendee_partial() -> Result<()> {
        let db = setup_test_db().await?;
        let ana = create_test_attendee(&db, "Ana", "A", "0917000001").await?;

        let updated = update_attendee(
            &db,
            ana.id,
            AttendeeChanges {
                city: Some("Cebu".to_string()),
                paid_status: Some(PaidStatus::NotApplicable),
                ..Default::default()
            },
        )
        .await?
        .unwrap();

        assert_eq!(updated.city.as_deref(), Some("Cebu"));
        assert_eq!(updated.paid_status, PaidStatus::NotApplicable);
        assert_eq!(updated.first_name, "Ana");
        assert_eq!(updated.contribution_amount, 0);

        let missing = update_attendee(&db, 999, AttendeeChanges::default()).await?;
        assert!(missing.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_attendee_mobile_conflict() -> Result<()> {
        let db = setup_test_db().await?;
        let ana = create_test_attendee(&db, "Ana", "A", "0917000001").await?;
        create_test_attendee(&db, "Ben", "B", "0917000002").await?;

        let result = update_attendee(
            &db,
            ana.id,
            AttendeeChanges {
                mobile: Some("0917000002".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Conflict { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_attendee_removes_ledger_rows() -> Result<()> {
        let db = setup_test_db().await?;
        let ana = create_test_attendee(&db, "Ana", "A", "0917000001").await?;
        create_test_contribution(&db, ana.id, 500).await?;

        assert!(delete_attendee(&db, ana.id).await?);
        assert!(get_attendee(&db, ana.id).await?.is_none());
        let remaining = Contribution::find().all(&db).await?;
        assert!(remaining.is_empty());

        assert!(!delete_attendee(&db, ana.id).await?);
        Ok(())
    }
}

//! User account business logic - administrator and attendee login accounts.
//!
//! Passwords arrive here already hashed; see [`crate::auth::password`].

use crate::{
    core::attendee::require_text,
    entities::{Role, User, user},
    errors::{Error, Result},
    models::{LoginChanges, NewUser},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Finds an account by its login name.
pub async fn find_user_by_username<C>(db: &C, username: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::Username.eq(username.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds the self-service account linked to an attendee.
pub async fn find_user_by_attendee<C>(db: &C, attendee_id: i64) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::AttendeeId.eq(attendee_id))
        .one(db)
        .await
        .map_err(Into::into)
}

pub async fn get_user(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Creates an account.
///
/// Usernames are unique. Section admins and students must carry a section.
pub async fn create_user(db: &DatabaseConnection, new: NewUser) -> Result<user::Model> {
    let username = require_text("username", &new.username)?;
    if new.role != Role::Superadmin && new.section.as_deref().is_none_or(|s| s.trim().is_empty())
    {
        return Err(Error::validation("section admins and students need a section"));
    }
    if find_user_by_username(db, &username).await?.is_some() {
        return Err(Error::Conflict {
            field: "username",
            value: username,
        });
    }

    let created = user::ActiveModel {
        username: Set(username),
        password_hash: Set(new.password_hash),
        role: Set(new.role),
        section: Set(new.section.map(|s| s.trim().to_string())),
        attendee_id: Set(new.attendee_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(user_id = created.id, role = ?created.role, "Created user account");
    Ok(created)
}

/// Renames an account and/or replaces its password hash or section.
///
/// Returns `Ok(None)` when the account does not exist. A new username must be free.
pub async fn update_user_login(
    db: &DatabaseConnection,
    user_id: i64,
    changes: LoginChanges,
) -> Result<Option<user::Model>> {
    let Some(existing) = User::find_by_id(user_id).one(db).await? else {
        return Ok(None);
    };

    let current_username = existing.username.clone();
    let mut active: user::ActiveModel = existing.into();
    if let Some(username) = changes.username {
        let username = require_text("username", &username)?;
        if username != current_username {
            if find_user_by_username(db, &username).await?.is_some() {
                return Err(Error::Conflict {
                    field: "username",
                    value: username,
                });
            }
            active.username = Set(username);
        }
    }
    if let Some(password_hash) = changes.password_hash {
        active.password_hash = Set(password_hash);
    }
    if let Some(section) = changes.section {
        active.section = Set(Some(require_text("section", &section)?));
    }

    let updated = active.update(db).await?;
    info!(user_id, "Updated login account");
    Ok(Some(updated))
}

/// Lists accounts by username.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .order_by_asc(user::Column::Username)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes an account. Returns `Ok(false)` when it does not exist.
pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<bool> {
    let result = User::delete_by_id(user_id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_and_find_user() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_user(&db, "organizer", Role::Superadmin, None).await?;

        let found = find_user_by_username(&db, " organizer ").await?;
        assert_eq!(found, Some(created.clone()));

        let duplicate = create_test_user(&db, "organizer", Role::Superadmin, None).await;
        assert!(matches!(duplicate, Err(Error::Conflict { .. })));

        assert!(delete_user(&db, created.id).await?);
        assert!(list_users(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_section_admin_needs_section() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_test_user(&db, "lead-a", Role::SectionAdmin, None).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let lead = create_test_user(&db, "lead-a", Role::SectionAdmin, Some("A")).await?;
        assert_eq!(lead.section.as_deref(), Some("A"));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_user_login_renames() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_test_user(&db, "0917000001", Role::Student, Some("A")).await?;
        create_test_user(&db, "0917000009", Role::Student, Some("A")).await?;

        let renamed = update_user_login(
            &db,
            student.id,
            LoginChanges {
                username: Some("0917000002".to_string()),
                password_hash: Some("new-hash".to_string()),
                section: Some("B".to_string()),
            },
        )
        .await?
        .unwrap();
        assert_eq!(renamed.username, "0917000002");
        assert_eq!(renamed.password_hash, "new-hash");
        assert_eq!(renamed.section.as_deref(), Some("B"));
        assert!(find_user_by_username(&db, "0917000001").await?.is_none());

        let taken = update_user_login(
            &db,
            student.id,
            LoginChanges {
                username: Some("0917000009".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(taken, Err(Error::Conflict { field: "username", .. })));

        let missing = update_user_login(&db, 999, LoginChanges::default()).await?;
        assert!(missing.is_none());
        Ok(())
    }
}

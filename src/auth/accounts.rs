//! Login checks and account provisioning on top of the repository.

use super::PasswordService;
use crate::{
    entities::{Role, attendee, user},
    errors::{Error, Result},
    models::{LoginChanges, NewUser},
    repository::Repository,
};
use tracing::{debug, info, warn};

/// Checks a username and password, returning the matching account.
///
/// Unknown usernames and wrong passwords both yield [`Error::InvalidCredentials`].
pub async fn authenticate(
    repo: &dyn Repository,
    passwords: &PasswordService,
    username: &str,
    password: &str,
) -> Result<user::Model> {
    let Some(account) = repo.find_user_by_username(username).await? else {
        debug!(username, "Login for unknown user");
        return Err(Error::InvalidCredentials);
    };

    if passwords.verify(password, &account.password_hash).await? {
        Ok(account)
    } else {
        debug!(user_id = account.id, "Login with wrong password");
        Err(Error::InvalidCredentials)
    }
}

/// Gives a newly created attendee a student login.
///
/// Username and initial password are both the attendee's mobile number. Returns
/// `Ok(None)` when an account with that username already exists.
pub async fn ensure_student_account(
    repo: &dyn Repository,
    passwords: &PasswordService,
    attendee: &attendee::Model,
) -> Result<Option<user::Model>> {
    if repo.find_user_by_username(&attendee.mobile).await?.is_some() {
        return Ok(None);
    }

    let created = repo
        .create_user(NewUser {
            username: attendee.mobile.clone(),
            password_hash: passwords.hash(&attendee.mobile).await?,
            role: Role::Student,
            section: Some(attendee.section.clone()),
            attendee_id: Some(attendee.id),
        })
        .await?;
    Ok(Some(created))
}

/// Carries an attendee's mobile and section changes over to their student login.
///
/// A new mobile renames the account. The password follows it too while it is still the
/// old mobile; a password the student has changed is kept. Returns the updated account,
/// or `Ok(None)` when nothing relevant changed or the attendee has no account.
pub async fn sync_student_account(
    repo: &dyn Repository,
    passwords: &PasswordService,
    previous: &attendee::Model,
    updated: &attendee::Model,
) -> Result<Option<user::Model>> {
    let mobile_changed = previous.mobile != updated.mobile;
    let section_changed = previous.section != updated.section;
    if !mobile_changed && !section_changed {
        return Ok(None);
    }
    let Some(account) = repo.find_user_by_attendee(updated.id).await? else {
        return Ok(None);
    };

    let mut changes = LoginChanges::default();
    if mobile_changed {
        changes.username = Some(updated.mobile.clone());
        if matches!(
            passwords.verify(&previous.mobile, &account.password_hash).await,
            Ok(true)
        ) {
            changes.password_hash = Some(passwords.hash(&updated.mobile).await?);
        }
    }
    if section_changed {
        changes.section = Some(updated.section.clone());
    }

    let synced = repo.update_user_login(account.id, changes).await?;
    debug!(user_id = account.id, attendee_id = updated.id, "Synced student login");
    Ok(synced)
}

/// Creates the initial superadmin unless an account named `username` exists.
///
/// Without a password nothing is created and a warning is logged.
pub async fn seed_superadmin(
    repo: &dyn Repository,
    passwords: &PasswordService,
    username: &str,
    password: Option<&str>,
) -> Result<Option<user::Model>> {
    if repo.find_user_by_username(username).await?.is_some() {
        return Ok(None);
    }
    let Some(password) = password.filter(|p| !p.is_empty()) else {
        warn!(username, "ADMIN_PASSWORD not set, skipping superadmin creation");
        return Ok(None);
    };

    let created = repo
        .create_user(NewUser {
            username: username.to_string(),
            password_hash: passwords.hash(password).await?,
            role: Role::Superadmin,
            section: None,
            attendee_id: None,
        })
        .await?;
    info!(username, "Created superadmin account");
    Ok(Some(created))
}

//! The authenticated caller and the role rules applied to it.
//!
//! - superadmin: everything
//! - section admin: attendees and contributions in their own section
//! - student: their own attendee record and contributions

use crate::entities::{Role, attendee, user};
use serde::{Deserialize, Serialize};

/// Identity attached to a request after session lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub section: Option<String>,
    pub attendee_id: Option<i64>,
}

impl From<&user::Model> for Principal {
    fn from(user: &user::Model) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
            section: user.section.clone(),
            attendee_id: user.attendee_id,
        }
    }
}

impl Principal {
    #[must_use]
    pub fn is_superadmin(&self) -> bool {
        self.role == Role::Superadmin
    }

    /// Superadmins and section admins.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Superadmin | Role::SectionAdmin)
    }

    /// Whether this principal may manage attendees in `section`.
    #[must_use]
    pub fn can_access_section(&self, section: &str) -> bool {
        match self.role {
            Role::Superadmin => true,
            Role::SectionAdmin => self.section.as_deref() == Some(section),
            Role::Student => false,
        }
    }

    /// Whether this principal may read `attendee`.
    #[must_use]
    pub fn can_view_attendee(&self, attendee: &attendee::Model) -> bool {
        match self.role {
            Role::Student => self.attendee_id == Some(attendee.id),
            Role::Superadmin | Role::SectionAdmin => self.can_access_section(&attendee.section),
        }
    }

    /// Section every listing must be narrowed to, if any.
    ///
    /// `None` for superadmins. Section admins get their own section.
    #[must_use]
    pub fn section_scope(&self) -> Option<&str> {
        match self.role {
            Role::Superadmin => None,
            Role::SectionAdmin | Role::Student => self.section.as_deref(),
        }
    }
}

//! Roles, visibility scoping and permission predicates.
//!
//! Role names must match the `profiles.role` check constraint in the
//! initial migration.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_SURVEYOR: &str = "surveyor";

/// All valid role strings.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER, ROLE_SURVEYOR];

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Surveyor,
}

impl Role {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            ROLE_ADMIN => Ok(Self::Admin),
            ROLE_MANAGER => Ok(Self::Manager),
            ROLE_SURVEYOR => Ok(Self::Surveyor),
            _ => Err(format!(
                "Invalid role '{s}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::Manager => ROLE_MANAGER,
            Self::Surveyor => ROLE_SURVEYOR,
        }
    }
}

/// Grammatical gender of a user, used by the UI for localized greetings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

// ---------------------------------------------------------------------------
// Requesting user & visibility
// ---------------------------------------------------------------------------

/// The identity every fetch entry point must be called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestingUser {
    pub id: DbId,
    pub role: Role,
}

impl RequestingUser {
    pub fn new(id: DbId, role: Role) -> Self {
        Self { id, role }
    }
}

/// Which surveys a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityScope {
    /// Managers and admins see every survey.
    All,
    /// Surveyors see only the surveys they own.
    OwnedBy(DbId),
}

impl VisibilityScope {
    pub fn for_user(user: &RequestingUser) -> Self {
        if can_view_all_surveys(user.role) {
            Self::All
        } else {
            Self::OwnedBy(user.id)
        }
    }

    /// The owner restriction to push down into a query, if any.
    pub fn owner_filter(&self) -> Option<DbId> {
        match self {
            Self::All => None,
            Self::OwnedBy(id) => Some(*id),
        }
    }

    pub fn permits_owner(&self, owner_user_id: DbId) -> bool {
        match self {
            Self::All => true,
            Self::OwnedBy(id) => *id == owner_user_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Permission predicates
// ---------------------------------------------------------------------------

pub fn can_view_all_surveys(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Manager)
}

/// System settings (stuck threshold, status colours) are admin-only.
pub fn can_manage_settings(role: Role) -> bool {
    role == Role::Admin
}

pub fn can_archive_surveys(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Manager)
}

pub fn can_manage_users(role: Role) -> bool {
    role == Role::Admin
}

/// Owners may edit their own surveys; managers and admins may edit any.
pub fn can_edit_survey(user: &RequestingUser, owner_user_id: DbId) -> bool {
    VisibilityScope::for_user(user).permits_owner(owner_user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::Admin, Role::Manager, Role::Surveyor] {
            assert_eq!(Role::from_str_value(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = Role::from_str_value("owner").unwrap_err();
        assert!(err.contains("owner"));
    }

    #[test]
    fn surveyor_scope_is_owner_restricted() {
        let id = Uuid::new_v4();
        let scope = VisibilityScope::for_user(&RequestingUser::new(id, Role::Surveyor));
        assert_eq!(scope, VisibilityScope::OwnedBy(id));
        assert_eq!(scope.owner_filter(), Some(id));
        assert!(!scope.permits_owner(Uuid::new_v4()));
    }

    #[test]
    fn manager_and_admin_see_everything() {
        for role in [Role::Manager, Role::Admin] {
            let scope = VisibilityScope::for_user(&RequestingUser::new(Uuid::new_v4(), role));
            assert_eq!(scope, VisibilityScope::All);
            assert!(scope.permits_owner(Uuid::new_v4()));
        }
    }

    #[test]
    fn only_admin_manages_settings_and_users() {
        assert!(can_manage_settings(Role::Admin));
        assert!(!can_manage_settings(Role::Manager));
        assert!(!can_manage_settings(Role::Surveyor));
        assert!(can_manage_users(Role::Admin));
        assert!(!can_manage_users(Role::Manager));
    }

    #[test]
    fn surveyor_cannot_archive() {
        assert!(!can_archive_surveys(Role::Surveyor));
        assert!(can_archive_surveys(Role::Manager));
    }

    #[test]
    fn surveyor_edits_only_own_survey() {
        let me = RequestingUser::new(Uuid::new_v4(), Role::Surveyor);
        assert!(can_edit_survey(&me, me.id));
        assert!(!can_edit_survey(&me, Uuid::new_v4()));
    }
}

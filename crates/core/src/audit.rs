//! Administrative audit log vocabulary.
//!
//! Survey field history lives in `survey_history`; this log records
//! coarse administrative actions (archive, settings changes, role changes).

use serde::Deserialize;

use crate::types::DbId;

/// Action type constants.
pub mod action_types {
    pub const SURVEY_CREATE: &str = "survey_create";
    pub const SURVEY_ARCHIVE: &str = "survey_archive";
    pub const SURVEY_RESTORE: &str = "survey_restore";
    pub const SURVEY_DELETE: &str = "survey_delete";
    pub const SETTINGS_CHANGE: &str = "settings_change";
    pub const USER_ROLE_CHANGE: &str = "user_role_change";
    pub const CLIENT_CREATE: &str = "client_create";
    pub const CLIENT_DELETE: &str = "client_delete";

    pub const ALL: &[&str] = &[
        SURVEY_CREATE,
        SURVEY_ARCHIVE,
        SURVEY_RESTORE,
        SURVEY_DELETE,
        SETTINGS_CHANGE,
        USER_ROLE_CHANGE,
        CLIENT_CREATE,
        CLIENT_DELETE,
    ];
}

/// Entity type constants.
pub mod entity_types {
    pub const SURVEY: &str = "survey";
    pub const SYSTEM_SETTINGS: &str = "system_settings";
    pub const PROFILE: &str = "profile";
    pub const CLIENT: &str = "client";
}

pub const DEFAULT_AUDIT_LIMIT: i64 = 100;
pub const MAX_AUDIT_LIMIT: i64 = 500;

/// Clamp a requested page size to `1..=MAX_AUDIT_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_AUDIT_LIMIT)
        .clamp(1, MAX_AUDIT_LIMIT)
}

pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// An audit event ready to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditLog {
    pub user_id: Option<DbId>,
    pub action_type: &'static str,
    pub entity_type: &'static str,
    pub entity_id: Option<DbId>,
    pub details: serde_json::Value,
}

impl NewAuditLog {
    pub fn new(
        user_id: DbId,
        action_type: &'static str,
        entity_type: &'static str,
        entity_id: Option<DbId>,
    ) -> Self {
        Self {
            user_id: Some(user_id),
            action_type,
            entity_type,
            entity_id,
            details: serde_json::json!({}),
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditLogQuery {
    pub action_type: Option<String>,
    pub entity_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(clamp_limit(None), 100);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(10_000)), 500);
        assert_eq!(clamp_offset(Some(-4)), 0);
    }

    #[test]
    fn action_types_are_unique() {
        let mut all = action_types::ALL.to_vec();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), action_types::ALL.len());
    }
}

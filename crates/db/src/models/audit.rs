//! Audit log rows. Immutable once written, so there is no `updated_at`.

use serde::Serialize;
use sqlx::FromRow;
use surveytrack_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub action_type: String,
    pub entity_type: String,
    pub entity_id: Option<DbId>,
    pub details: serde_json::Value,
    pub created_at: Timestamp,
}

//! Survey history rows. Append-only, so there is no update DTO.

use sqlx::FromRow;
use surveytrack_core::survey::HistoryEntry;
use surveytrack_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow)]
pub struct HistoryRow {
    pub id: DbId,
    pub survey_id: DbId,
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub user_id: DbId,
    pub created_at: Timestamp,
}

impl From<HistoryRow> for HistoryEntry {
    fn from(row: HistoryRow) -> Self {
        HistoryEntry {
            id: row.id,
            survey_id: row.survey_id,
            field_name: row.field_name,
            old_value: row.old_value,
            new_value: row.new_value,
            user_id: row.user_id,
            created_at: row.created_at,
        }
    }
}

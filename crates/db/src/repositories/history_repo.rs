//! Repository for the append-only `survey_history` table.

use sqlx::{PgPool, Postgres, Transaction};
use surveytrack_core::history::NewHistoryEntry;
use surveytrack_core::types::DbId;

use crate::models::history::HistoryRow;

const COLUMNS: &str = "id, survey_id, field_name, old_value, new_value, user_id, created_at";

pub struct HistoryRepo;

impl HistoryRepo {
    /// Append an entry inside the transaction that changed the survey.
    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        entry: &NewHistoryEntry,
    ) -> Result<HistoryRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO survey_history \
                (survey_id, field_name, old_value, new_value, user_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HistoryRow>(&query)
            .bind(entry.survey_id)
            .bind(&entry.field_name)
            .bind(&entry.old_value)
            .bind(&entry.new_value)
            .bind(entry.user_id)
            .bind(entry.created_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// Newest first.
    pub async fn list_for_survey(
        pool: &PgPool,
        survey_id: DbId,
    ) -> Result<Vec<HistoryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM survey_history WHERE survey_id = $1 \
             ORDER BY created_at DESC, id"
        );
        sqlx::query_as::<_, HistoryRow>(&query)
            .bind(survey_id)
            .fetch_all(pool)
            .await
    }

    /// Entries for one field across many surveys, oldest first.
    pub async fn list_field_for_surveys(
        pool: &PgPool,
        field_name: &str,
        survey_ids: &[DbId],
    ) -> Result<Vec<HistoryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM survey_history \
             WHERE field_name = $1 AND survey_id = ANY($2) \
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, HistoryRow>(&query)
            .bind(field_name)
            .bind(survey_ids)
            .fetch_all(pool)
            .await
    }
}

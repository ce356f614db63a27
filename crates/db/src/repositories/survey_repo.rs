//! Repository for the `surveys` table.

use sqlx::{PgPool, Postgres, Transaction};
use surveytrack_core::survey::Survey;
use surveytrack_core::types::DbId;

use crate::models::survey::SurveyRow;

/// Column list for SELECTs over `surveys s LEFT JOIN clients c`.
const COLUMNS: &str = "\
    s.id, s.client_id, c.name AS client_name, s.system_name, \
    s.system_description, s.survey_date, s.received_date, \
    s.last_email_bounce_date, s.status, s.is_archived, s.owner_user_id, \
    s.created_at, s.updated_at";

const FROM: &str = "FROM surveys s LEFT JOIN clients c ON c.id = s.client_id";

/// Provides query and mutation operations for surveys.
pub struct SurveyRepo;

impl SurveyRepo {
    /// List surveys, newest first. `owner` restricts to one owner's rows.
    pub async fn list(pool: &PgPool, owner: Option<DbId>) -> Result<Vec<SurveyRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} {FROM} \
             WHERE ($1::uuid IS NULL OR s.owner_user_id = $1) \
             ORDER BY s.created_at DESC"
        );
        sqlx::query_as::<_, SurveyRow>(&query)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SurveyRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM} WHERE s.id = $1");
        sqlx::query_as::<_, SurveyRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a survey and lock its row until the transaction ends.
    pub async fn find_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<SurveyRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM} WHERE s.id = $1 FOR UPDATE OF s");
        sqlx::query_as::<_, SurveyRow>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Insert a fully-built survey record inside the caller's transaction.
    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        survey: &Survey,
    ) -> Result<SurveyRow, sqlx::Error> {
        let query = format!(
            "WITH s AS ( \
                INSERT INTO surveys \
                    (id, client_id, system_name, system_description, survey_date, \
                     received_date, last_email_bounce_date, status, is_archived, \
                     owner_user_id, created_at, updated_at) \
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
                RETURNING * \
             ) \
             SELECT {COLUMNS} FROM s LEFT JOIN clients c ON c.id = s.client_id"
        );
        sqlx::query_as::<_, SurveyRow>(&query)
            .bind(survey.id)
            .bind(survey.client_id)
            .bind(&survey.system_name)
            .bind(&survey.system_description)
            .bind(survey.survey_date)
            .bind(survey.received_date)
            .bind(survey.last_email_bounce_date)
            .bind(&survey.status)
            .bind(survey.is_archived)
            .bind(survey.owner_user_id)
            .bind(survey.created_at)
            .bind(survey.updated_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// Write every mutable column of `survey` back to its row.
    pub async fn write_fields(
        tx: &mut Transaction<'_, Postgres>,
        survey: &Survey,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE surveys SET \
                client_id = $2, system_name = $3, system_description = $4, \
                survey_date = $5, received_date = $6, last_email_bounce_date = $7, \
                status = $8, is_archived = $9, updated_at = $10 \
             WHERE id = $1",
        )
        .bind(survey.id)
        .bind(survey.client_id)
        .bind(&survey.system_name)
        .bind(&survey.system_description)
        .bind(survey.survey_date)
        .bind(survey.received_date)
        .bind(survey.last_email_bounce_date)
        .bind(&survey.status)
        .bind(survey.is_archived)
        .bind(survey.updated_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Delete a survey only if it is archived. Returns `true` if deleted.
    pub async fn delete_archived(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM surveys WHERE id = $1 AND is_archived")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM surveys WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }
}

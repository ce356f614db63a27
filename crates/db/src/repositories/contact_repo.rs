//! Repository for the `contacts` table.

use sqlx::PgPool;
use surveytrack_core::survey::ContactInput;
use surveytrack_core::types::DbId;

use crate::models::contact::ContactRow;

const COLUMNS: &str = "id, survey_id, first_name, last_name, email, phone, role";

pub struct ContactRepo;

impl ContactRepo {
    pub async fn list_for_survey(
        pool: &PgPool,
        survey_id: DbId,
    ) -> Result<Vec<ContactRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contacts WHERE survey_id = $1 ORDER BY position, id"
        );
        sqlx::query_as::<_, ContactRow>(&query)
            .bind(survey_id)
            .fetch_all(pool)
            .await
    }

    /// Contacts for many surveys at once, for list views.
    pub async fn list_for_surveys(
        pool: &PgPool,
        survey_ids: &[DbId],
    ) -> Result<Vec<ContactRow>, sqlx::Error> {
        if survey_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM contacts WHERE survey_id = ANY($1) \
             ORDER BY survey_id, position, id"
        );
        sqlx::query_as::<_, ContactRow>(&query)
            .bind(survey_ids)
            .fetch_all(pool)
            .await
    }

    /// Replace a survey's contact list in one transaction.
    pub async fn replace_for_survey(
        pool: &PgPool,
        survey_id: DbId,
        contacts: &[ContactInput],
    ) -> Result<Vec<ContactRow>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM contacts WHERE survey_id = $1")
            .bind(survey_id)
            .execute(&mut *tx)
            .await?;

        let insert = format!(
            "INSERT INTO contacts \
                (survey_id, first_name, last_name, email, phone, role, position) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let mut rows = Vec::with_capacity(contacts.len());
        for (position, contact) in contacts.iter().enumerate() {
            let row = sqlx::query_as::<_, ContactRow>(&insert)
                .bind(survey_id)
                .bind(contact.first_name.trim())
                .bind(contact.last_name.trim())
                .bind(&contact.email)
                .bind(&contact.phone)
                .bind(&contact.role)
                .bind(position as i32)
                .fetch_one(&mut *tx)
                .await?;
            rows.push(row);
        }

        tx.commit().await?;
        Ok(rows)
    }
}

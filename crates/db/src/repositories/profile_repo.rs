//! Repository for the `profiles` table.

use sqlx::PgPool;
use surveytrack_core::audit::{action_types, entity_types, NewAuditLog};
use surveytrack_core::roles::Role;
use surveytrack_core::types::DbId;

use crate::models::profile::ProfileRow;
use crate::repositories::AuditLogRepo;

const COLUMNS: &str = "id, email, first_name, last_name, role, gender, created_at";

pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProfileRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, ProfileRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<ProfileRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles ORDER BY email");
        sqlx::query_as::<_, ProfileRow>(&query).fetch_all(pool).await
    }

    /// Set a user's role. When the role actually changes, a
    /// `user_role_change` event with the old and new values is written in
    /// the same transaction.
    pub async fn update_role(
        pool: &PgPool,
        id: DbId,
        role: Role,
        actor: DbId,
    ) -> Result<Option<ProfileRow>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1 FOR UPDATE");
        let Some(before) = sqlx::query_as::<_, ProfileRow>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let query = format!("UPDATE profiles SET role = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let updated = sqlx::query_as::<_, ProfileRow>(&query)
            .bind(id)
            .bind(role.as_str())
            .fetch_one(&mut *tx)
            .await?;

        if before.role != updated.role {
            let event = NewAuditLog::new(
                actor,
                action_types::USER_ROLE_CHANGE,
                entity_types::PROFILE,
                Some(id),
            )
            .with_details(serde_json::json!({ "old": before.role, "new": updated.role }));
            AuditLogRepo::insert(&mut tx, &event).await?;
        }

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Insert a profile. Identity is provisioned externally; this is used
    /// by seeding and tests.
    pub async fn insert(
        pool: &PgPool,
        id: DbId,
        email: &str,
        role: Role,
    ) -> Result<ProfileRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (id, email, role) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProfileRow>(&query)
            .bind(id)
            .bind(email)
            .bind(role.as_str())
            .fetch_one(pool)
            .await
    }
}

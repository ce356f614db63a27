//! Repository for the `clients` table.

use sqlx::PgPool;
use surveytrack_core::audit::{action_types, entity_types, NewAuditLog};
use surveytrack_core::types::DbId;

use crate::models::client::{ClientInput, ClientRow};
use crate::repositories::AuditLogRepo;

const COLUMNS: &str = "id, name, logo_ref, created_at";

pub struct ClientRepo;

impl ClientRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<ClientRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients ORDER BY name");
        sqlx::query_as::<_, ClientRow>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ClientRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, ClientRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a client and its `client_create` audit event in one transaction.
    pub async fn create(
        pool: &PgPool,
        input: &ClientInput,
        actor: DbId,
    ) -> Result<ClientRow, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO clients (name, logo_ref) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let client = sqlx::query_as::<_, ClientRow>(&query)
            .bind(input.name.trim())
            .bind(&input.logo_ref)
            .fetch_one(&mut *tx)
            .await?;

        let event = NewAuditLog::new(
            actor,
            action_types::CLIENT_CREATE,
            entity_types::CLIENT,
            Some(client.id),
        )
        .with_details(serde_json::json!({ "name": client.name }));
        AuditLogRepo::insert(&mut tx, &event).await?;

        tx.commit().await?;
        Ok(client)
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &ClientInput,
    ) -> Result<Option<ClientRow>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET name = $2, logo_ref = $3 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClientRow>(&query)
            .bind(id)
            .bind(input.name.trim())
            .bind(&input.logo_ref)
            .fetch_optional(pool)
            .await
    }

    /// Delete a client and, through the cascade, its surveys. The
    /// `client_delete` event is written in the same transaction.
    ///
    /// Returns the deleted row, or `None` if it did not exist.
    pub async fn delete(
        pool: &PgPool,
        id: DbId,
        actor: DbId,
    ) -> Result<Option<ClientRow>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("DELETE FROM clients WHERE id = $1 RETURNING {COLUMNS}");
        let Some(client) = sqlx::query_as::<_, ClientRow>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let event = NewAuditLog::new(
            actor,
            action_types::CLIENT_DELETE,
            entity_types::CLIENT,
            Some(id),
        )
        .with_details(serde_json::json!({ "name": client.name }));
        AuditLogRepo::insert(&mut tx, &event).await?;

        tx.commit().await?;
        Ok(Some(client))
    }
}

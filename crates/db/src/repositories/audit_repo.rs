//! Repository for the append-only `audit_logs` table.

use sqlx::{PgConnection, PgPool};
use surveytrack_core::audit::{clamp_limit, clamp_offset, AuditLogQuery, NewAuditLog};

use crate::models::audit::AuditLog;

const COLUMNS: &str = "id, user_id, action_type, entity_type, entity_id, details, created_at";

pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append one event. Takes a connection so it can join an open
    /// transaction (`&mut *tx`) or run on its own (`&mut *pool.acquire()`).
    pub async fn insert(conn: &mut PgConnection, event: &NewAuditLog) -> Result<AuditLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_logs (user_id, action_type, entity_type, entity_id, details) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(event.user_id)
            .bind(event.action_type)
            .bind(event.entity_type)
            .bind(event.entity_id)
            .bind(&event.details)
            .fetch_one(conn)
            .await
    }

    /// Newest first, with optional exact-match filters and clamped paging.
    pub async fn query(pool: &PgPool, params: &AuditLogQuery) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs \
             WHERE ($1::text IS NULL OR action_type = $1) \
               AND ($2::text IS NULL OR entity_type = $2) \
             ORDER BY created_at DESC, id \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(&params.action_type)
            .bind(&params.entity_type)
            .bind(clamp_limit(params.limit))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }
}

//! Repository for the `cve_links` table.

use sqlx::PgPool;
use surveytrack_core::cve::ValidCveLink;
use surveytrack_core::types::DbId;

use crate::models::cve_link::CveLink;

const COLUMNS: &str = "id, cve_id, title, url, description, created_at";

pub struct CveLinkRepo;

impl CveLinkRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<CveLink>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cve_links ORDER BY cve_id");
        sqlx::query_as::<_, CveLink>(&query).fetch_all(pool).await
    }

    pub async fn create(pool: &PgPool, link: &ValidCveLink) -> Result<CveLink, sqlx::Error> {
        let query = format!(
            "INSERT INTO cve_links (cve_id, title, url, description) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CveLink>(&query)
            .bind(&link.cve_id)
            .bind(&link.title)
            .bind(&link.url)
            .bind(&link.description)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cve_links WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

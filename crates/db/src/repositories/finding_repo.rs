//! Repositories for `finding_categories` and `finding_templates`.

use sqlx::PgPool;
use surveytrack_core::findings::TemplateInput;
use surveytrack_core::ordering::OrderChange;
use surveytrack_core::types::DbId;

use crate::models::finding::{FindingCategory, FindingTemplate};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

const CATEGORY_COLUMNS: &str = "id, name, order_index, created_at";

const TEMPLATE_COLUMNS: &str =
    "id, category_id, title, description, severity, recommendation, order_index";

// ---------------------------------------------------------------------------
// FindingCategoryRepo
// ---------------------------------------------------------------------------

pub struct FindingCategoryRepo;

impl FindingCategoryRepo {
    /// All categories in display order.
    pub async fn list(pool: &PgPool) -> Result<Vec<FindingCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {CATEGORY_COLUMNS} FROM finding_categories ORDER BY order_index, name"
        );
        sqlx::query_as::<_, FindingCategory>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<FindingCategory>, sqlx::Error> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM finding_categories WHERE id = $1");
        sqlx::query_as::<_, FindingCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Append a category at the end of the current order.
    pub async fn create(pool: &PgPool, name: &str) -> Result<FindingCategory, sqlx::Error> {
        let query = format!(
            "INSERT INTO finding_categories (name, order_index) \
             VALUES ($1, (SELECT COALESCE(MAX(order_index) + 1, 0) FROM finding_categories)) \
             RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, FindingCategory>(&query)
            .bind(name.trim())
            .fetch_one(pool)
            .await
    }

    pub async fn rename(
        pool: &PgPool,
        id: DbId,
        name: &str,
    ) -> Result<Option<FindingCategory>, sqlx::Error> {
        let query = format!(
            "UPDATE finding_categories SET name = $2 WHERE id = $1 RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, FindingCategory>(&query)
            .bind(id)
            .bind(name.trim())
            .fetch_optional(pool)
            .await
    }

    /// Delete a category and, through the cascade, its templates.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM finding_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Persist changed order indices in a single transaction.
    pub async fn apply_order(pool: &PgPool, changes: &[OrderChange]) -> Result<(), sqlx::Error> {
        if changes.is_empty() {
            return Ok(());
        }
        let mut tx = pool.begin().await?;
        for change in changes {
            sqlx::query("UPDATE finding_categories SET order_index = $2 WHERE id = $1")
                .bind(change.id)
                .bind(change.order_index)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FindingTemplateRepo
// ---------------------------------------------------------------------------

pub struct FindingTemplateRepo;

impl FindingTemplateRepo {
    pub async fn list_for_category(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Vec<FindingTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {TEMPLATE_COLUMNS} FROM finding_templates \
             WHERE category_id = $1 ORDER BY order_index, title"
        );
        sqlx::query_as::<_, FindingTemplate>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }

    /// Append a template at the end of its category.
    pub async fn create(
        pool: &PgPool,
        category_id: DbId,
        input: &TemplateInput,
    ) -> Result<FindingTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO finding_templates \
                (category_id, title, description, severity, recommendation, order_index) \
             VALUES ($1, $2, $3, $4, $5, \
                (SELECT COALESCE(MAX(order_index) + 1, 0) FROM finding_templates WHERE category_id = $1)) \
             RETURNING {TEMPLATE_COLUMNS}"
        );
        sqlx::query_as::<_, FindingTemplate>(&query)
            .bind(category_id)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(input.severity.as_str())
            .bind(&input.recommendation)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &TemplateInput,
    ) -> Result<Option<FindingTemplate>, sqlx::Error> {
        let query = format!(
            "UPDATE finding_templates SET \
                title = $2, description = $3, severity = $4, recommendation = $5 \
             WHERE id = $1 \
             RETURNING {TEMPLATE_COLUMNS}"
        );
        sqlx::query_as::<_, FindingTemplate>(&query)
            .bind(id)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(input.severity.as_str())
            .bind(&input.recommendation)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM finding_templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

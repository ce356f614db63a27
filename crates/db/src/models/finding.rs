//! Finding category and template rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use surveytrack_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FindingCategory {
    pub id: DbId,
    pub name: String,
    pub order_index: i32,
    pub created_at: Timestamp,
}

/// `severity` is one of the core severity strings (enforced by a check
/// constraint).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FindingTemplate {
    pub id: DbId,
    pub category_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub severity: String,
    pub recommendation: Option<String>,
    pub order_index: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
}

/// A category reorder request.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReorderCategories {
    /// The complete desired order, first to last.
    Ids { ids: Vec<DbId> },
    /// A single drag: move the category at position `from` to `to`.
    Move { from: usize, to: usize },
}

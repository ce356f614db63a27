//! CVE reference link rows.

use serde::Serialize;
use sqlx::FromRow;
use surveytrack_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CveLink {
    pub id: DbId,
    pub cve_id: String,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

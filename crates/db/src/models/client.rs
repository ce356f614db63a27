//! Client rows and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use surveytrack_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClientRow {
    pub id: DbId,
    pub name: String,
    pub logo_ref: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating or replacing a client.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInput {
    pub name: String,
    pub logo_ref: Option<String>,
}

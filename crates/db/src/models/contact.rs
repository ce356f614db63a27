//! Contact rows.

use serde::Serialize;
use sqlx::FromRow;
use surveytrack_core::survey::Contact;
use surveytrack_core::types::DbId;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContactRow {
    pub id: DbId,
    pub survey_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Contact {
            id: row.id,
            survey_id: row.survey_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            role: row.role,
        }
    }
}

//! Survey rows.

use sqlx::FromRow;
use surveytrack_core::survey::{Contact, Survey};
use surveytrack_core::types::{Date, DbId, Timestamp};

/// A `surveys` row joined with its client's name.
#[derive(Debug, Clone, FromRow)]
pub struct SurveyRow {
    pub id: DbId,
    pub client_id: DbId,
    pub client_name: Option<String>,
    pub system_name: String,
    pub system_description: Option<String>,
    pub survey_date: Date,
    pub received_date: Option<Date>,
    pub last_email_bounce_date: Option<Date>,
    pub status: String,
    pub is_archived: bool,
    pub owner_user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SurveyRow {
    pub fn into_survey(self, contacts: Vec<Contact>) -> Survey {
        Survey {
            id: self.id,
            client_id: self.client_id,
            client_name: self.client_name,
            system_name: self.system_name,
            system_description: self.system_description,
            survey_date: self.survey_date,
            received_date: self.received_date,
            last_email_bounce_date: self.last_email_bounce_date,
            status: self.status,
            is_archived: self.is_archived,
            owner_user_id: self.owner_user_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            contacts,
        }
    }
}

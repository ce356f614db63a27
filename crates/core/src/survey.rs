//! Survey record model and its satellites (client, contact, history, profile).
//!
//! These are the in-memory shapes the lifecycle logic operates on. The
//! persistence layer maps its rows into them.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::roles::{Gender, Role};
use crate::status::{SurveyStatus, STATUS_COMPLETED, STATUS_MEETING_SCHEDULED};
use crate::types::{Date, DbId, Timestamp};
use crate::validation;

/// A client organisation. Owns zero or more surveys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: DbId,
    pub name: String,
    pub logo_ref: Option<String>,
    pub created_at: Timestamp,
}

/// A person attached to a survey's contact list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: DbId,
    pub survey_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
}

/// One contact in a replace-the-whole-list request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactInput {
    pub first_name: String,
    pub last_name: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
}

impl ContactInput {
    /// Validate a whole list, reporting the first failing entry.
    pub fn validate_all(contacts: &[ContactInput]) -> Result<(), CoreError> {
        for contact in contacts {
            validation::require_non_empty("first_name", &contact.first_name)?;
            validation::require_non_empty("last_name", &contact.last_name)?;
            contact
                .validate()
                .map_err(|e| validation::from_validation_errors(&e))?;
        }
        Ok(())
    }
}

/// A security-assessment intake record for one client system.
///
/// `status` is kept as the raw persisted string so rows carrying values
/// outside the catalog still load and render; writes go through
/// [`SurveyStatus`] and are validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    pub id: DbId,
    pub client_id: DbId,
    /// Joined client name; `None` when the relation could not be resolved.
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
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

impl Survey {
    /// The catalog status, or `None` for a value outside the catalog.
    pub fn parsed_status(&self) -> Option<SurveyStatus> {
        SurveyStatus::from_str_value(&self.status).ok()
    }

    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }

    pub fn is_meeting_scheduled(&self) -> bool {
        self.status == STATUS_MEETING_SCHEDULED
    }
}

/// Input for creating a survey. Status defaults to the first catalog state.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSurvey {
    pub client_id: DbId,
    pub system_name: String,
    pub system_description: Option<String>,
    pub survey_date: Date,
    pub received_date: Option<Date>,
    pub status: Option<SurveyStatus>,
}

impl NewSurvey {
    pub fn validate(&self) -> Result<(), CoreError> {
        validation::require_non_empty("system_name", &self.system_name)
    }

    /// Build the full record for the given owner at creation time.
    pub fn into_survey(self, id: DbId, owner_user_id: DbId, now: Timestamp) -> Survey {
        Survey {
            id,
            client_id: self.client_id,
            client_name: None,
            system_name: self.system_name.trim().to_string(),
            system_description: self.system_description,
            survey_date: self.survey_date,
            received_date: self.received_date,
            last_email_bounce_date: None,
            status: self.status.unwrap_or_default().as_str().to_string(),
            is_archived: false,
            owner_user_id,
            created_at: now,
            updated_at: now,
            contacts: Vec::new(),
        }
    }
}

/// An append-only audit record of one tracked-field mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: DbId,
    pub survey_id: DbId,
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub user_id: DbId,
    pub created_at: Timestamp,
}

/// A user's profile as stored alongside the identity provider's account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: DbId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    pub gender: Option<Gender>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ts;
    use assert_matches::assert_matches;
    use uuid::Uuid;

    fn contact(first: &str, last: &str, email: Option<&str>) -> ContactInput {
        ContactInput {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.map(str::to_string),
            phone: None,
            role: None,
        }
    }

    #[test]
    fn new_survey_defaults_to_received_and_trims_name() {
        let input = NewSurvey {
            client_id: Uuid::new_v4(),
            system_name: "  Payroll ".to_string(),
            system_description: None,
            survey_date: ts(2024, 1, 1, 0, 0).date_naive(),
            received_date: None,
            status: None,
        };
        assert!(input.validate().is_ok());
        let now = ts(2024, 1, 2, 9, 0);
        let survey = input.into_survey(Uuid::new_v4(), Uuid::new_v4(), now);
        assert_eq!(survey.status, "received");
        assert_eq!(survey.system_name, "Payroll");
        assert_eq!(survey.created_at, survey.updated_at);
        assert!(!survey.is_archived);
    }

    #[test]
    fn contacts_require_names_and_valid_email() {
        assert!(ContactInput::validate_all(&[contact("Dana", "Levi", Some("dana@acme.io"))]).is_ok());
        assert!(ContactInput::validate_all(&[contact("Dana", "Levi", None)]).is_ok());

        let err = ContactInput::validate_all(&[contact(" ", "Levi", None)]).unwrap_err();
        assert_matches!(err, CoreError::Validation { ref field, .. } if field == "first_name");

        let err = ContactInput::validate_all(&[contact("Dana", "Levi", Some("nope"))]).unwrap_err();
        assert_matches!(err, CoreError::Validation { ref field, .. } if field == "email");
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let mut profile = UserProfile {
            id: Uuid::new_v4(),
            email: "x@acme.io".to_string(),
            first_name: None,
            last_name: None,
            role: Role::Surveyor,
            gender: None,
        };
        assert_eq!(profile.display_name(), "x@acme.io");
        profile.first_name = Some("Noa".to_string());
        profile.last_name = Some("Cohen".to_string());
        assert_eq!(profile.display_name(), "Noa Cohen");
    }
}

//! User profile rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use surveytrack_core::error::CoreError;
use surveytrack_core::roles::{Gender, Role};
use surveytrack_core::survey::UserProfile;
use surveytrack_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProfileRow {
    pub id: DbId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub gender: Option<String>,
    pub created_at: Timestamp,
}

impl ProfileRow {
    /// Convert to the core profile. An unknown role is an internal error:
    /// the check constraint should make it impossible.
    pub fn into_profile(self) -> Result<UserProfile, CoreError> {
        let role = Role::from_str_value(&self.role).map_err(CoreError::Internal)?;
        let gender = match self.gender.as_deref() {
            Some("male") => Some(Gender::Male),
            Some("female") => Some(Gender::Female),
            _ => None,
        };
        Ok(UserProfile {
            id: self.id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            role,
            gender,
        })
    }
}

/// DTO for changing a user's role.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRole {
    pub role: Role,
}

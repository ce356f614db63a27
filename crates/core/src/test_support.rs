//! Fixtures shared by unit tests across modules.

use chrono::{NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::survey::Survey;
use crate::types::{DbId, Timestamp};

pub fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> Timestamp {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A non-archived survey created and last updated at `at`.
pub fn survey(status: &str, owner: DbId, at: Timestamp) -> Survey {
    Survey {
        id: Uuid::new_v4(),
        client_id: Uuid::new_v4(),
        client_name: Some("Acme".to_string()),
        system_name: "Payroll".to_string(),
        system_description: None,
        survey_date: at.date_naive(),
        received_date: None,
        last_email_bounce_date: None,
        status: status.to_string(),
        is_archived: false,
        owner_user_id: owner,
        created_at: at,
        updated_at: at,
        contacts: Vec::new(),
    }
}

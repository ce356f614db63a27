//! Tracked-field history contract.
//!
//! Every change to a tracked field of a survey must be paired with exactly
//! one history entry holding the old and new values in canonical string
//! form, attributed to the acting user and stamped at mutation time. The
//! functions here compute that post-condition; the persistence layer must
//! apply the resulting [`FieldUpdatePlan`] atomically.

use serde::{Deserialize, Serialize};

use crate::audit::{action_types, entity_types, NewAuditLog};
use crate::error::CoreError;
use crate::status::SurveyStatus;
use crate::survey::Survey;
use crate::types::{Date, DbId, Timestamp};
use crate::validation;

// ---------------------------------------------------------------------------
// Tracked fields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedField {
    Status,
    IsArchived,
    SurveyDate,
    ReceivedDate,
    SystemName,
    SystemDescription,
}

impl TrackedField {
    pub const ALL: [TrackedField; 6] = [
        Self::Status,
        Self::IsArchived,
        Self::SurveyDate,
        Self::ReceivedDate,
        Self::SystemName,
        Self::SystemDescription,
    ];

    /// Column / history `field_name` value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::IsArchived => "is_archived",
            Self::SurveyDate => "survey_date",
            Self::ReceivedDate => "received_date",
            Self::SystemName => "system_name",
            Self::SystemDescription => "system_description",
        }
    }

    /// Canonical string form of this field's current value on `survey`.
    pub fn canonical_value(&self, survey: &Survey) -> Option<String> {
        match self {
            Self::Status => Some(survey.status.clone()),
            Self::IsArchived => Some(canonical_bool(survey.is_archived)),
            Self::SurveyDate => Some(canonical_date(survey.survey_date)),
            Self::ReceivedDate => survey.received_date.map(canonical_date),
            Self::SystemName => Some(survey.system_name.clone()),
            Self::SystemDescription => survey.system_description.clone(),
        }
    }
}

pub fn canonical_date(date: Date) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn canonical_bool(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

// ---------------------------------------------------------------------------
// Changes and entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub field: TrackedField,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl FieldChange {
    pub fn into_entry(self, survey_id: DbId, user_id: DbId, at: Timestamp) -> NewHistoryEntry {
        NewHistoryEntry {
            survey_id,
            field_name: self.field.as_str().to_string(),
            old_value: self.old_value,
            new_value: self.new_value,
            user_id,
            created_at: at,
        }
    }
}

/// A history row ready to be appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewHistoryEntry {
    pub survey_id: DbId,
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub user_id: DbId,
    pub created_at: Timestamp,
}

/// One [`FieldChange`] per tracked field whose canonical value differs.
pub fn diff_tracked_fields(before: &Survey, after: &Survey) -> Vec<FieldChange> {
    TrackedField::ALL
        .iter()
        .filter_map(|field| {
            let old_value = field.canonical_value(before);
            let new_value = field.canonical_value(after);
            (old_value != new_value).then_some(FieldChange {
                field: *field,
                old_value,
                new_value,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Single-field updates
// ---------------------------------------------------------------------------

/// A single-field update of a survey, as issued by the edit dialogs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum SurveyFieldUpdate {
    Status(SurveyStatus),
    IsArchived(bool),
    SurveyDate(Date),
    ReceivedDate(Option<Date>),
    SystemName(String),
    SystemDescription(Option<String>),
    LastEmailBounceDate(Option<Date>),
    ClientId(DbId),
}

impl SurveyFieldUpdate {
    /// The tracked field this update touches, if any.
    pub fn tracked_field(&self) -> Option<TrackedField> {
        match self {
            Self::Status(_) => Some(TrackedField::Status),
            Self::IsArchived(_) => Some(TrackedField::IsArchived),
            Self::SurveyDate(_) => Some(TrackedField::SurveyDate),
            Self::ReceivedDate(_) => Some(TrackedField::ReceivedDate),
            Self::SystemName(_) => Some(TrackedField::SystemName),
            Self::SystemDescription(_) => Some(TrackedField::SystemDescription),
            Self::LastEmailBounceDate(_) | Self::ClientId(_) => None,
        }
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            Self::LastEmailBounceDate(_) => "last_email_bounce_date",
            Self::ClientId(_) => "client_id",
            other => other
                .tracked_field()
                .map(|f| f.as_str())
                .unwrap_or("unknown"),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Self::SystemName(name) => validation::require_non_empty("system_name", name),
            _ => Ok(()),
        }
    }

    /// Write the new value onto `survey`. Free text is trimmed and an empty
    /// description is stored as absent.
    pub fn apply_to(&self, survey: &mut Survey) {
        match self {
            Self::Status(status) => survey.status = status.as_str().to_string(),
            Self::IsArchived(archived) => survey.is_archived = *archived,
            Self::SurveyDate(date) => survey.survey_date = *date,
            Self::ReceivedDate(date) => survey.received_date = *date,
            Self::SystemName(name) => survey.system_name = name.trim().to_string(),
            Self::SystemDescription(desc) => {
                survey.system_description = desc
                    .as_deref()
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(str::to_string);
            }
            Self::LastEmailBounceDate(date) => survey.last_email_bounce_date = *date,
            Self::ClientId(id) => {
                if survey.client_id != *id {
                    survey.client_id = *id;
                    survey.client_name = None;
                }
            }
        }
    }
}

/// What the persistence layer must write for one field update.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdatePlan {
    pub updated: Survey,
    /// `Some` iff a tracked field changed.
    pub history: Option<NewHistoryEntry>,
    /// `Some` when the change is an archive or restore, which is audited.
    pub audit: Option<NewAuditLog>,
    /// `false` when the update was a no-op and nothing needs writing.
    pub changed: bool,
}

/// Validate and apply `update` to `before`, producing the record to persist
/// and the history entry and audit event that must accompany it.
///
/// `updated_at` never moves backwards: it becomes `max(before.updated_at,
/// now)`. A no-op update leaves the record untouched and yields no history.
pub fn plan_field_update(
    before: &Survey,
    update: &SurveyFieldUpdate,
    actor_id: DbId,
    now: Timestamp,
) -> Result<FieldUpdatePlan, CoreError> {
    update.validate()?;

    let mut updated = before.clone();
    update.apply_to(&mut updated);

    let changed = updated != *before;
    if !changed {
        return Ok(FieldUpdatePlan {
            updated,
            history: None,
            audit: None,
            changed: false,
        });
    }

    updated.updated_at = before.updated_at.max(now);

    let history = update.tracked_field().and_then(|field| {
        let old_value = field.canonical_value(before);
        let new_value = field.canonical_value(&updated);
        (old_value != new_value).then(|| {
            FieldChange {
                field,
                old_value,
                new_value,
            }
            .into_entry(before.id, actor_id, now)
        })
    });

    let audit = match update {
        SurveyFieldUpdate::IsArchived(archived) => {
            let action = if *archived {
                action_types::SURVEY_ARCHIVE
            } else {
                action_types::SURVEY_RESTORE
            };
            Some(NewAuditLog::new(
                actor_id,
                action,
                entity_types::SURVEY,
                Some(before.id),
            ))
        }
        _ => None,
    };

    Ok(FieldUpdatePlan {
        updated,
        history,
        audit,
        changed: true,
    })
}

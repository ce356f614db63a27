//! Survey status catalog.
//!
//! Seven fixed workflow states in display order. There is no transition
//! graph: any status may be assigned after any other. Persisted rows may
//! still carry values outside the catalog (legacy data), so the `*_for_raw`
//! helpers degrade to the raw value instead of failing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const STATUS_RECEIVED: &str = "received";
pub const STATUS_EMAIL_SENT_TO_ADMIN: &str = "email_sent_to_admin";
pub const STATUS_MEETING_SCHEDULED: &str = "meeting_scheduled";
pub const STATUS_IN_WRITING: &str = "in_writing";
pub const STATUS_COMPLETION_QUESTIONS_WITH_ADMIN: &str = "completion_questions_with_admin";
pub const STATUS_CHEN_REVIEW: &str = "chen_review";
pub const STATUS_COMPLETED: &str = "completed";

/// Colour used for values that are not in the catalog.
pub const FALLBACK_COLOR: &str = "#9ca3af";

// ---------------------------------------------------------------------------
// Enum
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyStatus {
    Received,
    EmailSentToAdmin,
    MeetingScheduled,
    InWriting,
    CompletionQuestionsWithAdmin,
    ChenReview,
    Completed,
}

impl SurveyStatus {
    /// All statuses in their fixed display order.
    pub const ALL: [SurveyStatus; 7] = [
        Self::Received,
        Self::EmailSentToAdmin,
        Self::MeetingScheduled,
        Self::InWriting,
        Self::CompletionQuestionsWithAdmin,
        Self::ChenReview,
        Self::Completed,
    ];

    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|s| s.as_str()).collect();
                format!("Invalid status '{s}'. Must be one of: {}", valid.join(", "))
            })
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => STATUS_RECEIVED,
            Self::EmailSentToAdmin => STATUS_EMAIL_SENT_TO_ADMIN,
            Self::MeetingScheduled => STATUS_MEETING_SCHEDULED,
            Self::InWriting => STATUS_IN_WRITING,
            Self::CompletionQuestionsWithAdmin => STATUS_COMPLETION_QUESTIONS_WITH_ADMIN,
            Self::ChenReview => STATUS_CHEN_REVIEW,
            Self::Completed => STATUS_COMPLETED,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Received => "Received",
            Self::EmailSentToAdmin => "Email sent to admin",
            Self::MeetingScheduled => "Meeting scheduled",
            Self::InWriting => "In writing",
            Self::CompletionQuestionsWithAdmin => "Completion questions with admin",
            Self::ChenReview => "Chen review",
            Self::Completed => "Completed",
        }
    }

    /// Default palette colour, used when settings carry no override.
    pub fn default_color(&self) -> &'static str {
        match self {
            Self::Received => "#3b82f6",
            Self::EmailSentToAdmin => "#8b5cf6",
            Self::MeetingScheduled => "#f59e0b",
            Self::InWriting => "#06b6d4",
            Self::CompletionQuestionsWithAdmin => "#f97316",
            Self::ChenReview => "#ec4899",
            Self::Completed => "#22c55e",
        }
    }

    /// Zero-based position in the catalog order.
    pub fn position(&self) -> usize {
        Self::ALL
            .iter()
            .position(|s| s == self)
            .unwrap_or(Self::ALL.len())
    }
}

impl Default for SurveyStatus {
    /// New surveys start in the first catalog state.
    fn default() -> Self {
        Self::Received
    }
}

impl std::fmt::Display for SurveyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Catalog operations
// ---------------------------------------------------------------------------

/// All statuses in their fixed order.
pub fn all_statuses() -> &'static [SurveyStatus] {
    &SurveyStatus::ALL
}

pub fn label(status: SurveyStatus) -> &'static str {
    status.label()
}

/// Effective colour for a status: the override from settings when present,
/// the default palette otherwise.
pub fn color(status: SurveyStatus, overrides: &HashMap<String, String>) -> String {
    overrides
        .get(status.as_str())
        .cloned()
        .unwrap_or_else(|| status.default_color().to_string())
}

/// Label for a persisted raw value. Unknown values are returned verbatim.
pub fn label_for_raw(raw: &str) -> String {
    match SurveyStatus::from_str_value(raw) {
        Ok(status) => status.label().to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Colour for a persisted raw value. Overrides are honoured even for
/// values outside the catalog.
pub fn color_for_raw(raw: &str, overrides: &HashMap<String, String>) -> String {
    if let Some(c) = overrides.get(raw) {
        return c.clone();
    }
    match SurveyStatus::from_str_value(raw) {
        Ok(status) => status.default_color().to_string(),
        Err(_) => FALLBACK_COLOR.to_string(),
    }
}

/// One entry of the catalog as served to rendering callers.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub value: SurveyStatus,
    pub label: &'static str,
    pub color: String,
    pub position: usize,
}

/// The full catalog with effective colours applied.
pub fn catalog(overrides: &HashMap<String, String>) -> Vec<CatalogEntry> {
    SurveyStatus::ALL
        .iter()
        .enumerate()
        .map(|(position, status)| CatalogEntry {
            value: *status,
            label: status.label(),
            color: color(*status, overrides),
            position,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_order_is_fixed() {
        let values: Vec<&str> = all_statuses().iter().map(|s| s.as_str()).collect();
        assert_eq!(
            values,
            vec![
                "received",
                "email_sent_to_admin",
                "meeting_scheduled",
                "in_writing",
                "completion_questions_with_admin",
                "chen_review",
                "completed",
            ]
        );
    }

    #[test]
    fn default_status_is_received() {
        assert_eq!(SurveyStatus::default(), SurveyStatus::Received);
    }

    #[test]
    fn every_status_round_trips() {
        for status in SurveyStatus::ALL {
            assert_eq!(SurveyStatus::from_str_value(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn serde_uses_snake_case_values() {
        let json = serde_json::to_string(&SurveyStatus::CompletionQuestionsWithAdmin).unwrap();
        assert_eq!(json, "\"completion_questions_with_admin\"");
    }

    #[test]
    fn invalid_status_lists_valid_values() {
        let err = SurveyStatus::from_str_value("closed").unwrap_err();
        assert!(err.contains("closed"));
        assert!(err.contains("in_writing"));
    }

    #[test]
    fn unknown_raw_value_uses_itself_as_label() {
        assert_eq!(label_for_raw("legacy_state"), "legacy_state");
        assert_eq!(label_for_raw("in_writing"), "In writing");
    }

    #[test]
    fn color_override_wins_over_palette() {
        let mut overrides = HashMap::new();
        overrides.insert("completed".to_string(), "#000000".to_string());
        assert_eq!(color(SurveyStatus::Completed, &overrides), "#000000");
        assert_eq!(color(SurveyStatus::Received, &overrides), "#3b82f6");
    }

    #[test]
    fn unknown_raw_value_gets_fallback_color() {
        assert_eq!(color_for_raw("legacy_state", &HashMap::new()), FALLBACK_COLOR);
    }

    #[test]
    fn catalog_applies_overrides_and_positions() {
        let mut overrides = HashMap::new();
        overrides.insert("in_writing".to_string(), "#111111".to_string());
        let entries = catalog(&overrides);
        assert_eq!(entries.len(), 7);
        assert_eq!(entries[3].value, SurveyStatus::InWriting);
        assert_eq!(entries[3].color, "#111111");
        assert_eq!(entries[3].position, 3);
    }
}

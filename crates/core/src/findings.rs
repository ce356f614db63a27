//! Finding categories and templates used when writing survey reports.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::validation;

pub const SEVERITY_CRITICAL: &str = "critical";
pub const SEVERITY_HIGH: &str = "high";
pub const SEVERITY_MEDIUM: &str = "medium";
pub const SEVERITY_LOW: &str = "low";
pub const SEVERITY_INFO: &str = "info";

pub const VALID_SEVERITIES: &[&str] = &[
    SEVERITY_CRITICAL,
    SEVERITY_HIGH,
    SEVERITY_MEDIUM,
    SEVERITY_LOW,
    SEVERITY_INFO,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            SEVERITY_CRITICAL => Ok(Self::Critical),
            SEVERITY_HIGH => Ok(Self::High),
            SEVERITY_MEDIUM => Ok(Self::Medium),
            SEVERITY_LOW => Ok(Self::Low),
            SEVERITY_INFO => Ok(Self::Info),
            _ => Err(format!(
                "Invalid severity '{s}'. Must be one of: {}",
                VALID_SEVERITIES.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => SEVERITY_CRITICAL,
            Self::High => SEVERITY_HIGH,
            Self::Medium => SEVERITY_MEDIUM,
            Self::Low => SEVERITY_LOW,
            Self::Info => SEVERITY_INFO,
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::Medium
    }
}

/// Create/update payload for a template. Used for both verbs since the
/// edit dialog always submits the full form.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateInput {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub severity: Severity,
    pub recommendation: Option<String>,
}

impl TemplateInput {
    pub fn validate(&self) -> Result<(), CoreError> {
        validation::require_non_empty("title", &self.title)
    }
}

pub fn validate_category_name(name: &str) -> Result<(), CoreError> {
    validation::require_non_empty("name", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_round_trips_through_strings() {
        for s in VALID_SEVERITIES {
            assert_eq!(Severity::from_str_value(s).unwrap().as_str(), *s);
        }
        assert!(Severity::from_str_value("urgent").is_err());
    }

    #[test]
    fn template_severity_defaults_to_medium() {
        let input: TemplateInput = serde_json::from_str(r#"{"title":"Weak TLS"}"#).unwrap();
        assert_eq!(input.severity, Severity::Medium);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn blank_template_title_is_rejected() {
        let input: TemplateInput =
            serde_json::from_str(r#"{"title":" ","severity":"high"}"#).unwrap();
        assert!(input.validate().is_err());
    }
}

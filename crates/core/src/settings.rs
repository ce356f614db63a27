//! System-wide settings: stuck threshold and status colour overrides.
//!
//! Settings are loaded by the caller and passed explicitly into staleness
//! and aggregation calls; nothing here is global.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::{self, SurveyStatus};
use crate::validation::is_hex_color;

/// Default number of days after which a non-completed survey is stuck.
pub const DEFAULT_STUCK_THRESHOLD_DAYS: i32 = 7;

/// Inclusive bounds for the stuck threshold.
pub const MIN_STUCK_THRESHOLD_DAYS: i32 = 1;
pub const MAX_STUCK_THRESHOLD_DAYS: i32 = 365;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSettings {
    pub stuck_threshold_days: i32,
    /// Status value -> `#RRGGBB` colour. Missing entries use the default palette.
    #[serde(default)]
    pub status_colors: HashMap<String, String>,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            stuck_threshold_days: DEFAULT_STUCK_THRESHOLD_DAYS,
            status_colors: HashMap::new(),
        }
    }
}

impl SystemSettings {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_stuck_threshold(self.stuck_threshold_days)?;
        for (key, value) in &self.status_colors {
            if SurveyStatus::from_str_value(key).is_err() {
                return Err(CoreError::validation(
                    "status_colors",
                    format!("unknown status '{key}'"),
                ));
            }
            if !is_hex_color(value) {
                return Err(CoreError::validation(
                    "status_colors",
                    format!("'{value}' for '{key}' is not a #RRGGBB colour"),
                ));
            }
        }
        Ok(())
    }

    /// Effective colour for a persisted status value.
    pub fn color_for(&self, raw_status: &str) -> String {
        status::color_for_raw(raw_status, &self.status_colors)
    }
}

pub fn validate_stuck_threshold(days: i32) -> Result<(), CoreError> {
    if !(MIN_STUCK_THRESHOLD_DAYS..=MAX_STUCK_THRESHOLD_DAYS).contains(&days) {
        return Err(CoreError::validation(
            "stuck_threshold_days",
            format!(
                "must be between {MIN_STUCK_THRESHOLD_DAYS} and {MAX_STUCK_THRESHOLD_DAYS}, got {days}"
            ),
        ));
    }
    Ok(())
}

/// Partial update of the settings singleton.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSystemSettings {
    pub stuck_threshold_days: Option<i32>,
    pub status_colors: Option<HashMap<String, String>>,
}

impl UpdateSystemSettings {
    /// Apply the patch to `current` and validate the result.
    pub fn apply(&self, current: &SystemSettings) -> Result<SystemSettings, CoreError> {
        let next = SystemSettings {
            stuck_threshold_days: self
                .stuck_threshold_days
                .unwrap_or(current.stuck_threshold_days),
            status_colors: self
                .status_colors
                .clone()
                .unwrap_or_else(|| current.status_colors.clone()),
        };
        next.validate()?;
        Ok(next)
    }
}

/// Describe what changed between two settings values as
/// `{key: {"old": .., "new": ..}}`, for the audit log.
///
/// Colour overrides are compared per status so the audit record names
/// exactly which colours moved.
pub fn settings_change_details(
    before: &SystemSettings,
    after: &SystemSettings,
) -> serde_json::Value {
    let mut changes = serde_json::Map::new();

    if before.stuck_threshold_days != after.stuck_threshold_days {
        changes.insert(
            "stuck_threshold_days".to_string(),
            serde_json::json!({
                "old": before.stuck_threshold_days,
                "new": after.stuck_threshold_days,
            }),
        );
    }

    let keys: BTreeSet<&String> = before
        .status_colors
        .keys()
        .chain(after.status_colors.keys())
        .collect();
    for key in keys {
        let old = before.status_colors.get(key);
        let new = after.status_colors.get(key);
        if old != new {
            changes.insert(
                format!("status_colors.{key}"),
                serde_json::json!({ "old": old, "new": new }),
            );
        }
    }

    serde_json::Value::Object(changes)
}

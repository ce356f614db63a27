//! The `system_settings` singleton row.

use std::collections::HashMap;

use sqlx::FromRow;
use surveytrack_core::settings::SystemSettings;
use surveytrack_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow)]
pub struct SettingsRow {
    pub stuck_threshold_days: i32,
    pub status_colors: serde_json::Value,
    pub updated_by: Option<DbId>,
    pub updated_at: Timestamp,
}

impl SettingsRow {
    /// Convert to the core settings value.
    ///
    /// Colour entries that are not strings are dropped so a hand-edited row
    /// cannot break dashboards.
    pub fn into_settings(self) -> SystemSettings {
        let status_colors: HashMap<String, String> = match self.status_colors {
            serde_json::Value::Object(map) => map
                .into_iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
                .collect(),
            _ => HashMap::new(),
        };
        SystemSettings {
            stuck_threshold_days: self.stuck_threshold_days,
            status_colors,
        }
    }
}

//! Input validation helpers shared by DTOs and field updates.
//!
//! Every failure names the offending field so callers can highlight it.

use std::collections::HashMap;

use crate::error::CoreError;
use crate::types::Date;

/// Maximum length for short free-text fields (names, titles).
pub const MAX_NAME_LENGTH: usize = 200;

/// Reject empty or whitespace-only values and overlong names.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation(field, "is required"));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::validation(
            field,
            format!("must be at most {MAX_NAME_LENGTH} characters"),
        ));
    }
    Ok(())
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(field: &str, value: &str) -> Result<Date, CoreError> {
    Date::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| CoreError::validation(field, format!("'{value}' is not a YYYY-MM-DD date")))
}

/// Check a `#RRGGBB` colour string.
pub fn is_hex_color(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Convert `validator` derive output into a [`CoreError::Validation`].
///
/// Only the first failing field is reported; field names are sorted so the
/// choice is deterministic.
pub fn from_validation_errors(errors: &validator::ValidationErrors) -> CoreError {
    let field_errors: HashMap<_, _> = errors.field_errors();
    let mut fields: Vec<_> = field_errors.keys().cloned().collect();
    fields.sort();

    match fields.first() {
        Some(field) => {
            let message = field_errors
                .get(field)
                .and_then(|errs| errs.first())
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed '{}' check", e.code))
                })
                .unwrap_or_else(|| "is invalid".to_string());
            CoreError::validation(field.to_string(), message)
        }
        None => CoreError::validation("input", "is invalid"),
    }
}

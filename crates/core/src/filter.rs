//! Survey list filtering.
//!
//! Predicates are ANDed and each one left unset is skipped. Filtering only
//! excludes: the relative order of the input is preserved.

use serde::Deserialize;

use crate::roles::{RequestingUser, VisibilityScope};
use crate::survey::Survey;
use crate::types::{Date, DbId};

/// Sentinel accepted for "no restriction" on the select-style criteria.
pub const FILTER_ALL: &str = "all";

/// Filter criteria for a survey list. `Default` is the all-unset filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SurveyFilter {
    /// Case-insensitive substring of `system_name`.
    pub search: Option<String>,
    pub client_id: Option<DbId>,
    /// Exact client name; the `"all"` sentinel is treated as unset.
    pub client_name: Option<String>,
    /// Exact raw status value; the `"all"` sentinel is treated as unset.
    pub status: Option<String>,
    /// Inclusive lower bound on the creation date.
    pub date_from: Option<Date>,
    /// Inclusive upper bound on the creation date.
    pub date_to: Option<Date>,
    pub archived: Option<bool>,
}

fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(FILTER_ALL))
}

impl SurveyFilter {
    pub fn is_unset(&self) -> bool {
        active(&self.search).is_none()
            && self.client_id.is_none()
            && active(&self.client_name).is_none()
            && active(&self.status).is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.archived.is_none()
    }

    pub fn matches(&self, survey: &Survey) -> bool {
        if let Some(needle) = active(&self.search) {
            if !survey
                .system_name
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if let Some(client_id) = self.client_id {
            if survey.client_id != client_id {
                return false;
            }
        }
        if let Some(name) = active(&self.client_name) {
            if survey.client_name.as_deref() != Some(name) {
                return false;
            }
        }
        if let Some(status) = active(&self.status) {
            if survey.status != status {
                return false;
            }
        }
        let created = survey.created_at.date_naive();
        if self.date_from.is_some_and(|from| created < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| created > to) {
            return false;
        }
        if self.archived.is_some_and(|archived| survey.is_archived != archived) {
            return false;
        }
        true
    }

    pub fn apply<'a>(&self, surveys: &'a [Survey]) -> Vec<&'a Survey> {
        surveys.iter().filter(|s| self.matches(s)).collect()
    }

    /// Owned variant of [`apply`](Self::apply).
    pub fn apply_owned(&self, surveys: Vec<Survey>) -> Vec<Survey> {
        surveys.into_iter().filter(|s| self.matches(s)).collect()
    }
}

/// Restrict `surveys` to what `user` is allowed to see.
///
/// Stores apply the same scope at query time; this is the in-memory
/// counterpart for collections that were fetched unscoped.
pub fn apply_scope(surveys: Vec<Survey>, user: &RequestingUser) -> Vec<Survey> {
    let scope = VisibilityScope::for_user(user);
    surveys
        .into_iter()
        .filter(|s| scope.permits_owner(s.owner_user_id))
        .collect()
}

//! Staleness evaluation: days since last update, "stuck" and
//! "needs reminder".
//!
//! The two predicates are deliberately distinct. `is_stuck` feeds KPI and
//! statistics counts; `needs_reminder` feeds actionable alerts and also
//! skips surveys waiting on a scheduled meeting.

use serde::Serialize;

use crate::status;
use crate::survey::Survey;
use crate::types::{DbId, Timestamp};

/// Whole days elapsed since `updated_at`, floored.
///
/// 23h59m ago is `0`; exactly 24h ago is `1`. A timestamp in the future
/// (clock skew between writers) counts as `0`.
pub fn days_between(updated_at: Timestamp, now: Timestamp) -> i64 {
    let elapsed = now.signed_duration_since(updated_at);
    if elapsed.num_seconds() <= 0 {
        return 0;
    }
    elapsed.num_days()
}

pub fn days_since_update(survey: &Survey, now: Timestamp) -> i64 {
    days_between(survey.updated_at, now)
}

/// True iff the survey is active, not completed, and older than the threshold.
pub fn is_stuck(survey: &Survey, threshold_days: i32, now: Timestamp) -> bool {
    !survey.is_archived
        && !survey.is_completed()
        && days_since_update(survey, now) > i64::from(threshold_days)
}

/// A stuck survey that is not waiting on a scheduled meeting.
pub fn needs_reminder(survey: &Survey, threshold_days: i32, now: Timestamp) -> bool {
    is_stuck(survey, threshold_days, now) && !survey.is_meeting_scheduled()
}

// ---------------------------------------------------------------------------
// List views
// ---------------------------------------------------------------------------

/// One row of the stuck / reminders lists.
#[derive(Debug, Clone, Serialize)]
pub struct StaleSurveyItem {
    pub survey_id: DbId,
    pub system_name: String,
    pub client_name: Option<String>,
    pub owner_user_id: DbId,
    pub status: String,
    pub status_label: String,
    pub days_since_update: i64,
}

fn stale_items<F>(surveys: &[Survey], now: Timestamp, predicate: F) -> Vec<StaleSurveyItem>
where
    F: Fn(&Survey) -> bool,
{
    let mut items: Vec<StaleSurveyItem> = surveys
        .iter()
        .filter(|s| predicate(s))
        .map(|s| StaleSurveyItem {
            survey_id: s.id,
            system_name: s.system_name.clone(),
            client_name: s.client_name.clone(),
            owner_user_id: s.owner_user_id,
            status: s.status.clone(),
            status_label: status::label_for_raw(&s.status),
            days_since_update: days_since_update(s, now),
        })
        .collect();
    // Most stale first; stable so ties keep input order.
    items.sort_by(|a, b| b.days_since_update.cmp(&a.days_since_update));
    items
}

/// Surveys satisfying [`is_stuck`], most stale first.
pub fn stuck_items(surveys: &[Survey], threshold_days: i32, now: Timestamp) -> Vec<StaleSurveyItem> {
    stale_items(surveys, now, |s| is_stuck(s, threshold_days, now))
}

/// Surveys satisfying [`needs_reminder`], most stale first.
pub fn reminder_items(
    surveys: &[Survey],
    threshold_days: i32,
    now: Timestamp,
) -> Vec<StaleSurveyItem> {
    stale_items(surveys, now, |s| needs_reminder(s, threshold_days, now))
}

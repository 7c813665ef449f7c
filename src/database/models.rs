//! Row types for the `goals` and `profiles` tables
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub type GoalId = i64;

/// A goal row. Only incomplete goals are ever fetched by the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub user_id: String,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Goal {
    /// Due date as a UTC calendar date
    pub fn due_day(&self) -> Option<NaiveDate> {
        self.due_date.map(|dt| dt.date_naive())
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// A profile row, one per auth user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub email_notifications_enabled: bool,
}

impl UserProfile {
    pub fn has_email(&self) -> bool {
        !self.email.trim().is_empty()
    }
}

fn default_true() -> bool {
    true
}

/// Accepts RFC 3339, naive ISO date-times (taken as UTC) and plain dates.
fn deserialize_optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_timestamp(value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {value}"))),
    }
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    // PostgREST emits `+00` style offsets for timestamptz columns
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

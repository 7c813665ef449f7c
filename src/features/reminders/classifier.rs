//! Due-date classification
//!
//! Compares calendar dates only. Timestamps are reduced to their UTC date
//! before comparing, so time of day never changes the outcome.

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderCategory {
    Overdue,
    DueToday,
    DueTomorrow,
    /// No reminder is due
    NotDue,
}

impl ReminderCategory {
    /// Label substituted into the `{{reminder_type}}` placeholder
    pub fn label(&self) -> &'static str {
        match self {
            ReminderCategory::Overdue => "Overdue",
            ReminderCategory::DueToday => "Due Today",
            ReminderCategory::DueTomorrow => "Due Tomorrow",
            ReminderCategory::NotDue => "Not Due",
        }
    }

    /// Key understood by [`subject_line`](crate::features::email::subject_line)
    pub fn subject_key(&self) -> &'static str {
        match self {
            ReminderCategory::Overdue => "overdue",
            ReminderCategory::DueToday => "today",
            ReminderCategory::DueTomorrow => "tomorrow",
            ReminderCategory::NotDue => "none",
        }
    }

    pub fn needs_reminder(&self) -> bool {
        !matches!(self, ReminderCategory::NotDue)
    }
}

impl fmt::Display for ReminderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn classify(due_date: NaiveDate, today: NaiveDate) -> ReminderCategory {
    if due_date < today {
        return ReminderCategory::Overdue;
    }
    if due_date == today {
        return ReminderCategory::DueToday;
    }
    // `succ_opt` is None only for NaiveDate::MAX, where nothing can be "tomorrow"
    match today.succ_opt() {
        Some(tomorrow) if due_date == tomorrow => ReminderCategory::DueTomorrow,
        _ => ReminderCategory::NotDue,
    }
}

pub fn classify_timestamp(due: DateTime<Utc>, today: NaiveDate) -> ReminderCategory {
    classify(due.date_naive(), today)
}

//! In-memory record of reminders already delivered today.
//!
//! Keyed per goal; an entry only suppresses a reminder with the same date and
//! category, so a goal that slips from "Due Tomorrow" to "Due Today" still gets
//! its next email. State is lost on restart.

use chrono::NaiveDate;
use dashmap::DashMap;

use super::classifier::ReminderCategory;
use crate::database::GoalId;

#[derive(Debug, Default)]
pub struct NotificationLedger {
    sent: DashMap<GoalId, (NaiveDate, ReminderCategory)>,
}

impl NotificationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn already_sent(&self, goal_id: GoalId, day: NaiveDate, category: ReminderCategory) -> bool {
        self.sent
            .get(&goal_id)
            .map(|entry| *entry == (day, category))
            .unwrap_or(false)
    }

    pub fn record(&self, goal_id: GoalId, day: NaiveDate, category: ReminderCategory) {
        self.sent.insert(goal_id, (day, category));
    }

    /// Drop entries from days before `today`
    pub fn prune(&self, today: NaiveDate) -> usize {
        let before = self.sent.len();
        self.sent.retain(|_, (day, _)| *day >= today);
        before - self.sent.len()
    }

    pub fn len(&self) -> usize {
        self.sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }
}

//! Reminder scheduler
//!
//! Runs one sweep immediately, then one sweep per interval until cancelled.
//! A sweep fetches every incomplete goal and handles them one at a time:
//! classify, look up the owner's profile, render, send. Nothing in a sweep can
//! stop the loop; the worst case is a missed or late reminder.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: Dedup ledger and `SweepReport` summary
//! - 1.1.0: Sweep runs on a spawned task, panics are logged and swallowed
//! - 1.0.0: Initial hourly loop

use chrono::{NaiveDate, Utc};
use log::{debug, error, info, warn};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::classifier::classify;
use super::ledger::NotificationLedger;
use crate::core::config::{Config, DEFAULT_REMINDER_INTERVAL_SECS};
use crate::database::{Goal, GoalRepository, RepositoryError};
use crate::features::email::{Recipient, ReminderNotifier};

const DEFAULT_RECIPIENT_NAME: &str = "User";

#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    /// Pause between the end of one sweep and the start of the next
    pub interval: Duration,
    /// Send each goal at most one reminder per day and category
    pub dedupe: bool,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_REMINDER_INTERVAL_SECS),
            dedupe: true,
        }
    }
}

impl From<&Config> for SchedulerSettings {
    fn from(config: &Config) -> Self {
        Self {
            interval: config.reminder_interval,
            dedupe: config.reminder_dedupe,
        }
    }
}

/// Counters for a single sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub fetched: usize,
    pub due: usize,
    pub sent: usize,
    pub failed: usize,
    pub skipped_no_due_date: usize,
    pub skipped_no_recipient: usize,
    pub skipped_disabled: usize,
    pub skipped_duplicate: usize,
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} goals, {} due, {} sent, {} failed, {} without due date, {} without recipient, {} opted out, {} already notified",
            self.fetched,
            self.due,
            self.sent,
            self.failed,
            self.skipped_no_due_date,
            self.skipped_no_recipient,
            self.skipped_disabled,
            self.skipped_duplicate
        )
    }
}

enum RecipientLookup {
    Found(Recipient),
    Missing,
    OptedOut,
}

#[derive(Clone)]
pub struct ReminderScheduler {
    repository: Arc<dyn GoalRepository>,
    notifier: Arc<ReminderNotifier>,
    ledger: Option<Arc<NotificationLedger>>,
    interval: Duration,
}

impl ReminderScheduler {
    pub fn new(
        repository: Arc<dyn GoalRepository>,
        notifier: ReminderNotifier,
        settings: SchedulerSettings,
    ) -> Self {
        Self {
            repository,
            notifier: Arc::new(notifier),
            ledger: settings.dedupe.then(|| Arc::new(NotificationLedger::new())),
            interval: settings.interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn ledger(&self) -> Option<&NotificationLedger> {
        self.ledger.as_deref()
    }

    /// Spawn the loop. It stops when `shutdown` or the returned handle is cancelled.
    pub fn start(self, shutdown: CancellationToken) -> SchedulerHandle {
        let cancel = shutdown.child_token();
        let task = tokio::spawn(self.run(cancel.clone()));
        SchedulerHandle { cancel, task }
    }

    pub async fn run(self, cancel: CancellationToken) {
        info!(
            "⏰ Task reminder scheduler started (interval: {}s)",
            self.interval.as_secs()
        );

        while !cancel.is_cancelled() {
            self.sweep_guarded().await;

            if !self.wait_for_next_sweep(&cancel).await {
                break;
            }
        }

        info!("🛑 Task reminder scheduler stopped");
    }

    /// Sleep for the interval. Returns false if cancelled before or during the sleep.
    pub async fn wait_for_next_sweep(&self, cancel: &CancellationToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(self.interval) => true,
        }
    }

    /// Run one sweep on its own task and log the outcome. Never fails.
    async fn sweep_guarded(&self) -> Option<SweepReport> {
        let this = self.clone();
        match tokio::spawn(async move { this.run_sweep().await }).await {
            Ok(Ok(report)) => {
                info!("📋 Reminder sweep finished: {report}");
                Some(report)
            }
            Ok(Err(e)) => {
                error!("❌ Failed to process task reminders: {e}");
                None
            }
            Err(e) => {
                error!("💥 Reminder sweep aborted unexpectedly: {e}");
                None
            }
        }
    }

    pub async fn run_sweep(&self) -> Result<SweepReport, RepositoryError> {
        self.run_sweep_at(Utc::now().date_naive()).await
    }

    /// One pass over all incomplete goals, with `today` fixed for the whole pass
    pub async fn run_sweep_at(&self, today: NaiveDate) -> Result<SweepReport, RepositoryError> {
        info!("🔍 Checking for tasks with upcoming due dates ({today})...");

        if let Some(ledger) = &self.ledger {
            let pruned = ledger.prune(today);
            if pruned > 0 {
                debug!("Pruned {pruned} reminder ledger entries from previous days");
            }
        }

        let goals = self.repository.fetch_incomplete_goals().await?;
        let mut report = SweepReport {
            fetched: goals.len(),
            ..SweepReport::default()
        };

        for goal in &goals {
            self.process_goal(goal, today, &mut report).await;
        }

        Ok(report)
    }

    async fn process_goal(&self, goal: &Goal, today: NaiveDate, report: &mut SweepReport) {
        let Some(due) = goal.due_day() else {
            report.skipped_no_due_date += 1;
            return;
        };

        let category = classify(due, today);
        if !category.needs_reminder() {
            return;
        }
        report.due += 1;

        if let Some(ledger) = &self.ledger {
            if ledger.already_sent(goal.id, today, category) {
                debug!("Already sent {category} reminder for goal {} today", goal.id);
                report.skipped_duplicate += 1;
                return;
            }
        }

        let recipient = match self.resolve_recipient(&goal.user_id).await {
            RecipientLookup::Found(recipient) => recipient,
            RecipientLookup::Missing => {
                report.skipped_no_recipient += 1;
                return;
            }
            RecipientLookup::OptedOut => {
                debug!("User {} has email reminders disabled", goal.user_id);
                report.skipped_disabled += 1;
                return;
            }
        };

        let sent = self
            .notifier
            .send_task_reminder(
                &recipient,
                &goal.title,
                goal.description_text(),
                due,
                category,
            )
            .await;

        if sent {
            info!(
                "✅ Sent {category} reminder for task '{}' to {}",
                goal.title, recipient.email
            );
            report.sent += 1;
            if let Some(ledger) = &self.ledger {
                ledger.record(goal.id, today, category);
            }
        } else {
            warn!(
                "⚠️ {category} reminder for task '{}' (goal {}) was not delivered",
                goal.title, goal.id
            );
            report.failed += 1;
        }
    }

    async fn resolve_recipient(&self, user_id: &str) -> RecipientLookup {
        match self.repository.fetch_profile_by_user_id(user_id).await {
            Ok(profile) if !profile.has_email() => {
                warn!("Profile for user {user_id} has no email address");
                RecipientLookup::Missing
            }
            Ok(profile) if !profile.email_notifications_enabled => RecipientLookup::OptedOut,
            Ok(profile) => {
                let name = profile.display_name.trim();
                RecipientLookup::Found(Recipient {
                    email: profile.email.trim().to_string(),
                    name: if name.is_empty() {
                        DEFAULT_RECIPIENT_NAME.to_string()
                    } else {
                        name.to_string()
                    },
                })
            }
            Err(e) => {
                if e.is_not_found() {
                    warn!("No profile found for user {user_id}");
                } else {
                    warn!("Profile lookup failed for user {user_id}: {e}");
                }
                RecipientLookup::Missing
            }
        }
    }
}

/// Handle to a running scheduler loop
pub struct SchedulerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop scheduling further sweeps. An in-flight sweep finishes first.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Wait for the loop to exit
    pub async fn join(self) -> anyhow::Result<()> {
        self.task
            .await
            .map_err(|e| anyhow::anyhow!("reminder scheduler task failed: {e}"))
    }
}

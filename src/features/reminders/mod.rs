//! # Reminders Feature
//!
//! Hourly sweep over incomplete goals that emails owners about overdue goals
//! and goals due today or tomorrow.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.2.0: Per-day dedup ledger, respect `email_notifications_enabled`
//! - 1.1.0: Sweeps run on their own task so a panic cannot kill the loop
//! - 1.0.0: Initial release

pub mod classifier;
pub mod ledger;
pub mod scheduler;

pub use classifier::{classify, classify_timestamp, ReminderCategory};
pub use ledger::NotificationLedger;
pub use scheduler::{ReminderScheduler, SchedulerHandle, SchedulerSettings, SweepReport};

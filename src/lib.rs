// Core layer - configuration
pub mod core;

// Infrastructure - remote goal store
pub mod database;

// Features layer - reminder scheduling and email delivery
pub mod features;

pub use crate::core::Config;

pub use database::{Goal, GoalRepository, RepositoryError, SupabaseRepository, UserProfile};

pub use features::{
    // Email
    email::{Recipient, RenderedNotification, ReminderFields},
    Mailer, ReminderNotifier, SmtpMailer, TemplateRenderer,
    // Reminders
    reminders::{classify, NotificationLedger, SweepReport},
    ReminderCategory, ReminderScheduler, SchedulerHandle, SchedulerSettings,
};

//! # Features Layer
//!
//! Each feature lives in its own module and documents its version in the
//! module header. [`get_features`] mirrors those headers for startup logging.

pub mod email;
pub mod reminders;

pub use email::{Mailer, ReminderNotifier, SmtpMailer, TemplateRenderer};
pub use reminders::{ReminderCategory, ReminderScheduler, SchedulerHandle, SchedulerSettings};

/// Version metadata for a feature module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub version: &'static str,
    pub toggleable: bool,
}

pub fn get_features() -> Vec<FeatureInfo> {
    vec![
        FeatureInfo {
            id: "reminders",
            name: "Task Reminders",
            version: "1.2.0",
            toggleable: true,
        },
        FeatureInfo {
            id: "email",
            name: "Email Delivery",
            version: "1.1.0",
            toggleable: false,
        },
    ]
}

pub fn get_app_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

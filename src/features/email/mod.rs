//! # Email Feature
//!
//! HTML task reminder emails: template rendering and SMTP delivery.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Opportunistic STARTTLS, unpooled transport per message
//! - 1.0.0: Initial release with task-reminder template

pub mod dispatcher;
pub mod service;
pub mod template;

pub use dispatcher::{DispatchError, Mailer, SmtpMailer};
pub use service::{Recipient, ReminderNotifier};
pub use template::{
    format_due_date, subject_line, substitute, RenderedNotification, ReminderFields,
    TemplateError, TemplateRenderer, TASK_REMINDER_TEMPLATE,
};

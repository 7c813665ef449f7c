//! Reminder email rendering
//!
//! Plain find/replace over a fixed set of `{{token}}` placeholders. There is no
//! expression language: a token is either replaced verbatim or left alone.

use chrono::NaiveDate;
use log::debug;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::config::DEFAULT_APP_URL;

pub const TEMPLATES_DIR: &str = "Templates";
pub const TASK_REMINDER_TEMPLATE: &str = "task-reminder.html";
pub const NO_DESCRIPTION: &str = "No description provided";
const DEFAULT_RECIPIENT_NAME: &str = "User";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("email template not found at {0}")]
    Missing(PathBuf),

    #[error("failed to read email template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Values substituted into a reminder template
#[derive(Debug, Clone)]
pub struct ReminderFields {
    pub to_name: String,
    pub task_title: String,
    pub task_description: String,
    pub due_date: NaiveDate,
    /// Human label, e.g. "Due Today"
    pub reminder_type: String,
    /// Falls back to [`DEFAULT_APP_URL`] when `None` or blank
    pub app_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNotification {
    pub subject: String,
    pub body: String,
}

/// Loads templates from `<content_root>/Templates`
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    template_dir: PathBuf,
}

impl TemplateRenderer {
    pub fn new(content_root: impl AsRef<Path>) -> Self {
        Self {
            template_dir: content_root.as_ref().join(TEMPLATES_DIR),
        }
    }

    pub fn template_path(&self, template_name: &str) -> PathBuf {
        self.template_dir.join(template_name)
    }

    /// Read the template from disk and fill it in. The file is re-read on every
    /// call so edits take effect without a restart.
    pub async fn render(
        &self,
        template_name: &str,
        fields: &ReminderFields,
    ) -> Result<RenderedNotification, TemplateError> {
        let path = self.template_path(template_name);
        let template = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TemplateError::Missing(path));
            }
            Err(source) => return Err(TemplateError::Read { path, source }),
        };

        debug!("Rendering {} for '{}'", path.display(), fields.task_title);

        Ok(RenderedNotification {
            subject: subject_line(&fields.reminder_type, &fields.task_title),
            body: substitute(&template, fields),
        })
    }
}

/// Replace every placeholder occurrence in `template` in a single pass.
/// Inserted values are never scanned again, so a title containing `{{app_url}}`
/// is sent as written.
pub fn substitute(template: &str, fields: &ReminderFields) -> String {
    let to_name = non_blank(&fields.to_name).unwrap_or(DEFAULT_RECIPIENT_NAME);
    let description = if fields.task_description.is_empty() {
        NO_DESCRIPTION
    } else {
        fields.task_description.as_str()
    };
    let app_url = fields
        .app_url
        .as_deref()
        .and_then(non_blank)
        .unwrap_or(DEFAULT_APP_URL);
    let due_date = format_due_date(fields.due_date);

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let matched = after.find("}}").and_then(|close| {
            let value = match &after[..close] {
                "to_name" => to_name,
                "task_title" => fields.task_title.as_str(),
                "task_description" => description,
                "due_date" => due_date.as_str(),
                "reminder_type" => fields.reminder_type.as_str(),
                "app_url" => app_url,
                _ => return None,
            };
            Some((value, close))
        });

        match matched {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 2..];
            }
            None => {
                // Not a known token: keep one brace and rescan from the next
                out.push('{');
                rest = &rest[open + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// e.g. "Tuesday, January 14, 2025"
pub fn format_due_date(date: NaiveDate) -> String {
    date.format("%A, %B %d, %Y").to_string()
}

/// Subject for a reminder type, matched case-insensitively
pub fn subject_line(reminder_type: &str, task_title: &str) -> String {
    match reminder_type.trim().to_lowercase().as_str() {
        "overdue" => format!("⚠️ Overdue Task: {task_title}"),
        "today" | "due today" => format!("📅 Task Due Today: {task_title}"),
        "tomorrow" | "due tomorrow" => format!("🔔 Task Due Tomorrow: {task_title}"),
        _ => format!("Task Reminder: {task_title}"),
    }
}

fn non_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

//! Task reminder emails: render the template for one goal and hand it to a [`Mailer`].

use chrono::NaiveDate;
use log::error;
use std::sync::Arc;

use super::dispatcher::Mailer;
use super::template::{ReminderFields, TemplateRenderer, TASK_REMINDER_TEMPLATE};
use crate::features::reminders::ReminderCategory;

/// Who a reminder goes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub email: String,
    pub name: String,
}

pub struct ReminderNotifier {
    renderer: TemplateRenderer,
    mailer: Arc<dyn Mailer>,
    app_url: Option<String>,
}

impl ReminderNotifier {
    pub fn new(renderer: TemplateRenderer, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            renderer,
            mailer,
            app_url: None,
        }
    }

    pub fn with_app_url(mut self, app_url: impl Into<String>) -> Self {
        self.app_url = Some(app_url.into());
        self
    }

    /// Render and send one reminder. A missing template counts as a failed send.
    pub async fn send_task_reminder(
        &self,
        recipient: &Recipient,
        task_title: &str,
        task_description: &str,
        due_date: NaiveDate,
        category: ReminderCategory,
    ) -> bool {
        let fields = ReminderFields {
            to_name: recipient.name.clone(),
            task_title: task_title.to_string(),
            task_description: task_description.to_string(),
            due_date,
            reminder_type: category.label().to_string(),
            app_url: self.app_url.clone(),
        };

        let rendered = match self.renderer.render(TASK_REMINDER_TEMPLATE, &fields).await {
            Ok(rendered) => rendered,
            Err(e) => {
                error!("❌ Cannot render reminder for '{task_title}' to {}: {e}", recipient.email);
                return false;
            }
        };

        self.mailer
            .send(&recipient.email, &recipient.name, &rendered.subject, &rendered.body)
            .await
    }
}

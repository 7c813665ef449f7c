//! SMTP delivery
//!
//! One connection per message: connect, upgrade with STARTTLS when the relay
//! offers it, authenticate, send, quit. The transport is built inside
//! [`SmtpMailer::deliver`] and dropped on every exit path, so a failed
//! handshake or rejected message never leaves a socket open.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::{error, info};
use thiserror::Error;

use crate::core::config::SmtpSettings;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid {role} address '{address}': {source}")]
    Address {
        role: &'static str,
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Sends a single HTML email and reports success as a boolean
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to_email: &str, to_name: &str, subject: &str, html_body: &str) -> bool;
}

pub struct SmtpMailer {
    settings: SmtpSettings,
}

impl SmtpMailer {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    pub fn build_message(
        &self,
        to_email: &str,
        to_name: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<Message, DispatchError> {
        let from = mailbox("sender", &self.settings.from_email, &self.settings.from_name)?;
        let to = mailbox("recipient", to_email, to_name)?;

        Ok(Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())?)
    }

    async fn deliver(&self, message: Message) -> Result<(), DispatchError> {
        let tls = TlsParameters::new(self.settings.host.clone())?;
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(self.settings.host.as_str())
                .port(self.settings.port)
                .tls(Tls::Opportunistic(tls))
                .timeout(Some(self.settings.timeout));

        if !self.settings.user.is_empty() {
            builder = builder.credentials(Credentials::new(
                self.settings.user.clone(),
                self.settings.pass.clone(),
            ));
        }

        let transport = builder.build();
        transport.send(message).await?;
        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to_email: &str, to_name: &str, subject: &str, html_body: &str) -> bool {
        let result = match self.build_message(to_email, to_name, subject, html_body) {
            Ok(message) => self.deliver(message).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                info!("📧 Email sent to {to_email}: {subject}");
                true
            }
            Err(e) => {
                error!("❌ Failed to send email to {to_email}: {e}");
                false
            }
        }
    }
}

fn mailbox(role: &'static str, email: &str, name: &str) -> Result<Mailbox, DispatchError> {
    let address: Address = email.trim().parse().map_err(|source| DispatchError::Address {
        role,
        address: email.to_string(),
        source,
    })?;
    let name = Some(name.trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string);
    Ok(Mailbox::new(name, address))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn settings(port: u16) -> SmtpSettings {
        SmtpSettings {
            host: "127.0.0.1".to_string(),
            port,
            user: "robot@example.com".to_string(),
            pass: "secret".to_string(),
            from_email: "robot@example.com".to_string(),
            from_name: "Goal Setting App".to_string(),
            timeout: Duration::from_secs(2),
        }
    }

    fn closed_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    #[test]
    fn test_build_message_is_html() {
        let mailer = SmtpMailer::new(settings(587));
        let message = mailer
            .build_message("ada@example.com", "Ada", "Task Reminder: Taxes", "<p>hi</p>")
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("ada@example.com"));
        assert!(raw.contains("robot@example.com"));
        assert!(raw.contains("Content-Type: text/html"));
        assert!(raw.contains("<p>hi</p>"));
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let mailer = SmtpMailer::new(settings(587));
        let err = mailer
            .build_message("not an address", "Ada", "s", "b")
            .unwrap_err();

        assert!(matches!(err, DispatchError::Address { role: "recipient", .. }));
    }

    #[test]
    fn test_build_message_rejects_missing_sender() {
        let mut s = settings(587);
        s.from_email = String::new();
        let mailer = SmtpMailer::new(s);

        let err = mailer
            .build_message("ada@example.com", "Ada", "s", "b")
            .unwrap_err();

        assert!(matches!(err, DispatchError::Address { role: "sender", .. }));
    }

    #[tokio::test]
    async fn test_send_reports_false_for_invalid_recipient() {
        let mailer = SmtpMailer::new(settings(closed_port()));
        assert!(!mailer.send("nope", "Ada", "subject", "<p>body</p>").await);
    }

    #[tokio::test]
    async fn test_send_reports_false_when_relay_unreachable() {
        let mailer = SmtpMailer::new(settings(closed_port()));
        assert!(
            !mailer
                .send("ada@example.com", "Ada", "subject", "<p>body</p>")
                .await
        );
    }
}

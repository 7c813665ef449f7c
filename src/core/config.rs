//! # Configuration
//!
//! Environment-sourced settings for the reminder worker. Every optional value
//! has a fallback so a bare `.env` with Supabase credentials is enough to boot.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Added `REMINDER_DEDUPE` and `SMTP_TIMEOUT_SECS`
//! - 1.0.0: Initial release with Supabase, SMTP and app URL settings

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_FROM_NAME: &str = "Goal Setting App";
pub const DEFAULT_APP_URL: &str = "http://localhost:5200";
pub const DEFAULT_REMINDER_INTERVAL_SECS: u64 = 3600;

/// Outbound mail relay settings
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from_email: String,
    pub from_name: String,
    pub timeout: Duration,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_SMTP_HOST.to_string(),
            port: DEFAULT_SMTP_PORT,
            user: String::new(),
            pass: String::new(),
            from_email: String::new(),
            from_name: DEFAULT_FROM_NAME.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_key: String,
    pub http_timeout: Duration,
    pub smtp: SmtpSettings,
    pub app_url: String,
    /// Directory that holds `Templates/`
    pub content_root: PathBuf,
    pub reminder_interval: Duration,
    pub reminder_dedupe: bool,
    pub log_level: String,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary lookup (blank values count as unset)
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let supabase_url = get("SUPABASE_URL")
            .context("SUPABASE_URL environment variable not set")?
            .trim_end_matches('/')
            .to_string();
        let supabase_key = get("SUPABASE_KEY").context("SUPABASE_KEY environment variable not set")?;

        let smtp_user = get("SMTP_USER").unwrap_or_default();
        let smtp = SmtpSettings {
            host: get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            port: parse_or("SMTP_PORT", get("SMTP_PORT"), DEFAULT_SMTP_PORT)?,
            pass: get("SMTP_PASS").unwrap_or_default(),
            from_email: get("FROM_EMAIL").unwrap_or_else(|| smtp_user.clone()),
            from_name: get("FROM_NAME").unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
            timeout: Duration::from_secs(parse_or(
                "SMTP_TIMEOUT_SECS",
                get("SMTP_TIMEOUT_SECS"),
                30u64,
            )?),
            user: smtp_user,
        };

        let interval_secs = parse_or(
            "REMINDER_INTERVAL_SECS",
            get("REMINDER_INTERVAL_SECS"),
            DEFAULT_REMINDER_INTERVAL_SECS,
        )?;
        if interval_secs == 0 {
            anyhow::bail!("REMINDER_INTERVAL_SECS must be greater than zero");
        }

        Ok(Config {
            supabase_url,
            supabase_key,
            http_timeout: Duration::from_secs(parse_or(
                "HTTP_TIMEOUT_SECS",
                get("HTTP_TIMEOUT_SECS"),
                30u64,
            )?),
            smtp,
            app_url: get("APP_URL").unwrap_or_else(|| DEFAULT_APP_URL.to_string()),
            content_root: get("CONTENT_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            reminder_interval: Duration::from_secs(interval_secs),
            reminder_dedupe: parse_flag("REMINDER_DEDUPE", get("REMINDER_DEDUPE"), true)?,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid value for {key} ({raw}): {e}")),
        None => Ok(default),
    }
}

fn parse_flag(key: &str, value: Option<String>, default: bool) -> Result<bool> {
    match value.as_deref().map(str::to_lowercase).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on" | "enabled") => Ok(true),
        Some("0" | "false" | "no" | "off" | "disabled") => Ok(false),
        Some(other) => Err(anyhow::anyhow!("Invalid value for {key}: {other}")),
    }
}

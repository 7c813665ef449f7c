use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use goal_reminders::core::Config;
use goal_reminders::database::{GoalRepository, SupabaseRepository};
use goal_reminders::features::email::{Mailer, ReminderNotifier, SmtpMailer, TemplateRenderer};
use goal_reminders::features::reminders::{ReminderScheduler, SchedulerSettings};
use goal_reminders::features::{get_app_version, get_features};

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Goal Reminder worker v{}...", get_app_version());
    for feature in get_features() {
        let toggle = if feature.toggleable { "toggleable" } else { "always on" };
        info!("   - {} v{} ({}, {toggle})", feature.name, feature.version, feature.id);
    }

    if config.smtp.user.is_empty() {
        info!("📭 SMTP_USER not set - sending without authentication");
    }

    let repository: Arc<dyn GoalRepository> = Arc::new(SupabaseRepository::new(
        &config.supabase_url,
        &config.supabase_key,
        config.http_timeout,
    )?);
    info!("🗄️ Using goal store at {}", config.supabase_url);

    let renderer = TemplateRenderer::new(&config.content_root);
    let template_path = renderer.template_path(goal_reminders::features::email::TASK_REMINDER_TEMPLATE);
    if !template_path.exists() {
        // Not fatal: every dispatch fails until the template appears
        error!(
            "❌ Email template not found at {} - reminders will not be sent",
            template_path.display()
        );
    }

    let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::new(config.smtp.clone()));
    info!(
        "📧 Mail relay {}:{} (from: {} <{}>)",
        config.smtp.host, config.smtp.port, config.smtp.from_name, config.smtp.from_email
    );

    let notifier = ReminderNotifier::new(renderer, mailer).with_app_url(config.app_url.clone());
    let scheduler = ReminderScheduler::new(repository, notifier, SchedulerSettings::from(&config));

    let shutdown = CancellationToken::new();
    let handle = scheduler.start(shutdown.clone());

    shutdown_signal().await;
    info!("Shutting down, waiting for the current sweep to finish...");
    shutdown.cancel();
    handle.join().await?;

    info!("Goal Reminder worker stopped");
    Ok(())
}

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;

use watchscout::config;
use watchscout::ingest;
use watchscout::notify::{Notifier, SmtpMailer};
use watchscout::reddit::RedditClient;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the operational settings YAML file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
    /// Path to the credentials YAML file
    #[arg(long, default_value = "credentials.yaml")]
    credentials: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let settings = config::load_settings(&args.config)?;
    let credentials = config::load_credentials(&args.credentials)?;
    settings.ensure_dirs()?;

    let source = RedditClient::connect(&credentials.reddit).await?;
    let notifier = if settings.email_notifications {
        let mailer = SmtpMailer::new(&credentials.email)?;
        Some(Notifier::new(
            Box::new(mailer),
            credentials.email.recipient.clone(),
        ))
    } else {
        info!("email notifications disabled");
        None
    };

    // One partition per process-local calendar day, chosen at run start.
    let today = Local::now().date_naive();
    let report = ingest::run_once(
        &source,
        notifier.as_ref(),
        &settings,
        Path::new(&settings.data_dir),
        today,
    )
    .await?;

    info!(accepted = report.accepted, "exiting");
    Ok(())
}

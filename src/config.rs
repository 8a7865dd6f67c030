//! Configuration loader and validator for the subreddit listing scraper.
//!
//! Two separate YAML bundles: operational settings (tunable behavior) and
//! credentials (secrets), so the latter can be stored and secured
//! independently. Both are loaded once at startup and treated as immutable.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Operational settings, mirroring the `config.yaml` schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: String,
    pub subreddits: Vec<String>,
    pub n_posts_to_search: u32,
    #[serde(rename = "RELEVANT_SUBSTRINGS")]
    pub relevant_substrings: Vec<String>,
    pub email_notifications: bool,
}

/// Secrets bundle, mirroring the `credentials.yaml` schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub reddit: RedditCredentials,
    pub email: EmailCredentials,
}

/// Reddit app-only OAuth2 credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

/// SMTP login and notification recipient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailCredentials {
    pub smtp_host: String,
    pub username: String,
    pub password: String,
    pub recipient: String,
}

impl Settings {
    /// Ensure required directories exist (creates `data_dir` if missing).
    pub fn ensure_dirs(&self) -> Result<(), std::io::Error> {
        if self.data_dir.trim().is_empty() {
            return Ok(());
        }
        fs::create_dir_all(&self.data_dir)
    }
}

/// Load operational settings from a YAML file and validate them.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path)?;
    let settings: Settings = serde_yaml::from_str(&content)?;
    validate_settings(&settings)?;
    Ok(settings)
}

/// Load credentials from a YAML file and validate them.
pub fn load_credentials(path: &Path) -> Result<Credentials, ConfigError> {
    let content = fs::read_to_string(path)?;
    let credentials: Credentials = serde_yaml::from_str(&content)?;
    validate_credentials(&credentials)?;
    Ok(credentials)
}

fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    if settings.data_dir.trim().is_empty() {
        return Err(ConfigError::Invalid("data_dir must be non-empty"));
    }
    if settings.subreddits.is_empty() {
        return Err(ConfigError::Invalid("subreddits must list at least one channel"));
    }
    if settings.subreddits.iter().any(|s| s.trim().is_empty()) {
        return Err(ConfigError::Invalid("subreddits entries must be non-empty"));
    }
    if settings.n_posts_to_search == 0 {
        return Err(ConfigError::Invalid("n_posts_to_search must be > 0"));
    }
    Ok(())
}

fn validate_credentials(credentials: &Credentials) -> Result<(), ConfigError> {
    if credentials.reddit.client_id.trim().is_empty() {
        return Err(ConfigError::Invalid("reddit.client_id must be non-empty"));
    }
    if credentials.reddit.client_secret.trim().is_empty() {
        return Err(ConfigError::Invalid("reddit.client_secret must be non-empty"));
    }
    if credentials.reddit.user_agent.trim().is_empty() {
        return Err(ConfigError::Invalid("reddit.user_agent must be non-empty"));
    }

    if credentials.email.smtp_host.trim().is_empty() {
        return Err(ConfigError::Invalid("email.smtp_host must be non-empty"));
    }
    if credentials.email.username.trim().is_empty() {
        return Err(ConfigError::Invalid("email.username must be non-empty"));
    }
    if credentials.email.password.trim().is_empty() {
        return Err(ConfigError::Invalid("email.password must be non-empty"));
    }
    if credentials.email.recipient.trim().is_empty() {
        return Err(ConfigError::Invalid("email.recipient must be non-empty"));
    }
    Ok(())
}

/// Example operational settings document.
pub fn example_settings() -> &'static str {
    r#"data_dir: "./data"

subreddits:
  - "Watchexchange"

n_posts_to_search: 100

RELEVANT_SUBSTRINGS:
  - "Rolex"
  - "Omega"

email_notifications: true
"#
}

/// Example credentials document.
pub fn example_credentials() -> &'static str {
    r#"reddit:
  client_id: "YOUR_REDDIT_CLIENT_ID"
  client_secret: "YOUR_REDDIT_CLIENT_SECRET"
  user_agent: "watchscout/0.1 by your_username"

email:
  smtp_host: "smtp.gmail.com"
  username: "scraper.notifications@gmail.com"
  password: "YOUR_APP_PASSWORD"
  recipient: "you@example.com"
"#
}

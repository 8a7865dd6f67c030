//! Notifier: renders an accepted post as a two-column report and hands it to
//! the email transport. Delivery is best-effort; failures are surfaced as
//! [`NotifyError`] and never affect dedup state.
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::config::EmailCredentials;
use crate::model::{timestamp, Post};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to compose email: {0}")]
    Compose(#[from] lettre::error::Error),
    #[error("smtp transport failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Renders the post as a `field  value` table, one row per field, with the
/// field column padded to a common width. Absent optionals render empty.
pub fn format_report(post: &Post) -> String {
    let rows = [
        ("id", post.id.clone()),
        ("channel", post.channel.clone()),
        ("title", post.title.clone()),
        (
            "created_at",
            post.created_at.format(timestamp::FORMAT).to_string(),
        ),
        ("author", post.author.clone().unwrap_or_default()),
        (
            "reputation_marker",
            post.reputation_marker.clone().unwrap_or_default(),
        ),
        (
            "category_marker",
            post.category_marker.clone().unwrap_or_default(),
        ),
        ("url", post.url.clone()),
    ];
    let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (name, value) in &rows {
        out.push_str(&format!("{name:<width$}  {value}\n"));
    }
    out
}

/// The mailer plus its configured recipient; the notification subject is the
/// post title.
pub struct Notifier {
    mailer: Box<dyn Mailer>,
    recipient: String,
}

impl Notifier {
    pub fn new(mailer: Box<dyn Mailer>, recipient: String) -> Self {
        Self { mailer, recipient }
    }

    pub async fn notify(&self, post: &Post) -> Result<(), NotifyError> {
        self.mailer
            .send(&self.recipient, &post.title, &format_report(post))
            .await
    }
}

/// SMTP implementation over lettre's async Tokio transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailer {
    pub fn new(creds: &EmailCredentials) -> Result<Self, NotifyError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&creds.smtp_host)?
            .credentials(SmtpCredentials::new(
                creds.username.clone(),
                creds.password.clone(),
            ))
            .build();
        let sender = creds.username.parse::<Mailbox>()?;
        Ok(Self { transport, sender })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(recipient.parse::<Mailbox>()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;
        self.transport.send(message).await?;
        Ok(())
    }
}

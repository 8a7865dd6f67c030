//! Record Extractor: maps one fetched submission into the canonical [`Post`].
//! Pure, no I/O.
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::model::Post;
use crate::reddit::RawSubmission;

/// Stored timestamps are the source's UTC creation time minus this fixed
/// offset. Deliberately not DST-aware: earlier versions of the scraper wrote
/// partitions with this exact correction, and changing it would break
/// comparisons with historical rows.
pub const UTC_OFFSET_HOURS: i64 = 4;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("submission has no id")]
    MissingId,
    #[error("submission {id} has no title")]
    MissingTitle { id: String },
    #[error("submission {id} has no permalink")]
    MissingPermalink { id: String },
    #[error("submission {id} has no creation time")]
    MissingTimestamp { id: String },
    #[error("submission {id} has invalid creation time {epoch}")]
    InvalidTimestamp { id: String, epoch: f64 },
}

/// Build a [`Post`] from a raw submission, failing if a required field
/// (id, title, creation time, permalink) is missing or malformed. Optional
/// fields (author, flair markers) pass through as `None`.
pub fn extract_post(channel: &str, raw: &RawSubmission) -> Result<Post, ExtractionError> {
    let id = raw
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(ExtractionError::MissingId)?
        .to_string();
    let title = raw
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ExtractionError::MissingTitle { id: id.clone() })?
        .to_string();
    let permalink = raw
        .permalink
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ExtractionError::MissingPermalink { id: id.clone() })?;

    let epoch = raw
        .created_utc
        .ok_or_else(|| ExtractionError::MissingTimestamp { id: id.clone() })?;
    if !epoch.is_finite() || epoch < 0.0 {
        return Err(ExtractionError::InvalidTimestamp { id, epoch });
    }
    let created_utc = DateTime::<Utc>::from_timestamp(epoch.trunc() as i64, 0)
        .ok_or_else(|| ExtractionError::InvalidTimestamp {
            id: id.clone(),
            epoch,
        })?;
    let created_at = (created_utc - Duration::hours(UTC_OFFSET_HOURS)).naive_utc();

    Ok(Post {
        id,
        channel: channel.to_string(),
        title,
        created_at,
        author: raw.author.clone(),
        reputation_marker: raw.author_flair_text.clone(),
        category_marker: raw.link_flair_text.clone(),
        url: format!("https://www.reddit.com{permalink}"),
    })
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single accepted listing. Field order is the column order of the
/// persisted partition; optional fields round-trip as empty cells.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    /// Opaque identifier assigned by the source channel; the dedup key.
    pub id: String,
    /// Name of the originating subreddit.
    pub channel: String,
    pub title: String,
    /// Creation time after the fixed offset correction (see `extract`).
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    /// Absent for deleted/suspended accounts.
    pub author: Option<String>,
    /// Author flair text, e.g. a transaction count.
    pub reputation_marker: Option<String>,
    /// Link flair text, e.g. a price category.
    pub category_marker: Option<String>,
    /// Fully-qualified permalink.
    pub url: String,
}

/// Timestamps are persisted as `YYYY-MM-DD HH:MM:SS` (space separator),
/// matching rows written by earlier versions of the scraper.
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

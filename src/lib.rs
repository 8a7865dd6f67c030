//! Subreddit listing scraper: polls configured subreddits for new listing
//! posts, filters them against interest substrings, deduplicates against a
//! per-day CSV partition, and emails a report for each newly accepted post.

pub mod config;
pub mod extract;
pub mod filter;
pub mod ingest;
pub mod model;
pub mod notify;
pub mod reddit;
pub mod store;

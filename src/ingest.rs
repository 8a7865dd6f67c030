//! Ingestion Loop: one full poll of every configured channel.
//!
//! Per run: load the day's partition, then for each subreddit fetch the
//! newest submissions and extract → filter → dedup-check → append → notify
//! each one, then flush the partition exactly once. Item-scoped failures
//! (extraction, notification) are logged and skipped; a fetch failure skips
//! the rest of that channel but later channels proceed; store failures are
//! fatal for the run.
use anyhow::Result;
use chrono::NaiveDate;
use std::path::Path;
use tracing::{info, warn};

use crate::config::Settings;
use crate::extract;
use crate::filter;
use crate::notify::Notifier;
use crate::reddit::SubmissionSource;
use crate::store::SeenStore;

/// Counters for the closing log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub fetched: usize,
    pub accepted: usize,
    pub skipped_irrelevant: usize,
    pub skipped_seen: usize,
    pub extraction_failures: usize,
    pub notify_failures: usize,
    pub failed_channels: usize,
}

/// Run the pipeline once against `source`, deduplicating against (and
/// persisting to) the partition for `today` under `data_dir`. Notification
/// is skipped entirely when `notifier` is `None`.
pub async fn run_once(
    source: &dyn SubmissionSource,
    notifier: Option<&Notifier>,
    settings: &Settings,
    data_dir: &Path,
    today: NaiveDate,
) -> Result<RunReport> {
    let mut store = SeenStore::load(data_dir, today)?;
    info!(day = %today, known = store.len(), "loaded partition");

    let mut report = RunReport::default();
    for subreddit in &settings.subreddits {
        let submissions = match source
            .fetch_newest(subreddit, settings.n_posts_to_search)
            .await
        {
            Ok(submissions) => submissions,
            Err(err) => {
                warn!(?err, subreddit, "fetch failed; skipping channel");
                report.failed_channels += 1;
                continue;
            }
        };

        for raw in &submissions {
            report.fetched += 1;
            let post = match extract::extract_post(subreddit, raw) {
                Ok(post) => post,
                Err(err) => {
                    warn!(?err, subreddit, "skipping malformed submission");
                    report.extraction_failures += 1;
                    continue;
                }
            };

            if !filter::is_relevant(&post.title, &settings.relevant_substrings) {
                report.skipped_irrelevant += 1;
                continue;
            }
            // Checked against the store as mutated so far, so duplicates
            // within a single run are caught too.
            if store.contains(&post.id) {
                report.skipped_seen += 1;
                continue;
            }

            store.append(post.clone())?;
            report.accepted += 1;
            info!(id = %post.id, subreddit, title = %post.title, "accepted new listing");

            if let Some(notifier) = notifier {
                // The post is already recorded as seen; a failed send is
                // logged and never retried.
                if let Err(err) = notifier.notify(&post).await {
                    warn!(?err, id = %post.id, "notification failed");
                    report.notify_failures += 1;
                }
            }
        }
    }

    store.flush()?;
    info!(
        fetched = report.fetched,
        accepted = report.accepted,
        skipped_irrelevant = report.skipped_irrelevant,
        skipped_seen = report.skipped_seen,
        extraction_failures = report.extraction_failures,
        notify_failures = report.notify_failures,
        failed_channels = report.failed_channels,
        "run complete"
    );
    Ok(report)
}

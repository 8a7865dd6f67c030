//! Dedup Store: the per-day partition of previously accepted posts.
//!
//! One CSV file per calendar day under the data directory, loaded in full at
//! the start of a run, mutated in memory, and written back in full once at
//! the end. Membership checks go through a `HashSet` index keyed by post id
//! rather than scanning the rows.
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::Post;

/// Column order of the partition file; must match the `Post` field order.
const COLUMNS: [&str; 8] = [
    "id",
    "channel",
    "title",
    "created_at",
    "author",
    "reputation_marker",
    "category_marker",
    "url",
];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on partition {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("partition {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("partition {path} contains id {id} more than once")]
    DuplicateRow { path: PathBuf, id: String },
    #[error("post id {0} already present in store")]
    DuplicateId(String),
    #[error("failed to write partition {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[derive(Debug)]
pub struct SeenStore {
    path: PathBuf,
    posts: Vec<Post>,
    ids: HashSet<String>,
}

impl SeenStore {
    /// Partition file for a given day: `<data_dir>/<YYYY-MM-DD>.csv`.
    pub fn partition_path(data_dir: &Path, day: NaiveDate) -> PathBuf {
        data_dir.join(format!("{day}.csv"))
    }

    /// Read the day's partition if present, otherwise start empty. A file
    /// that exists but cannot be parsed is fatal; proceeding with an empty
    /// store would re-notify every previously seen post.
    pub fn load(data_dir: &Path, day: NaiveDate) -> Result<Self, StoreError> {
        let path = Self::partition_path(data_dir, day);
        let mut store = Self {
            path: path.clone(),
            posts: Vec::new(),
            ids: HashSet::new(),
        };
        if !path.exists() {
            return Ok(store);
        }

        let mut reader = csv::Reader::from_path(&path).map_err(|source| StoreError::Corrupt {
            path: path.clone(),
            source,
        })?;
        for record in reader.deserialize() {
            let post: Post = record.map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?;
            if !store.ids.insert(post.id.clone()) {
                return Err(StoreError::DuplicateRow { path, id: post.id });
            }
            store.posts.push(post);
        }
        Ok(store)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Add a post. Callers are expected to check [`contains`](Self::contains)
    /// first; a duplicate here is an internal invariant violation, not a
    /// recoverable condition.
    pub fn append(&mut self, post: Post) -> Result<(), StoreError> {
        if !self.ids.insert(post.id.clone()) {
            return Err(StoreError::DuplicateId(post.id));
        }
        self.posts.push(post);
        Ok(())
    }

    /// Write the full partition, header row plus all rows in insertion
    /// order, overwriting any prior content. Creates the file even when the
    /// store is empty so the run leaves a well-defined partition behind.
    pub fn flush(&self) -> Result<(), StoreError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        // Automatic headers are disabled so the hand-written header below is
        // emitted exactly once, including for empty partitions.
        writer
            .write_record(COLUMNS)
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        for post in &self.posts {
            writer.serialize(post).map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        writer.flush().map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }
}

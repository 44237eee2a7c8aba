//! Repository abstraction for video storage.
//!
//! This module defines the `VideoRepository` trait that abstracts storage
//! of video records. Only an in-memory backend ships (the store performs no
//! disk I/O), but the seam keeps the coordination logic independent of the
//! backend.
//!
//! Writes are optimistic: every stored record carries a version, and a
//! write that names a stale version is rejected so that two concurrent
//! reviewers cannot silently overwrite each other's transition.

mod memory;

pub use memory::InMemoryRepository;

use async_trait::async_trait;
use std::fmt;

use reelcheck_core::{Video, VideoId};

/// A video record plus its write version.
///
/// The version starts at 1 on insert and is bumped by the repository on
/// every successful update.
#[derive(Debug, Clone)]
pub struct StoredVideo {
    pub video: Video,
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Update named a version that is no longer current.
    StaleVersion { id: VideoId, expected: u64, actual: u64 },
    /// Update or remove named an id not in the active set.
    Missing { id: VideoId },
    /// Backend failure (operation, detail).
    Storage { operation: String, detail: String },
}

impl RepositoryError {
    pub fn storage(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Storage {
            operation: operation.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::StaleVersion { id, expected, actual } => write!(
                f,
                "stale write for video {id}: expected version {expected}, found {actual}"
            ),
            RepositoryError::Missing { id } => write!(f, "video {id} is not in the active set"),
            RepositoryError::Storage { operation, detail } => {
                write!(f, "storage failure during {operation}: {detail}")
            }
        }
    }
}

impl std::error::Error for RepositoryError {}

/// Repository trait for video records.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Get a video from the active set, returning None if not present.
    async fn get(&self, id: VideoId) -> Result<Option<StoredVideo>, RepositoryError>;

    /// Insert a new video at version 1. The id must not already be live or
    /// tombstoned.
    async fn insert(&self, video: Video) -> Result<StoredVideo, RepositoryError>;

    /// Replace a video's record, guarded by the version the caller read.
    /// Fails with `StaleVersion` if another write landed in between.
    async fn update(
        &self,
        id: VideoId,
        expected_version: u64,
        video: Video,
    ) -> Result<StoredVideo, RepositoryError>;

    /// Remove a video from the active set, leaving a tombstone so the id is
    /// never reused and its comment history stays resolvable.
    async fn remove(&self, id: VideoId) -> Result<StoredVideo, RepositoryError>;

    /// Snapshot of the whole active set, in no particular order.
    async fn list(&self) -> Result<Vec<StoredVideo>, RepositoryError>;

    /// Whether the id was deleted from the active set.
    async fn is_tombstoned(&self, id: VideoId) -> Result<bool, RepositoryError>;
}

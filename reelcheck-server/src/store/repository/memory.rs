//! In-memory implementation of `VideoRepository`.
//!
//! Stores video records in a `HashMap` protected by a `RwLock`, plus a
//! tombstone set for deleted ids. All state is lost on restart.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{RepositoryError, StoredVideo, VideoRepository};
use reelcheck_core::{Video, VideoId};

#[derive(Default)]
pub struct InMemoryRepository {
    videos: RwLock<HashMap<VideoId, StoredVideo>>,
    /// Ids removed from the active set. Kept forever so ids are never
    /// reused and comment history for deleted videos stays resolvable.
    tombstones: RwLock<HashSet<VideoId>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VideoRepository for InMemoryRepository {
    async fn get(&self, id: VideoId) -> Result<Option<StoredVideo>, RepositoryError> {
        let videos = self.videos.read().await;
        Ok(videos.get(&id).cloned())
    }

    async fn insert(&self, video: Video) -> Result<StoredVideo, RepositoryError> {
        let mut videos = self.videos.write().await;
        let tombstones = self.tombstones.read().await;
        let id = video.id;
        if videos.contains_key(&id) || tombstones.contains(&id) {
            return Err(RepositoryError::storage(
                "insert video",
                format!("id {id} was already assigned"),
            ));
        }
        let stored = StoredVideo { video, version: 1 };
        videos.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: VideoId,
        expected_version: u64,
        video: Video,
    ) -> Result<StoredVideo, RepositoryError> {
        let mut videos = self.videos.write().await;
        let current = videos.get(&id).ok_or(RepositoryError::Missing { id })?;
        if current.version != expected_version {
            return Err(RepositoryError::StaleVersion {
                id,
                expected: expected_version,
                actual: current.version,
            });
        }
        let stored = StoredVideo {
            video,
            version: expected_version + 1,
        };
        videos.insert(id, stored.clone());
        Ok(stored)
    }

    async fn remove(&self, id: VideoId) -> Result<StoredVideo, RepositoryError> {
        let mut videos = self.videos.write().await;
        let removed = videos.remove(&id).ok_or(RepositoryError::Missing { id })?;
        let mut tombstones = self.tombstones.write().await;
        tombstones.insert(id);
        Ok(removed)
    }

    async fn list(&self) -> Result<Vec<StoredVideo>, RepositoryError> {
        let videos = self.videos.read().await;
        Ok(videos.values().cloned().collect())
    }

    async fn is_tombstoned(&self, id: VideoId) -> Result<bool, RepositoryError> {
        let tombstones = self.tombstones.read().await;
        Ok(tombstones.contains(&id))
    }
}

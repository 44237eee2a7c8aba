//! Append-only comment log.
//!
//! One insertion-ordered log per video id. Comments are never edited or
//! removed, and the log outlives the video: deleting a video leaves its
//! comments retrievable as orphaned history.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::RwLock;

use reelcheck_core::{Comment, CommentId, Identity, VideoId};

pub struct CommentLog {
    entries: RwLock<HashMap<VideoId, Vec<Comment>>>,
    next_id: AtomicU64,
}

impl Default for CommentLog {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentLog {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Append a comment. The caller is responsible for validating that the
    /// text is non-empty and the video id is known.
    pub async fn append(&self, video_id: VideoId, author: &Identity, text: String) -> Comment {
        let comment = Comment {
            id: CommentId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            video_id,
            author_id: author.id,
            author_display_name: author.display_name.clone(),
            text,
            created_at: Utc::now(),
        };
        let mut entries = self.entries.write().await;
        entries.entry(video_id).or_default().push(comment.clone());
        comment
    }

    /// All comments for a video, newest first. The underlying log is
    /// insertion-ordered, so reversal gives a stable newest-first order
    /// even when timestamps collide.
    pub async fn for_video(&self, video_id: VideoId) -> Vec<Comment> {
        let entries = self.entries.read().await;
        entries
            .get(&video_id)
            .map(|log| log.iter().rev().cloned().collect())
            .unwrap_or_default()
    }
}

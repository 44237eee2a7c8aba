//! Review comments.
//!
//! Comments are append-only history: never edited, never deleted, and kept
//! even after the video they reference is removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identity::UserId;
use crate::video::VideoId;

/// Newtype for a comment's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentId(pub u64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CommentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A single review comment. `video_id` is a back-reference for lookup only;
/// the comment log never owns or mutates the video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub video_id: VideoId,
    pub author_id: UserId,
    pub author_display_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

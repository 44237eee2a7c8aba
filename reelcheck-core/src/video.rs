//! Video records and their review status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::identity::UserId;

/// Newtype for a video's id. Assigned once at upload, monotonically
/// increasing, and never reused even after the video is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VideoId(pub u64);

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for VideoId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Durable handle to the uploaded media, as returned by the blob storage
/// collaborator. Opaque to this service; never dereferenced or validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle(pub String);

impl fmt::Display for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for FileHandle {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FileHandle {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Target platform for a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Instagram,
    Tiktok,
    Facebook,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Youtube => write!(f, "youtube"),
            Platform::Instagram => write!(f, "instagram"),
            Platform::Tiktok => write!(f, "tiktok"),
            Platform::Facebook => write!(f, "facebook"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "youtube" => Ok(Platform::Youtube),
            "instagram" => Ok(Platform::Instagram),
            "tiktok" => Ok(Platform::Tiktok),
            "facebook" => Ok(Platform::Facebook),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Review status of a video. `Pending` is the initial state; there is no
/// terminal state (deletion is a side-channel removal, not a transition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    Pending,
    Approved,
    ChangesRequested,
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoStatus::Pending => write!(f, "pending"),
            VideoStatus::Approved => write!(f, "approved"),
            VideoStatus::ChangesRequested => write!(f, "changes_requested"),
        }
    }
}

impl FromStr for VideoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(VideoStatus::Pending),
            "approved" => Ok(VideoStatus::Approved),
            "changes_requested" => Ok(VideoStatus::ChangesRequested),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// A video under review. Owned exclusively by the review store; other
/// components hold only the `VideoId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,
    pub title: String,
    /// The client this video was produced for (free-form reference).
    pub client_ref: String,
    pub platform: Platform,
    pub uploaded_at: DateTime<Utc>,
    pub uploader_id: UserId,
    pub status: VideoStatus,
    pub file_handle: FileHandle,
}

/// What an editor submits when uploading. The id, timestamp and initial
/// status are assigned by the store, never by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDraft {
    pub title: String,
    pub client_ref: String,
    pub platform: Platform,
    pub file_handle: Option<FileHandle>,
}

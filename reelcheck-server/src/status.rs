//! Status types for the status endpoint.

use serde::Serialize;

use reelcheck_core::{Video, VideoStatus};

/// Summary statistics for the status endpoint.
#[derive(Debug, Default, Serialize)]
pub struct StatusSummary {
    pub total_videos: usize,
    pub pending: usize,
    pub approved: usize,
    pub changes_requested: usize,
}

/// Full status payload.
#[derive(Debug, Serialize)]
pub struct StatusData {
    pub version: String,
    pub summary: StatusSummary,
}

impl StatusData {
    /// Create status data from a snapshot of the active set.
    pub fn from_videos(videos: &[Video], version: String) -> Self {
        let mut summary = StatusSummary {
            total_videos: videos.len(),
            ..Default::default()
        };
        for video in videos {
            match video.status {
                VideoStatus::Pending => summary.pending += 1,
                VideoStatus::Approved => summary.approved += 1,
                VideoStatus::ChangesRequested => summary.changes_requested += 1,
            }
        }
        Self { version, summary }
    }
}

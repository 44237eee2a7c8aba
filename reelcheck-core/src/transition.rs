//! Pure status transition function.
//!
//! This is the core of the review workflow. It takes the current status and
//! a review action and returns the new status, or rejects the change. The
//! function has NO side effects; authorization, persistence and
//! notifications happen in the store around it.

use crate::error::ReviewError;
use crate::video::VideoStatus;

/// A status change a reviewing client can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    /// Sign off on the video as delivered.
    Approve,
    /// Send the video back to the editor with a rationale.
    RequestChanges,
}

/// Compute the status a video moves to under `action`.
///
/// - `Approve` is legal from `Pending` and `ChangesRequested`; approving an
///   already-approved video is rejected.
/// - `RequestChanges` is legal from any status, including `Approved`
///   (approval is revocable).
pub fn transition(status: VideoStatus, action: ReviewAction) -> Result<VideoStatus, ReviewError> {
    match (status, action) {
        (VideoStatus::Approved, ReviewAction::Approve) => Err(ReviewError::InvalidTransition(
            "video is already approved".to_string(),
        )),
        (_, ReviewAction::Approve) => Ok(VideoStatus::Approved),
        (_, ReviewAction::RequestChanges) => Ok(VideoStatus::ChangesRequested),
    }
}

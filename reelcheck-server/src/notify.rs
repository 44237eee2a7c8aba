//! Notification collaborator.
//!
//! After a successful approve or request-changes, the store fires a
//! notification at whoever should hear about it (the uploading editor).
//! Delivery is fire-and-forget: a failed notification is logged and never
//! rolls back the state transition.

use async_trait::async_trait;
use tracing::info;

use reelcheck_core::{UserId, VideoId, VideoStatus};

/// Payload handed to the notification collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusNotification {
    pub video_id: VideoId,
    pub new_status: VideoStatus,
    pub recipient_id: UserId,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: StatusNotification) -> anyhow::Result<()>;
}

/// Default notifier: writes the notification to the log. A real deployment
/// swaps in an email/webhook collaborator here.
#[derive(Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: StatusNotification) -> anyhow::Result<()> {
        info!(
            video_id = %notification.video_id,
            new_status = %notification.new_status,
            recipient_id = %notification.recipient_id,
            "status notification"
        );
        Ok(())
    }
}

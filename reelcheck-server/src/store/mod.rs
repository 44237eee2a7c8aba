//! The review store: authoritative owner of video records.
//!
//! Every command goes through here: the store checks authorization, runs
//! the pure transition function, performs a version-guarded write against
//! the repository, appends to the comment log where the transition demands
//! it, and fires the notifier. The identity acting is passed explicitly to
//! every operation; the store reads no ambient session state.

pub mod repository;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use crate::comments::CommentLog;
use crate::notify::{Notifier, StatusNotification};
use reelcheck_core::{
    transition, Comment, Identity, ReviewAction, ReviewError, Role, Video, VideoDraft, VideoId,
    VideoStatus,
};
use repository::{RepositoryError, VideoRepository};

pub struct ReviewStore {
    repo: Arc<dyn VideoRepository>,
    comments: CommentLog,
    notifier: Arc<dyn Notifier>,
    next_video_id: AtomicU64,
}

impl ReviewStore {
    pub fn new(repo: Arc<dyn VideoRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            repo,
            comments: CommentLog::new(),
            notifier,
            next_video_id: AtomicU64::new(1),
        }
    }

    /// Snapshot of the active set, newest first by upload time (id breaks
    /// ties, so same-second uploads still order deterministically).
    pub async fn list_videos(
        &self,
        filter: Option<VideoStatus>,
    ) -> Result<Vec<Video>, ReviewError> {
        let mut videos: Vec<Video> = self
            .repo
            .list()
            .await
            .map_err(map_repo_error)?
            .into_iter()
            .map(|stored| stored.video)
            .filter(|v| filter.is_none_or(|wanted| v.status == wanted))
            .collect();
        videos.sort_by(|a, b| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(videos)
    }

    /// Register a new video. Editors only; starts out `Pending`.
    pub async fn upload(&self, caller: &Identity, draft: VideoDraft) -> Result<Video, ReviewError> {
        if caller.role != Role::Editor {
            return Err(ReviewError::Unauthorized(
                "only editors can upload videos".to_string(),
            ));
        }
        if draft.title.trim().is_empty() {
            return Err(ReviewError::InvalidInput("title must not be empty".to_string()));
        }
        let Some(file_handle) = draft.file_handle else {
            return Err(ReviewError::InvalidInput(
                "a video file is required".to_string(),
            ));
        };

        let video = Video {
            id: VideoId(self.next_video_id.fetch_add(1, Ordering::SeqCst)),
            title: draft.title,
            client_ref: draft.client_ref,
            platform: draft.platform,
            uploaded_at: chrono::Utc::now(),
            uploader_id: caller.id,
            status: VideoStatus::Pending,
            file_handle,
        };
        let stored = self.repo.insert(video).await.map_err(map_repo_error)?;
        info!(video_id = %stored.video.id, uploader = %caller.id, "video uploaded");
        Ok(stored.video)
    }

    /// Approve a video. Clients only; the uploading editor never signs off
    /// on their own work. Rejected if the video is already approved.
    pub async fn approve(&self, caller: &Identity, id: VideoId) -> Result<Video, ReviewError> {
        let stored = self
            .repo
            .get(id)
            .await
            .map_err(map_repo_error)?
            .ok_or_else(|| ReviewError::NotFound(format!("video {id}")))?;
        if caller.role != Role::Client {
            return Err(ReviewError::Unauthorized(
                "only the reviewing client can approve".to_string(),
            ));
        }

        let mut video = stored.video;
        video.status = transition(video.status, ReviewAction::Approve)?;

        let updated = self
            .repo
            .update(id, stored.version, video)
            .await
            .map_err(map_repo_error)?;
        info!(video_id = %id, client = %caller.id, "video approved");
        self.notify_uploader(&updated.video).await;
        Ok(updated.video)
    }

    /// Send a video back to its editor. Clients only; legal from any
    /// status, including revoking an earlier approval. Appends exactly one
    /// comment carrying the rationale.
    pub async fn request_changes(
        &self,
        caller: &Identity,
        id: VideoId,
        rationale: &str,
    ) -> Result<Video, ReviewError> {
        let stored = self
            .repo
            .get(id)
            .await
            .map_err(map_repo_error)?
            .ok_or_else(|| ReviewError::NotFound(format!("video {id}")))?;
        if caller.role != Role::Client {
            return Err(ReviewError::Unauthorized(
                "only the reviewing client can request changes".to_string(),
            ));
        }
        if rationale.trim().is_empty() {
            return Err(ReviewError::InvalidInput(
                "a rationale for the requested changes is required".to_string(),
            ));
        }

        let mut video = stored.video;
        video.status = transition(video.status, ReviewAction::RequestChanges)?;

        // Write the status first: if a concurrent reviewer wins the race we
        // return Conflict without leaving a stray rationale comment behind.
        let updated = self
            .repo
            .update(id, stored.version, video)
            .await
            .map_err(map_repo_error)?;
        self.comments.append(id, caller, rationale.to_string()).await;
        info!(video_id = %id, client = %caller.id, "changes requested");
        self.notify_uploader(&updated.video).await;
        Ok(updated.video)
    }

    /// Remove a video from the active set. Only the editor who uploaded it
    /// may delete it. The id is tombstoned, never reused, and the video's
    /// comments remain retrievable as orphaned history.
    pub async fn delete(&self, caller: &Identity, id: VideoId) -> Result<(), ReviewError> {
        if caller.role != Role::Editor {
            return Err(ReviewError::Unauthorized(
                "only editors can delete videos".to_string(),
            ));
        }
        let stored = self
            .repo
            .get(id)
            .await
            .map_err(map_repo_error)?
            .ok_or_else(|| ReviewError::NotFound(format!("video {id}")))?;
        if stored.video.uploader_id != caller.id {
            return Err(ReviewError::Unauthorized(
                "only the uploading editor can delete this video".to_string(),
            ));
        }

        self.repo.remove(id).await.map_err(map_repo_error)?;
        info!(video_id = %id, editor = %caller.id, "video deleted");
        Ok(())
    }

    /// Append a free-standing review comment. Open to both roles; the
    /// video must be in the active set.
    pub async fn add_comment(
        &self,
        caller: &Identity,
        id: VideoId,
        text: &str,
    ) -> Result<Comment, ReviewError> {
        if self.repo.get(id).await.map_err(map_repo_error)?.is_none() {
            return Err(ReviewError::NotFound(format!("video {id}")));
        }
        if text.trim().is_empty() {
            return Err(ReviewError::InvalidInput(
                "comment text must not be empty".to_string(),
            ));
        }
        Ok(self.comments.append(id, caller, text.to_string()).await)
    }

    /// All comments for a video, newest first. Serves tombstoned ids too:
    /// deletion never invalidates history. Unknown ids are an error, which
    /// distinguishes "no comments yet" from "no such video".
    pub async fn list_comments(&self, id: VideoId) -> Result<Vec<Comment>, ReviewError> {
        let live = self.repo.get(id).await.map_err(map_repo_error)?.is_some();
        if !live && !self.repo.is_tombstoned(id).await.map_err(map_repo_error)? {
            return Err(ReviewError::NotFound(format!("video {id}")));
        }
        Ok(self.comments.for_video(id).await)
    }

    async fn notify_uploader(&self, video: &Video) {
        let notification = StatusNotification {
            video_id: video.id,
            new_status: video.status,
            recipient_id: video.uploader_id,
        };
        // Fire-and-forget: a failed notification never rolls back the
        // transition that triggered it.
        if let Err(e) = self.notifier.send(notification).await {
            warn!(video_id = %video.id, "notification failed: {e:#}");
        }
    }
}

fn map_repo_error(err: RepositoryError) -> ReviewError {
    match err {
        RepositoryError::StaleVersion { id, .. } => ReviewError::Conflict(format!(
            "video {id} was modified concurrently; retry with fresh state"
        )),
        RepositoryError::Missing { id } => ReviewError::NotFound(format!("video {id}")),
        RepositoryError::Storage { operation, detail } => {
            warn!("storage failure during {operation}: {detail}");
            ReviewError::Conflict(format!("storage failure during {operation}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::repository::{InMemoryRepository, StoredVideo};
    use super::*;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::sync::Mutex;

    /// Notifier test double that records everything it is sent.
    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<StatusNotification>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, notification: StatusNotification) -> anyhow::Result<()> {
            self.sent.lock().unwrap().push(notification);
            Ok(())
        }
    }

    /// Repository wrapper that fails the first `update` with a stale
    /// version, simulating a concurrent reviewer winning the race.
    struct RacingRepository {
        inner: InMemoryRepository,
        raced: Mutex<bool>,
    }

    #[async_trait]
    impl VideoRepository for RacingRepository {
        async fn get(&self, id: VideoId) -> Result<Option<StoredVideo>, RepositoryError> {
            self.inner.get(id).await
        }

        async fn insert(&self, video: Video) -> Result<StoredVideo, RepositoryError> {
            self.inner.insert(video).await
        }

        async fn update(
            &self,
            id: VideoId,
            expected_version: u64,
            video: Video,
        ) -> Result<StoredVideo, RepositoryError> {
            {
                let mut raced = self.raced.lock().unwrap();
                if !*raced {
                    *raced = true;
                    return Err(RepositoryError::StaleVersion {
                        id,
                        expected: expected_version,
                        actual: expected_version + 1,
                    });
                }
            }
            self.inner.update(id, expected_version, video).await
        }

        async fn remove(&self, id: VideoId) -> Result<StoredVideo, RepositoryError> {
            self.inner.remove(id).await
        }

        async fn list(&self) -> Result<Vec<StoredVideo>, RepositoryError> {
            self.inner.list().await
        }

        async fn is_tombstoned(&self, id: VideoId) -> Result<bool, RepositoryError> {
            self.inner.is_tombstoned(id).await
        }
    }

    fn editor() -> Identity {
        Identity::new(1, "editor@demo.com", Role::Editor, "Editor User")
    }

    fn other_editor() -> Identity {
        Identity::new(3, "second.editor@demo.com", Role::Editor, "Second Editor")
    }

    fn client() -> Identity {
        Identity::new(2, "client@demo.com", Role::Client, "Client User")
    }

    fn draft(title: &str) -> VideoDraft {
        VideoDraft {
            title: title.to_string(),
            client_ref: "Acme Corp".to_string(),
            platform: reelcheck_core::Platform::Youtube,
            file_handle: Some("blob://demo/video.mp4".into()),
        }
    }

    fn store_with_notifier() -> (ReviewStore, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let store = ReviewStore::new(Arc::new(InMemoryRepository::new()), notifier.clone());
        (store, notifier)
    }

    fn store() -> ReviewStore {
        store_with_notifier().0
    }

    #[tokio::test]
    async fn test_upload_assigns_pending_and_uploader() {
        let store = store();

        let video = store.upload(&editor(), draft("Demo")).await.unwrap();

        assert_eq!(video.status, VideoStatus::Pending);
        assert_eq!(video.uploader_id, editor().id);
        assert_eq!(video.id, VideoId(1));
    }

    #[tokio::test]
    async fn test_upload_by_client_is_unauthorized_and_mutates_nothing() {
        let store = store();

        let result = store.upload(&client(), draft("Demo")).await;

        assert!(matches!(result, Err(ReviewError::Unauthorized(_))));
        assert!(store.list_videos(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_requires_title_and_file() {
        let store = store();

        let result = store.upload(&editor(), draft("   ")).await;
        assert!(matches!(result, Err(ReviewError::InvalidInput(_))));

        let mut no_file = draft("Demo");
        no_file.file_handle = None;
        let result = store.upload(&editor(), no_file).await;
        assert!(matches!(result, Err(ReviewError::InvalidInput(_))));

        assert!(store.list_videos(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_filterable() {
        let store = store();
        store.upload(&editor(), draft("First")).await.unwrap();
        store.upload(&editor(), draft("Second")).await.unwrap();
        let third = store.upload(&editor(), draft("Third")).await.unwrap();

        store.approve(&client(), third.id).await.unwrap();

        let all = store.list_videos(None).await.unwrap();
        let titles: Vec<&str> = all.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, vec!["Third", "Second", "First"]);

        let approved = store.list_videos(Some(VideoStatus::Approved)).await.unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].title, "Third");

        // An empty filter result is a valid, non-error outcome.
        let changes = store
            .list_videos(Some(VideoStatus::ChangesRequested))
            .await
            .unwrap();
        assert!(changes.is_empty());
    }

    #[tokio::test]
    async fn test_review_flow_example() {
        // Upload as E1, approve as C1, then send back with a rationale.
        let (store, notifier) = store_with_notifier();

        let video = store.upload(&editor(), draft("Demo")).await.unwrap();
        assert_eq!(video.status, VideoStatus::Pending);

        let video = store.approve(&client(), video.id).await.unwrap();
        assert_eq!(video.status, VideoStatus::Approved);

        let video = store
            .request_changes(&client(), video.id, "Fix intro")
            .await
            .unwrap();
        assert_eq!(video.status, VideoStatus::ChangesRequested);

        let comments = store.list_comments(video.id).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, "Fix intro");

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].new_status, VideoStatus::Approved);
        assert_eq!(sent[1].new_status, VideoStatus::ChangesRequested);
        assert!(sent.iter().all(|n| n.recipient_id == editor().id));
    }

    #[tokio::test]
    async fn test_approve_by_uploader_is_unauthorized() {
        let store = store();
        let video = store.upload(&editor(), draft("Demo")).await.unwrap();

        let result = store.approve(&editor(), video.id).await;

        assert!(matches!(result, Err(ReviewError::Unauthorized(_))));
        let listed = store.list_videos(None).await.unwrap();
        assert_eq!(listed[0].status, VideoStatus::Pending);
    }

    #[tokio::test]
    async fn test_approve_unknown_video() {
        let store = store();
        let result = store.approve(&client(), VideoId(41)).await;
        assert!(matches!(result, Err(ReviewError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_approve_twice_is_invalid_transition() {
        let store = store();
        let video = store.upload(&editor(), draft("Demo")).await.unwrap();
        store.approve(&client(), video.id).await.unwrap();

        let result = store.approve(&client(), video.id).await;

        assert!(matches!(result, Err(ReviewError::InvalidTransition(_))));
        let listed = store.list_videos(None).await.unwrap();
        assert_eq!(listed[0].status, VideoStatus::Approved);
    }

    #[tokio::test]
    async fn test_request_changes_requires_rationale() {
        let (store, notifier) = store_with_notifier();
        let video = store.upload(&editor(), draft("Demo")).await.unwrap();

        let result = store.request_changes(&client(), video.id, "  ").await;

        assert!(matches!(result, Err(ReviewError::InvalidInput(_))));
        let listed = store.list_videos(None).await.unwrap();
        assert_eq!(listed[0].status, VideoStatus::Pending);
        assert!(store.list_comments(video.id).await.unwrap().is_empty());
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_request_changes_by_editor_is_unauthorized() {
        let store = store();
        let video = store.upload(&editor(), draft("Demo")).await.unwrap();

        let result = store.request_changes(&editor(), video.id, "not yours").await;

        assert!(matches!(result, Err(ReviewError::Unauthorized(_))));
        assert!(store.list_comments(video.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_each_changes_request_adds_exactly_one_comment() {
        let store = store();
        let video = store.upload(&editor(), draft("Demo")).await.unwrap();

        store
            .request_changes(&client(), video.id, "Tighten the intro")
            .await
            .unwrap();
        store
            .request_changes(&client(), video.id, "Logo is still wrong")
            .await
            .unwrap();

        let comments = store.list_comments(video.id).await.unwrap();
        let texts: Vec<&str> = comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Logo is still wrong", "Tighten the intro"]);
    }

    #[tokio::test]
    async fn test_delete_hides_video_but_keeps_comments() {
        let store = store();
        let video = store.upload(&editor(), draft("Demo")).await.unwrap();
        store
            .add_comment(&client(), video.id, "looks promising")
            .await
            .unwrap();

        store.delete(&editor(), video.id).await.unwrap();

        assert!(store.list_videos(None).await.unwrap().is_empty());
        let comments = store.list_comments(video.id).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, "looks promising");
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let store = store();
        let video = store.upload(&editor(), draft("Demo")).await.unwrap();
        store.delete(&editor(), video.id).await.unwrap();

        let result = store.delete(&editor(), video.id).await;
        assert!(matches!(result, Err(ReviewError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_requires_the_uploading_editor() {
        let store = store();
        let video = store.upload(&editor(), draft("Demo")).await.unwrap();

        let by_client = store.delete(&client(), video.id).await;
        assert!(matches!(by_client, Err(ReviewError::Unauthorized(_))));

        let by_other_editor = store.delete(&other_editor(), video.id).await;
        assert!(matches!(by_other_editor, Err(ReviewError::Unauthorized(_))));

        assert_eq!(store.list_videos(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_deleted_ids_are_never_reused() {
        let store = store();
        let first = store.upload(&editor(), draft("First")).await.unwrap();
        store.delete(&editor(), first.id).await.unwrap();

        let second = store.upload(&editor(), draft("Second")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_add_comment_validation() {
        let store = store();
        let video = store.upload(&editor(), draft("Demo")).await.unwrap();

        let unknown = store.add_comment(&client(), VideoId(99), "hello").await;
        assert!(matches!(unknown, Err(ReviewError::NotFound(_))));

        let empty = store.add_comment(&client(), video.id, "   ").await;
        assert!(matches!(empty, Err(ReviewError::InvalidInput(_))));

        // Both roles may comment.
        store.add_comment(&client(), video.id, "from the client").await.unwrap();
        store.add_comment(&editor(), video.id, "from the editor").await.unwrap();
        assert_eq!(store.list_comments(video.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_comments_on_tombstoned_video_are_closed_for_writes() {
        let store = store();
        let video = store.upload(&editor(), draft("Demo")).await.unwrap();
        store.delete(&editor(), video.id).await.unwrap();

        let result = store.add_comment(&client(), video.id, "too late").await;
        assert!(matches!(result, Err(ReviewError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_comments_for_unknown_video_is_not_found() {
        let store = store();
        let result = store.list_comments(VideoId(12)).await;
        assert!(matches!(result, Err(ReviewError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_lost_update_surfaces_conflict() {
        let notifier = Arc::new(RecordingNotifier::default());
        let store = ReviewStore::new(
            Arc::new(RacingRepository {
                inner: InMemoryRepository::new(),
                raced: Mutex::new(false),
            }),
            notifier.clone(),
        );
        let video = store.upload(&editor(), draft("Demo")).await.unwrap();

        let result = store.request_changes(&client(), video.id, "Fix intro").await;

        assert!(matches!(result, Err(ReviewError::Conflict(_))));
        // The losing write leaves no rationale comment and no notification.
        assert!(store.list_comments(video.id).await.unwrap().is_empty());
        assert!(notifier.sent.lock().unwrap().is_empty());

        // Conflict is retryable: a re-issue with fresh state succeeds.
        let video = store
            .request_changes(&client(), video.id, "Fix intro")
            .await
            .unwrap();
        assert_eq!(video.status, VideoStatus::ChangesRequested);
    }

    proptest! {
        /// Property: video ids are unique and strictly increasing across
        /// any interleaving of uploads and deletions.
        #[test]
        fn upload_ids_are_unique_and_monotonic(delete_flags in proptest::collection::vec(any::<bool>(), 1..40)) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            rt.block_on(async {
                let store = store();
                let mut seen = Vec::new();

                for (i, delete_after) in delete_flags.iter().enumerate() {
                    let video = store
                        .upload(&editor(), draft(&format!("Video {i}")))
                        .await
                        .unwrap();
                    if let Some(last) = seen.last() {
                        assert!(video.id > *last, "ids must be strictly increasing");
                    }
                    seen.push(video.id);
                    if *delete_after {
                        store.delete(&editor(), video.id).await.unwrap();
                    }
                }
            });
        }
    }
}

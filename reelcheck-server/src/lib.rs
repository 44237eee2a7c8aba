pub mod auth;
pub mod comments;
pub mod config;
pub mod http;
pub mod notify;
pub mod status;
pub mod store;

use std::sync::Arc;

pub use auth::{CredentialStore, SessionKeys};
pub use comments::CommentLog;
pub use notify::{LogNotifier, Notifier, StatusNotification};
pub use store::ReviewStore;

pub fn get_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Shared application state handed to every HTTP handler.
pub struct AppState {
    pub credentials: CredentialStore,
    pub sessions: SessionKeys,
    pub store: Arc<ReviewStore>,
}

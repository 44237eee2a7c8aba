use anyhow::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};

use reelcheck_core::{Identity, Platform, Role, VideoDraft};
use reelcheck_server::config::Config;
use reelcheck_server::http::router;
use reelcheck_server::store::repository::InMemoryRepository;
use reelcheck_server::{AppState, CredentialStore, LogNotifier, ReviewStore, SessionKeys};

/// The two demo accounts. Always registered; a real deployment replaces the
/// credential store with an external collaborator.
fn demo_credentials() -> (CredentialStore, Identity, Identity) {
    let editor = Identity::new(1, "editor@demo.com", Role::Editor, "Editor User");
    let client = Identity::new(2, "client@demo.com", Role::Client, "Client User");

    let mut credentials = CredentialStore::new();
    credentials.register(editor.clone(), "password");
    credentials.register(client.clone(), "password");
    (credentials, editor, client)
}

/// Seed the demo dataset through the real operations, so seeded records
/// satisfy the same invariants as live ones (a seeded changes-requested
/// video carries its rationale comment).
async fn seed_demo_data(store: &ReviewStore, editor: &Identity, client: &Identity) -> Result<()> {
    let drafts = [
        ("Q4 Recap Video", "Acme Corp", Platform::Youtube),
        ("Holiday Special", "Creative Agency", Platform::Facebook),
        ("Behind the Scenes", "Brand Studio", Platform::Tiktok),
        ("Product Launch Teaser", "TechStart Inc", Platform::Instagram),
        ("Summer Campaign Video", "Acme Corp", Platform::Youtube),
    ];

    let mut uploaded = Vec::new();
    for (title, client_ref, platform) in drafts {
        let draft = VideoDraft {
            title: title.to_string(),
            client_ref: client_ref.to_string(),
            platform,
            file_handle: Some("blob://demo/sample.mp4".into()),
        };
        uploaded.push(store.upload(editor, draft).await?);
    }

    store.approve(client, uploaded[1].id).await?;
    store
        .request_changes(client, uploaded[2].id, "Please tighten the intro pacing")
        .await?;
    store.approve(client, uploaded[3].id).await?;

    info!("seeded {} demo videos", uploaded.len());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    info!("Starting reelcheck review service");

    let config =
        Config::from_env().expect("Failed to load configuration from environment variables");

    let (credentials, editor, client) = demo_credentials();
    let store = Arc::new(ReviewStore::new(
        Arc::new(InMemoryRepository::new()),
        Arc::new(LogNotifier),
    ));

    if config.seed_demo_data {
        seed_demo_data(&store, &editor, &client).await?;
    }

    let app_state = Arc::new(AppState {
        credentials,
        sessions: SessionKeys::new(&config.session_secret, config.session_ttl_secs),
        store,
    });

    let app = router(app_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}

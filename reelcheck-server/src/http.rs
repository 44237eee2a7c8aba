//! HTTP surface for the review service.
//!
//! Each store operation maps one-to-one onto an endpoint; errors come back
//! as structured `{error, message}` bodies with the matching status code.
//! Every endpoint except `/health` and `/login` requires a bearer session
//! token, from which the caller's identity is recovered and passed
//! explicitly into the store.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::auth::SessionKeys;
use crate::status::StatusData;
use crate::AppState;
use reelcheck_core::{FileHandle, Identity, Platform, ReviewError, VideoDraft, VideoId, VideoStatus};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/login", post(login))
        .route("/videos", get(list_videos).post(upload_video))
        .route("/videos/{id}", delete(delete_video))
        .route("/videos/{id}/approve", post(approve_video))
        .route("/videos/{id}/request-changes", post(request_changes))
        .route("/videos/{id}/comments", get(list_comments).post(add_comment))
        .route("/status", get(service_status))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "reelcheck"
    }))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Response {
    let identity = match state.credentials.authenticate(&req.email, &req.password) {
        Ok(identity) => identity,
        Err(e) => return error_response(e),
    };
    match state.sessions.issue(&identity) {
        Ok(token) => Json(json!({
            "token": token,
            "identity": identity,
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
struct ListVideosQuery {
    status: Option<String>,
}

async fn list_videos(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ListVideosQuery>,
) -> Response {
    if let Err(resp) = require_identity(&headers, &state.sessions) {
        return resp;
    }
    let filter = match query.status.as_deref() {
        None => None,
        Some(raw) => match VideoStatus::from_str(raw) {
            Ok(status) => Some(status),
            Err(e) => return error_response(ReviewError::InvalidInput(e)),
        },
    };
    match state.store.list_videos(filter).await {
        Ok(videos) => Json(json!({ "videos": videos })).into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
struct UploadRequest {
    title: String,
    client_ref: String,
    platform: Platform,
    file_handle: Option<String>,
}

async fn upload_video(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<UploadRequest>,
) -> Response {
    let caller = match require_identity(&headers, &state.sessions) {
        Ok(identity) => identity,
        Err(resp) => return resp,
    };
    let draft = VideoDraft {
        title: req.title,
        client_ref: req.client_ref,
        platform: req.platform,
        file_handle: req.file_handle.map(FileHandle::from),
    };
    match state.store.upload(&caller, draft).await {
        Ok(video) => (StatusCode::CREATED, Json(json!({ "video": video }))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn approve_video(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let caller = match require_identity(&headers, &state.sessions) {
        Ok(identity) => identity,
        Err(resp) => return resp,
    };
    match state.store.approve(&caller, VideoId(id)).await {
        Ok(video) => Json(json!({ "video": video })).into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
struct RequestChangesBody {
    rationale: String,
}

async fn request_changes(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<RequestChangesBody>,
) -> Response {
    let caller = match require_identity(&headers, &state.sessions) {
        Ok(identity) => identity,
        Err(resp) => return resp,
    };
    match state
        .store
        .request_changes(&caller, VideoId(id), &body.rationale)
        .await
    {
        Ok(video) => Json(json!({ "video": video })).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_video(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let caller = match require_identity(&headers, &state.sessions) {
        Ok(identity) => identity,
        Err(resp) => return resp,
    };
    match state.store.delete(&caller, VideoId(id)).await {
        Ok(()) => Json(json!({ "message": "video deleted" })).into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
struct CommentBody {
    text: String,
}

async fn add_comment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<CommentBody>,
) -> Response {
    let caller = match require_identity(&headers, &state.sessions) {
        Ok(identity) => identity,
        Err(resp) => return resp,
    };
    match state.store.add_comment(&caller, VideoId(id), &body.text).await {
        Ok(comment) => (StatusCode::CREATED, Json(json!({ "comment": comment }))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn list_comments(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    if let Err(resp) = require_identity(&headers, &state.sessions) {
        return resp;
    }
    match state.store.list_comments(VideoId(id)).await {
        Ok(comments) => Json(json!({ "comments": comments })).into_response(),
        Err(e) => error_response(e),
    }
}

async fn service_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = require_identity(&headers, &state.sessions) {
        return resp;
    }
    match state.store.list_videos(None).await {
        Ok(videos) => Json(StatusData::from_videos(&videos, crate::get_service_version()))
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// Recover the caller's identity from the Authorization header.
///
/// Returns a ready-made 401 response if the header is missing, malformed,
/// or carries a bad token.
#[allow(clippy::result_large_err)] // Response is large but this is idiomatic in Axum handlers
fn require_identity(headers: &HeaderMap, sessions: &SessionKeys) -> Result<Identity, Response> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        Some(value) if value.starts_with("Bearer ") => &value[7..],
        Some(_) => {
            return Err(unauthorized_response(
                "Invalid Authorization header format. Expected: Bearer <token>",
            ))
        }
        None => {
            return Err(unauthorized_response(
                "Missing Authorization header. Expected: Bearer <token>",
            ))
        }
    };

    sessions
        .verify(token)
        .map_err(|_| unauthorized_response("Invalid or expired session token"))
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "unauthorized", "message": message })),
    )
        .into_response()
}

fn error_response(err: ReviewError) -> Response {
    let status = match &err {
        ReviewError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        ReviewError::Unauthorized(_) => StatusCode::FORBIDDEN,
        ReviewError::NotFound(_) => StatusCode::NOT_FOUND,
        ReviewError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ReviewError::InvalidTransition(_) | ReviewError::Conflict(_) => StatusCode::CONFLICT,
    };
    (
        status,
        Json(json!({ "error": err.code(), "message": err.to_string() })),
    )
        .into_response()
}

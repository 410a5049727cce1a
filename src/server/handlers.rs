//! HTTP handlers for the page host.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::templates;
use super::ServerState;
use crate::error::AppError;
use crate::models::{Action, AppState};

/// Inner markup of `#root` at a given revision.
#[derive(Debug, Serialize, Deserialize)]
pub struct ViewResponse {
    pub revision: u64,
    pub html: String,
    /// Whether the request caused (or observed) a new render.
    pub rendered: bool,
}

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub since: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub pending_tasks: usize,
    pub state: AppState,
}

/// Page load: every visit starts a new session.
pub async fn index(State(state): State<ServerState>) -> Html<String> {
    let session = state.sessions.create().await;
    let snapshot = session.controller.snapshot().await;
    Html(templates::page(&session.id.to_string(), &snapshot))
}

pub async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], templates::CSS)
}

pub async fn dispatch_action(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(action): Json<Action>,
) -> Result<Json<ViewResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let outcome = session.controller.dispatch(action).await;
    let (revision, html) = session.controller.render_with_revision().await;

    Ok(Json(ViewResponse {
        revision,
        html,
        rendered: outcome.rendered(),
    }))
}

/// Long-poll for the next render after `since`.
pub async fn poll_view(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<ViewResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let waited = tokio::time::timeout(
        state.poll_timeout,
        session.controller.wait_for_revision(query.since),
    )
    .await;

    if waited.is_err() {
        debug!("Poll for session {} timed out at revision {}", id, query.since);
    }
    let (revision, html) = session.controller.render_with_revision().await;

    Ok(Json(ViewResponse {
        revision,
        html,
        rendered: revision > query.since,
    }))
}

pub async fn session_state(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionInfo>, AppError> {
    let session = state.sessions.get(id).await?;
    Ok(Json(SessionInfo {
        id: session.id,
        created_at: session.created_at,
        pending_tasks: session.controller.tasks().pending().len(),
        state: session.controller.snapshot().await,
    }))
}

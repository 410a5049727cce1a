//! Local page host for the learning platform.
//!
//! Serves the rendered page and routes the page's events into a per-load
//! view controller:
//! - `GET /` starts a new session and returns the full page
//! - `POST /api/sessions/{id}/actions` applies an action and returns the new markup
//! - `GET /api/sessions/{id}/view?since=N` long-polls for timer-driven renders
//!
//! Only file names ever reach the host. Nothing is persisted.

mod handlers;
mod routes;
pub mod sessions;
pub mod templates;

pub use handlers::{SessionInfo, ViewResponse};
pub use routes::create_router;
pub use sessions::{Session, SessionStore};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Settings;

/// Shared state for the web server.
#[derive(Clone)]
pub struct ServerState {
    pub sessions: Arc<SessionStore>,
    pub poll_timeout: Duration,
}

impl ServerState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            sessions: Arc::new(SessionStore::new(
                settings.controller_config(),
                settings.max_sessions,
            )),
            poll_timeout: settings.poll_timeout(),
        }
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let state = ServerState::new(settings);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

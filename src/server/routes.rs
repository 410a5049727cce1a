//! Route table for the page host.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::ServerState;

pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/static/style.css", get(handlers::stylesheet))
        .route("/api/sessions/:id/actions", post(handlers::dispatch_action))
        .route("/api/sessions/:id/view", get(handlers::poll_view))
        .route("/api/sessions/:id/state", get(handlers::session_state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

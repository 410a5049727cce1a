//! Error types for the page host surface.
//!
//! The view controller itself has no failure paths; these only arise when
//! parsing input from outside (CLI flags, HTTP requests).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("unknown tab: {0}")]
    UnknownTab(String),
    #[error("unknown processing status: {0}")]
    UnknownStatus(String),
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnknownTab(_) | AppError::UnknownStatus(_) => StatusCode::BAD_REQUEST,
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

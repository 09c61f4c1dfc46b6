//! Handler errors and how they render.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::error;

use crate::pages;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The newsroom failed. Shown to the user; the session stays usable.
    #[error("{0}")]
    Generation(#[from] journalist_rs::Error),

    /// The generation task panicked or was cancelled.
    #[error("article generation was interrupted: {0}")]
    Interrupted(#[from] tokio::task::JoinError),

    /// A second submit while the first is still running.
    #[error("An article is already being generated for this session.")]
    Busy,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Generation(_) => StatusCode::BAD_GATEWAY,
            AppError::Interrupted(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Busy => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {self}");
        }
        (status, Html(pages::error_page(&self.to_string()))).into_response()
    }
}

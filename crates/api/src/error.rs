//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fz152_domain::Fz152Error;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by the HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Detection, anonymization or configuration failure.
    #[error(transparent)]
    Pipeline(#[from] Fz152Error),

    /// The blocking task running the pipeline panicked or was cancelled.
    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Error body: `{"detail": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Client-facing message.
    pub detail: String,
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Pipeline(Fz152Error::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Self::Pipeline(_) | Self::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(ErrorBody { detail: self.to_string() })).into_response()
    }
}

/// Result type of the request handlers.
pub type ApiResult<T> = Result<T, ApiError>;

//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use timesync_domain::{SyncError, TimeSyncError};
use tracing::{error, warn};

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Stable error label for client handling.
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// Domain error carried out of a handler.
#[derive(Debug)]
pub struct ApiError(pub TimeSyncError);

/// Result type alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<TimeSyncError> for ApiError {
    fn from(value: TimeSyncError) -> Self {
        Self(value)
    }
}

impl From<SyncError> for ApiError {
    fn from(value: SyncError) -> Self {
        Self(TimeSyncError::Sync(value))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TimeSyncError::InvalidInput(_)
            | TimeSyncError::Sync(SyncError::InvalidArgument(_))
            | TimeSyncError::Sync(SyncError::UnsupportedProvider { .. }) => StatusCode::BAD_REQUEST,
            TimeSyncError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let label = self.0.label();
        if status.is_server_error() {
            error!(error = label, detail = %self.0, "Request failed");
        } else {
            warn!(error = label, detail = %self.0, "Request rejected");
        }

        let body = Json(ErrorResponse { error: label.to_string(), message: self.0.to_string() });
        (status, body).into_response()
    }
}

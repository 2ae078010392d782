//! # Error Handling Middleware
//!
//! Maps [`SyncError`] to HTTP status codes and a JSON `{ "error": ... }` body so
//! every route reports failures the same way.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    BoxError, Json,
};
use serde_json::json;
use teamsync_core::errors::SyncError;

/// Application error wrapper that provides HTTP status code mapping
///
/// Handlers return `Result<_, AppError>` and use `?` on engine results.
#[derive(Debug)]
pub struct AppError(pub SyncError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            SyncError::NotFound(_) | SyncError::UnknownEventId(_) | SyncError::ConfigNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            SyncError::Validation(_) | SyncError::InvalidTimezoneLabel(_) => StatusCode::BAD_REQUEST,
            SyncError::UnauthorizedActor(_) => StatusCode::FORBIDDEN,
            SyncError::SetupIncomplete(_) | SyncError::AlreadySetUp(_) => StatusCode::CONFLICT,
            SyncError::ChannelUnavailable(_) | SyncError::Delivery(_) => StatusCode::BAD_GATEWAY,
            SyncError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            SyncError::Persistence(_)
            | SyncError::PersistenceWriteFailure(_)
            | SyncError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        AppError(err)
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(SyncError::from(err))
    }
}

/// Maps a SyncError to an HTTP response
pub fn map_error(err: SyncError) -> Response {
    AppError(err).into_response()
}

/// Response for requests cut off by the timeout layer or failing inside it.
pub async fn handle_layer_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "Request timed out" })),
        )
            .into_response()
    } else {
        tracing::error!("Unhandled middleware error: {}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal server error" })),
        )
            .into_response()
    }
}

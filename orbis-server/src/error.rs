//! Mapping of `OrbisError` onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use orbis::OrbisError;

/// Handler error; wraps the library error with its HTTP status.
#[derive(Debug)]
pub struct ApiError(pub OrbisError);

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<OrbisError> for ApiError {
    fn from(e: OrbisError) -> Self {
        Self(e)
    }
}

impl ApiError {
    /// Create a bad request error.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(OrbisError::InvalidArg(msg.into()))
    }

    /// HTTP status for the wrapped error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            // 503 - an upstream could not be used; nothing was written
            OrbisError::DataSourceUnavailable { .. } | OrbisError::EmptyDataSource { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }

            // 404
            OrbisError::NotFound { .. }
            | OrbisError::StatusNotInitialized
            | OrbisError::PageOutOfRange { .. } => StatusCode::NOT_FOUND,

            // 409
            OrbisError::RefreshInProgress => StatusCode::CONFLICT,

            // 400
            OrbisError::InvalidArg(_) | OrbisError::RecordProcessing { .. } => {
                StatusCode::BAD_REQUEST
            }

            OrbisError::Persistence(_) | OrbisError::Render(_) | OrbisError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // Catch any new OrbisError variants as 500
            #[allow(unreachable_patterns)]
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Machine-readable error kind, e.g. `page_out_of_range`
    pub code: &'static str,
    /// Upstream source that failed, for fetch errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, code = self.0.kind(), "request failed");
        } else {
            tracing::debug!(error = %self.0, code = self.0.kind(), "request rejected");
        }
        let body = ErrorResponse {
            error: self.0.to_string(),
            code: self.0.kind(),
            data_source: self.0.data_source().map(str::to_string),
        };
        (status, Json(body)).into_response()
    }
}

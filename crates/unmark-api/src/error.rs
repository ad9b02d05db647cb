//! HTTP error mapping.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use unmark_core::Error;

/// Error returned by the HTTP handlers.
///
/// Every failure is reported as 500, including a missing image.
#[derive(Debug)]
pub enum ApiError {
    /// JSON API failure: `{"error": ..., "details": ...}`.
    Core(Error),
    /// Status page failure: plain text body.
    Page(Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Core(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Core(err) => {
                let body = Json(ErrorBody {
                    error: err.to_string(),
                    details: err.details(),
                });
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
            ApiError::Page(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                format!("Error: {}", err),
            )
                .into_response(),
        }
    }
}

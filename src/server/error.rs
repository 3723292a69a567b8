//! Bilingual error responses for the HTTP API

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

const GENERIC_ERROR: &str = "Something went wrong";
const GENERIC_ERROR_HI: &str = "कुछ गलत हो गया";

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    pub error_hi: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// An HTTP status paired with English and Hindi messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, error_hi: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.into(),
                error_hi: error_hi.into(),
                details: None,
            },
        }
    }

    pub fn bad_request(error: &str, error_hi: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error, error_hi)
    }

    pub fn not_found(error: impl Into<String>, error_hi: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, error, error_hi)
    }

    /// Malformed request body
    pub fn validation(details: impl Into<String>) -> Self {
        let mut error = Self::bad_request("Validation failed", "सत्यापन विफल");
        error.body.details = Some(details.into());
        error
    }

    /// Unexpected failure; the detail is hidden in production
    pub fn internal(detail: impl Into<String>, production: bool) -> Self {
        let error = if production {
            GENERIC_ERROR.to_string()
        } else {
            detail.into()
        };
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error, GENERIC_ERROR_HI)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

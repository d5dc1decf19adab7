//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type of the crate. Each variant maps to
//! a specific HTTP status code and structured JSON error response.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::headers;
use crate::domain::PollId;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "a new poll cannot already have an ID",
///     "details": "idexists"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Machine-readable error key, when the variant has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status               |
/// |-----------|------------|---------------------------|
/// | 1000–1999 | Validation | 400 Bad Request           |
/// | 2000–2999 | Not Found  | 404 Not Found             |
/// | 3000–3999 | Server     | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A create request carried an identifier.
    #[error("a new {entity} cannot already have an ID")]
    IdExists {
        /// Entity name used in the alert headers (e.g. `"poll"`).
        entity: &'static str,
    },

    /// Request parameters could not be interpreted.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Poll with the given ID was not found.
    #[error("poll not found: {0}")]
    PollNotFound(PollId),

    /// Storage layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::IdExists { .. } => 1001,
            Self::InvalidRequest(_) => 1002,
            Self::PollNotFound(_) => 2001,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::IdExists { .. } | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::PollNotFound(_) => StatusCode::NOT_FOUND,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable error key, if any.
    #[must_use]
    pub const fn error_key(&self) -> Option<&'static str> {
        match self {
            Self::IdExists { .. } => Some("idexists"),
            _ => None,
        }
    }

    fn alert_headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Self::IdExists { entity } = self {
            map.insert(
                headers::ERROR_HEADER,
                HeaderValue::from_static("error.idexists"),
            );
            map.insert(headers::PARAMS_HEADER, HeaderValue::from_static(*entity));
        }
        map
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        let alert = self.alert_headers();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: self.error_key().map(str::to_string),
            },
        };
        let mut response = (alert, axum::Json(body)).into_response();
        *response.status_mut() = status;
        response
    }
}

// Extractor rejections answer with the JSON error body instead of axum's
// plain-text default.

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<axum_extra::extract::QueryRejection> for ApiError {
    fn from(rejection: axum_extra::extract::QueryRejection) -> Self {
        Self::InvalidRequest(rejection.to_string())
    }
}

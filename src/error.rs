//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type of the service. Each variant maps
//! to a specific HTTP status code. A few variants keep the bodies clients
//! of the service already rely on:
//!
//! - validation failures are the bare field-error map,
//! - a body that is not JSON is `{"detail": "JSON parse error - ..."}`,
//! - an average over no students is `{"message": "No hay estudiantes registrados"}`.
//!
//! Every other error uses the structured envelope described on
//! [`ErrorResponse`].

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::FieldErrors;

/// Structured JSON error response body.
///
/// Not-found, media-type and server errors follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "student not found: 9999"
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
    /// Numeric error code (see [`ApiError`] for ranges).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status                    |
/// |-----------|------------|--------------------------------|
/// | 1000–1999 | Validation | 400 Bad Request / 415          |
/// | 2000–2999 | Not Found  | 404 Not Found                  |
/// | 3000–3999 | Server     | 500 Internal Server Error      |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// One or more fields failed validation.
    #[error("validation failed: {0}")]
    Validation(#[from] FieldErrors),

    /// Request body is not valid JSON.
    #[error("JSON parse error - {0}")]
    MalformedBody(String),

    /// Request body is not declared as JSON.
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// No student with the given id (kept as the raw path segment).
    #[error("student not found: {0}")]
    StudentNotFound(String),

    /// The aggregate was requested over an empty set of students.
    #[error("No hay estudiantes registrados")]
    NoStudents,

    /// Requested list page does not exist.
    #[error("invalid page: {0}")]
    InvalidPage(String),

    /// Store failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::MalformedBody(_) => 1002,
            Self::UnsupportedMediaType(_) => 1003,
            Self::StudentNotFound(_) => 2001,
            Self::NoStudents => 2002,
            Self::InvalidPage(_) => 2003,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::StudentNotFound(_) | Self::NoStudents | Self::InvalidPage(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` for the not-found family of errors.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status_code() == StatusCode::NOT_FOUND
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(r) => Self::UnsupportedMediaType(r.body_text()),
            other => Self::MalformedBody(other.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        match self {
            Self::Validation(errors) => (status, axum::Json(errors)).into_response(),
            Self::MalformedBody(_) => {
                (status, axum::Json(json!({ "detail": self.to_string() }))).into_response()
            }
            Self::NoStudents => {
                (status, axum::Json(json!({ "message": self.to_string() }))).into_response()
            }
            _ => {
                let body = ErrorResponse {
                    error: ErrorBody {
                        code: self.error_code(),
                        message: self.to_string(),
                    },
                };
                (status, axum::Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::error::Error as _;

    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn body_json(error: ApiError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let Ok(bytes) = to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body should be readable");
        };
        let Ok(json) = serde_json::from_slice(&bytes) else {
            panic!("body should be JSON");
        };
        (status, json)
    }

    #[test]
    fn not_found_variants_map_to_404() {
        for err in [
            ApiError::StudentNotFound("9999".to_string()),
            ApiError::NoStudents,
            ApiError::InvalidPage("7".to_string()),
        ] {
            assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
            assert!(err.is_not_found());
        }
    }

    #[test]
    fn validation_maps_to_400() {
        let err = ApiError::from(FieldErrors::non_field("nope"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 1001);
    }

    #[test]
    fn server_errors_map_to_500() {
        let err = ApiError::Persistence("connection refused".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.is_not_found());
    }

    #[test]
    fn response_carries_status() {
        let response = ApiError::NoStudents.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let mut errors = FieldErrors::new();
        errors.add("nombre", "This field is required.");
        let response = ApiError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_keeps_field_errors_as_source() {
        let err = ApiError::from(FieldErrors::non_field("nope"));
        let Some(source) = err.source() else {
            panic!("field errors should be the source");
        };
        assert_eq!(source.to_string(), "non_field_errors: nope");
    }

    #[tokio::test]
    async fn validation_body_is_the_field_map() {
        let mut errors = FieldErrors::new();
        errors.add("edad", "This field is required.");
        let (status, body) = body_json(ApiError::Validation(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"edad": ["This field is required."]}));
    }

    #[tokio::test]
    async fn malformed_body_uses_detail() {
        let err = ApiError::MalformedBody("expected value at line 1 column 2".to_string());
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"detail": "JSON parse error - expected value at line 1 column 2"})
        );
    }

    #[tokio::test]
    async fn empty_average_uses_bare_message() {
        let (status, body) = body_json(ApiError::NoStudents).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"message": "No hay estudiantes registrados"}));
    }

    #[tokio::test]
    async fn not_found_uses_envelope() {
        let (status, body) = body_json(ApiError::StudentNotFound("9999".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], 2001);
        assert_eq!(body["error"]["message"], "student not found: 9999");
    }
}

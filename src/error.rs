//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::EventId;
use crate::persistence::StoreError;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "event not found: ...",
///     "details": null
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
    /// Numeric error code (see code ranges on [`GatewayError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Request phase in which a deadline expired.
///
/// A persist timeout means the registration may or may not exist and the
/// caller can safely retry (inserts are idempotent); a read timeout is
/// likewise retryable. An announce timeout is never reported through
/// [`GatewayError`]: by then the registration is durable, so it
/// surfaces as a soft failure on the success path instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    /// The store read (list/get) step.
    Read,
    /// The registration persist step.
    Persist,
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Persist => write!(f, "persist"),
        }
    }
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                |
/// |-----------|-----------------|----------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request            |
/// | 2000–2999 | Not Found       | 404 Not Found              |
/// | 3000–3999 | Server          | 500 / 504                  |
/// | 4000–4999 | Domain          | 422 Unprocessable Entity   |
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Event with the given id was not found.
    #[error("event not found: {0}")]
    EventNotFound(EventId),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A registration referenced an event that does not exist.
    #[error("event does not exist: {0}")]
    UnknownEvent(EventId),

    /// The event store cannot be reached; safe to retry.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// The announcement bus cannot be reached.
    #[error("bus unavailable: {0}")]
    BusUnavailable(String),

    /// The per-call deadline expired during the given phase.
    #[error("deadline exceeded during {0}")]
    DeadlineExceeded(RequestPhase),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::EventNotFound(_) => 2001,
            Self::Internal(_) => 3000,
            Self::StoreUnavailable(_) => 3001,
            Self::BusUnavailable(_) => 3002,
            Self::DeadlineExceeded(_) => 3003,
            Self::UnknownEvent(_) => 4001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::EventNotFound(_) => StatusCode::NOT_FOUND,
            Self::UnknownEvent(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::StoreUnavailable(_) | Self::BusUnavailable(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl From<StoreError> for GatewayError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::EventNotFound(id),
            StoreError::UnknownEvent(id) => Self::UnknownEvent(id),
            StoreError::Unavailable(reason) => Self::StoreUnavailable(reason),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn some_id() -> EventId {
        EventId::from_uuid(uuid::Uuid::from_u128(1))
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = GatewayError::EventNotFound(some_id());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), 2001);
    }

    #[test]
    fn unavailable_maps_to_500() {
        let store = GatewayError::StoreUnavailable("down".to_string());
        let bus = GatewayError::BusUnavailable("down".to_string());
        assert_eq!(store.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(bus.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_ne!(store.error_code(), bus.error_code());
    }

    #[test]
    fn unknown_event_maps_to_422() {
        let err = GatewayError::UnknownEvent(some_id());
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_code(), 4001);
    }

    #[test]
    fn deadline_maps_to_504_and_names_phase() {
        let err = GatewayError::DeadlineExceeded(RequestPhase::Persist);
        assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert!(err.to_string().contains("persist"));

        let err = GatewayError::DeadlineExceeded(RequestPhase::Read);
        assert!(err.to_string().contains("read"));
    }

    #[test]
    fn store_error_conversion_preserves_taxonomy() {
        let id = some_id();
        assert!(matches!(
            GatewayError::from(StoreError::NotFound(id)),
            GatewayError::EventNotFound(_)
        ));
        assert!(matches!(
            GatewayError::from(StoreError::UnknownEvent(id)),
            GatewayError::UnknownEvent(_)
        ));
        assert!(matches!(
            GatewayError::from(StoreError::Unavailable("x".to_string())),
            GatewayError::StoreUnavailable(_)
        ));
    }

    #[test]
    fn response_body_shape() {
        let err = GatewayError::EventNotFound(some_id());
        let body = ErrorResponse {
            error: ErrorBody {
                code: err.error_code(),
                message: err.to_string(),
                details: None,
            },
        };
        let value = serde_json::to_value(&body);
        let Ok(value) = value else {
            panic!("serialization failed");
        };
        assert_eq!(value.pointer("/error/code"), Some(&serde_json::json!(2001)));
        assert!(value.pointer("/error/details").is_none());
    }
}

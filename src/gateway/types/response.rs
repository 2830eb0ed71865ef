//! API response envelope and error type
//!
//! - `ApiResponse<T>`: success wrapper, serialized as `{ "<key>": <data> }`
//! - `ApiError`: failure, serialized as `{ "error": { "message": "<text>" } }`

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use utoipa::ToSchema;

// ============================================================================
// Success Envelope
// ============================================================================

/// Success envelope: the payload is wrapped under a single named key.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub key: &'static str,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(key: &'static str, data: T) -> Self {
        Self { key, data }
    }
}

impl<T: Serialize> Serialize for ApiResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.key, &self.data)?;
        map.end()
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// `{ "error": false, "message": ... }` acknowledgement used by the auth flows
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageData {
    #[schema(example = false)]
    pub error: bool,
    #[schema(example = "Logout successful")]
    pub message: String,
}

impl MessageData {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            error: false,
            message: message.into(),
        }
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

/// Wrap `data` under `key` as a successful result
pub fn ok<T>(key: &'static str, data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(key, data))
}

// ============================================================================
// Failure Envelope
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorMessage<'a>,
}

#[derive(Serialize)]
struct ErrorMessage<'a> {
    message: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Failure without a more specific mapping (502)
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_IMPLEMENTED, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    /// Internal failure. The detail is logged, the client only sees a fixed message.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!("internal error: {}", detail);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorMessage {
                message: &self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

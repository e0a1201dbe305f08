//! Response envelope and status mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reddit_types::{ErrorKind, ToolCallResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of every `/api/{tool}` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Whether the call succeeded.
    pub success: bool,
    /// The tool payload, on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// The failure, otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// A failed call as reported over REST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Failure classification.
    pub kind: ErrorKind,
    /// Human-readable detail.
    pub message: String,
}

impl ApiResponse {
    pub(crate) fn bad_request(message: impl Into<String>) -> Response {
        let body = Self {
            success: false,
            data: None,
            error: Some(ApiError {
                kind: ErrorKind::TypeMismatch,
                message: message.into(),
            }),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

impl From<ToolCallResult> for ApiResponse {
    fn from(result: ToolCallResult) -> Self {
        match result {
            ToolCallResult::Success { payload } => Self {
                success: true,
                data: Some(payload),
                error: None,
            },
            ToolCallResult::Error { kind, message } => Self {
                success: false,
                data: None,
                error: Some(ApiError { kind, message }),
            },
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = self
            .error
            .as_ref()
            .map_or(StatusCode::OK, |err| status_for(err.kind));
        (status, Json(self)).into_response()
    }
}

/// HTTP status for a failed call of `kind`.
#[must_use]
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::UnknownTool | ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::MissingArgument | ErrorKind::TypeMismatch | ErrorKind::OutOfRange => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
        ErrorKind::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
        ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::TransportError => StatusCode::SERVICE_UNAVAILABLE,
    }
}

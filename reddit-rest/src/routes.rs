//! Route handlers.

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use reddit_types::ToolCallRequest;
use serde_json::{Map, Value, json};

use crate::AppState;
use crate::response::ApiResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/api/{tool}", post(call_tool))
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Reddit MCP REST server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health(State(state): State<AppState>) -> Response {
    match state.session.list_tools().await {
        Ok(tools) => Json(json!({ "status": "healthy", "tools": tools.len() })).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "error": err.to_string() })),
            )
                .into_response()
        }
    }
}

async fn call_tool(
    State(state): State<AppState>,
    Path(tool): Path<String>,
    body: Bytes,
) -> Response {
    let args = match parse_args(&body) {
        Ok(args) => args,
        Err(message) => return ApiResponse::bad_request(message),
    };
    tracing::debug!(tool = %tool, "REST tool call");
    let result = state.session.call(ToolCallRequest { tool, args }).await;
    ApiResponse::from(result).into_response()
}

/// An empty body is an empty argument object; anything else must be one.
fn parse_args(body: &[u8]) -> Result<Map<String, Value>, String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!("request body must be a JSON object, got {other}")),
        Err(err) => Err(format!("request body is not valid JSON: {err}")),
    }
}

//! Session-level errors and conversions from rmcp's error types.
//!
//! Per-call failures never use these; they travel as
//! [`ToolCallResult::Error`](reddit_types::ToolCallResult::Error).

use reddit_types::ToolError;

/// Errors setting up, running, or tearing down an MCP session.
#[derive(Debug, thiserror::Error)]
pub enum McpError {
    /// The transport could not be opened or closed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The MCP initialize handshake failed.
    #[error("initialization failed: {0}")]
    Initialization(String),

    /// A request failed at the protocol or transport level.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Convert an rmcp `ServiceError` into our `McpError`.
pub(crate) fn from_service_error(err: rmcp::ServiceError) -> McpError {
    McpError::Transport(err.to_string())
}

/// Classify a failed `tools/call` request.
///
/// Only a closed or broken transport ends the session. An error response
/// from the server or a protocol hiccup leaves it usable.
pub(crate) fn call_error(tool: &str, err: rmcp::ServiceError) -> ToolError {
    match err {
        rmcp::ServiceError::TransportClosed | rmcp::ServiceError::TransportSend(_) => {
            ToolError::transport(format!("{tool}: {err}"))
        }
        rmcp::ServiceError::McpError(data) => {
            ToolError::upstream_unavailable(format!("{tool}: server error: {}", data.message))
        }
        rmcp::ServiceError::Timeout { timeout } => {
            ToolError::timeout(format!("{tool} did not answer within {timeout:?}"))
        }
        rmcp::ServiceError::UnexpectedResponse => {
            ToolError::upstream_unavailable(format!("{tool}: {err}"))
        }
        other => ToolError::transport(format!("{tool}: {other}")),
    }
}

/// Convert an rmcp `ClientInitializeError` into our `McpError`.
pub(crate) fn from_client_init_error(err: rmcp::service::ClientInitializeError) -> McpError {
    McpError::Initialization(err.to_string())
}

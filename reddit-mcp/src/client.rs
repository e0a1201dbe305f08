//! Async MCP client for the Reddit tools.
//!
//! [`McpClient`] connects to a Reddit MCP server (a child process, an
//! in-process server, or any rmcp transport) and turns each tool call into
//! a [`ToolCallResult`]. Calls are bounded by a timeout and never retried.

use std::time::Duration;

use reddit_types::{
    CommentThread, CreatedComment, CreatedPost, ErrorKind, PostListing, SubredditInfo,
    ToolCallRequest, ToolCallResult, ToolError,
};
use rmcp::ServiceExt;
use rmcp::model::{CallToolRequestParams, CallToolResult, Content, RawContent, Tool as McpTool};
use rmcp::service::{RoleClient, RunningService};
use rmcp::transport::IntoTransport;
use rmcp::transport::child_process::TokioChildProcess;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::{McpError, call_error, from_client_init_error, from_service_error};
use crate::requests;
use crate::server::McpServer;

/// Default upper bound on one tool call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Buffer size of the in-process duplex pipe.
const DUPLEX_BUFFER: usize = 64 * 1024;

/// An MCP client session.
///
/// One session is safe to share between tasks. Tool calls on a session are
/// processed one at a time, in the order they acquire the session; a call
/// waits for the one ahead of it to answer.
pub struct McpClient {
    /// The running MCP service (client role).
    service: RunningService<RoleClient, ()>,
    /// Held for the duration of one tool call.
    in_flight: Mutex<()>,
    /// Upper bound on one tool call.
    call_timeout: Duration,
    /// The server half, for in-process sessions.
    server_task: Option<JoinHandle<()>>,
}

impl McpClient {
    /// Connect to an MCP server by spawning a child process.
    ///
    /// The command should be a `tokio::process::Command` configured to launch
    /// the MCP server executable.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Connection`] if the process cannot be spawned, or
    /// [`McpError::Initialization`] if the MCP handshake fails.
    pub async fn connect_stdio(command: tokio::process::Command) -> Result<Self, McpError> {
        let transport =
            TokioChildProcess::new(command).map_err(|e| McpError::Connection(e.to_string()))?;
        Self::connect(transport).await
    }

    /// Connect over an arbitrary rmcp transport.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Initialization`] if the MCP handshake fails.
    pub async fn connect<T, E, A>(transport: T) -> Result<Self, McpError>
    where
        T: IntoTransport<RoleClient, E, A>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let service = ().serve(transport).await.map_err(from_client_init_error)?;
        if let Some(info) = service.peer_info() {
            tracing::debug!(server = %info.server_info.name, "connected to MCP server");
        }
        Ok(Self {
            service,
            in_flight: Mutex::new(()),
            call_timeout: DEFAULT_CALL_TIMEOUT,
            server_task: None,
        })
    }

    /// Run `server` on this runtime and connect to it through an in-memory pipe.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Initialization`] if the MCP handshake fails.
    pub async fn connect_in_process(server: McpServer) -> Result<Self, McpError> {
        let (client_io, server_io) = tokio::io::duplex(DUPLEX_BUFFER);
        let server_task = tokio::spawn(async move {
            if let Err(err) = server.serve(server_io).await {
                tracing::warn!(error = %err, "in-process MCP server stopped");
            }
        });
        match Self::connect(client_io).await {
            Ok(mut client) => {
                client.server_task = Some(server_task);
                Ok(client)
            }
            Err(err) => {
                server_task.abort();
                Err(err)
            }
        }
    }

    /// Override the per-call timeout.
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// The per-call timeout.
    #[must_use]
    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Tools the server offers.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Transport`] if the listing request fails.
    pub async fn list_tools(&self) -> Result<Vec<McpTool>, McpError> {
        self.service
            .list_all_tools()
            .await
            .map_err(from_service_error)
    }

    /// Call a tool.
    ///
    /// The timeout covers waiting for earlier calls on this session as well
    /// as the call itself. A call that outlives it is `Timeout`; a closed or
    /// broken transport is `TransportError`. Neither is retried. A timed-out
    /// mutation may still complete on the server.
    pub async fn call(&self, request: ToolCallRequest) -> ToolCallResult {
        let tool = request.tool.clone();
        let params = CallToolRequestParams {
            meta: None,
            name: request.tool.into(),
            arguments: Some(request.args),
            task: None,
        };

        tracing::debug!(tool = %tool, timeout = ?self.call_timeout, "calling tool");
        let call = async {
            let _turn = self.in_flight.lock().await;
            self.service.call_tool(params).await
        };
        match tokio::time::timeout(self.call_timeout, call).await {
            Err(_) => ToolError::timeout(format!(
                "{tool} did not answer within {:?}",
                self.call_timeout
            ))
            .into(),
            Ok(Err(err)) => {
                tracing::warn!(tool = %tool, error = %err, "tool call failed");
                call_error(&tool, err).into()
            }
            Ok(Ok(result)) => from_call_tool_result(result),
        }
    }

    /// Call a tool by name with a JSON argument object.
    ///
    /// # Errors
    ///
    /// The [`ToolError`] of a failed call, or `TypeMismatch` when `args` is
    /// not an object.
    pub async fn call_tool(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let request = requests::from_value(name, args)?;
        self.call(request).await.into_result()
    }

    /// Hot posts of a subreddit.
    ///
    /// # Errors
    ///
    /// The [`ToolError`] of the call.
    pub async fn fetch_posts(
        &self,
        subreddit: &str,
        limit: Option<u32>,
    ) -> Result<PostListing, ToolError> {
        let request = requests::fetch_posts(subreddit, limit);
        requests::decode(self.call(request).await.into_result())
    }

    /// Search posts within a subreddit.
    ///
    /// # Errors
    ///
    /// The [`ToolError`] of the call.
    pub async fn search_posts(
        &self,
        subreddit: &str,
        query: &str,
        limit: Option<u32>,
    ) -> Result<PostListing, ToolError> {
        let request = requests::search_posts(subreddit, query, limit);
        requests::decode(self.call(request).await.into_result())
    }

    /// A post and its comment tree.
    ///
    /// # Errors
    ///
    /// The [`ToolError`] of the call.
    pub async fn get_comments(
        &self,
        post_id: &str,
        limit: Option<u32>,
    ) -> Result<CommentThread, ToolError> {
        let request = requests::get_comments(post_id, limit);
        requests::decode(self.call(request).await.into_result())
    }

    /// Subreddit metadata and rules.
    ///
    /// # Errors
    ///
    /// The [`ToolError`] of the call.
    pub async fn subreddit_info(&self, subreddit: &str) -> Result<SubredditInfo, ToolError> {
        let request = requests::subreddit_info(subreddit);
        requests::decode(self.call(request).await.into_result())
    }

    /// Reply to a post. Not idempotent.
    ///
    /// # Errors
    ///
    /// The [`ToolError`] of the call.
    pub async fn post_comment(
        &self,
        post_id: &str,
        text: &str,
    ) -> Result<CreatedComment, ToolError> {
        let request = requests::post_comment(post_id, text);
        requests::decode(self.call(request).await.into_result())
    }

    /// Create a text (`body`) or link (`url`) post. Not idempotent.
    ///
    /// # Errors
    ///
    /// The [`ToolError`] of the call.
    pub async fn create_post(
        &self,
        subreddit: &str,
        title: &str,
        body: Option<&str>,
        url: Option<&str>,
    ) -> Result<CreatedPost, ToolError> {
        let request = requests::create_post(subreddit, title, body, url);
        requests::decode(self.call(request).await.into_result())
    }

    /// Shut down the session.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Connection`] if the shutdown fails.
    pub async fn close(self) -> Result<(), McpError> {
        let result = self
            .service
            .cancel()
            .await
            .map_err(|e| McpError::Connection(e.to_string()));
        if let Some(task) = self.server_task {
            task.abort();
        }
        result.map(|_| ())
    }
}

impl std::fmt::Debug for McpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpClient")
            .field("call_timeout", &self.call_timeout)
            .field("in_process", &self.server_task.is_some())
            .finish_non_exhaustive()
    }
}

/// Recover a [`ToolCallResult`] from the wire.
///
/// Servers built on [`McpServer`] put the envelope in `structured_content`.
/// For other servers, structured or text content becomes the payload and
/// an error flag becomes an `UpstreamUnavailable` error.
pub(crate) fn from_call_tool_result(result: CallToolResult) -> ToolCallResult {
    let is_error = result.is_error == Some(true);

    if let Some(structured) = result.structured_content {
        return match serde_json::from_value::<ToolCallResult>(structured.clone()) {
            Ok(envelope) => envelope,
            Err(_) if is_error => {
                ToolError::new(ErrorKind::UpstreamUnavailable, structured.to_string()).into()
            }
            Err(_) => ToolCallResult::success(structured),
        };
    }

    let text = extract_text_from_content(&result.content);
    if let Ok(envelope) = serde_json::from_str::<ToolCallResult>(&text) {
        return envelope;
    }
    if is_error {
        ToolError::new(ErrorKind::UpstreamUnavailable, text).into()
    } else {
        ToolCallResult::success(Value::String(text))
    }
}

/// Extract text from MCP content blocks.
fn extract_text_from_content(content: &[Content]) -> String {
    content
        .iter()
        .filter_map(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

//! MCP server exposing the Reddit tools.
//!
//! [`McpServer`] wraps a [`Dispatcher`] and serves its registry over the
//! MCP protocol. Every `tools/call` answers with a [`ToolCallResult`]: the
//! JSON envelope goes in `structured_content`, a pretty-printed copy in the
//! text content, and `is_error` is set for error results. Per-call failures
//! never end the session.

use std::borrow::Cow;
use std::sync::Arc;

use reddit_adapter::RedditAdapter;
use reddit_tool::ToolRegistry;
use reddit_types::{ToolCallRequest, ToolCallResult};
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
    ProtocolVersion, ServerCapabilities, ServerInfo, Tool as McpTool,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::transport::IntoTransport;
use rmcp::transport::io::stdio;
use rmcp::{ErrorData, ServerHandler, ServiceExt};

use crate::dispatch::Dispatcher;
use crate::error::McpError;

/// Name the server reports in the MCP handshake.
pub const SERVER_NAME: &str = "reddit-mcp";

/// MCP server for the Reddit tools.
///
/// Call [`serve_stdio`](McpServer::serve_stdio) to serve over
/// stdin/stdout, or [`serve`](McpServer::serve) for any other transport.
#[derive(Debug, Clone)]
pub struct McpServer {
    /// Validates and executes calls.
    dispatcher: Dispatcher,
    /// Server name for MCP identification.
    name: String,
    /// Server version for MCP identification.
    version: String,
}

impl McpServer {
    /// Create a server around `dispatcher`.
    pub fn new(
        dispatcher: Dispatcher,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            dispatcher,
            name: name.into(),
            version: version.into(),
        }
    }

    /// The standard Reddit server over `adapter`.
    #[must_use]
    pub fn reddit(adapter: RedditAdapter) -> Self {
        Self::new(
            Dispatcher::reddit(adapter),
            SERVER_NAME,
            env!("CARGO_PKG_VERSION"),
        )
    }

    /// The dispatcher behind this server.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The tool list `tools/list` answers with.
    #[must_use]
    pub fn tools(&self) -> Vec<McpTool> {
        mcp_tools(self.dispatcher.registry())
    }

    /// Serve over stdio (stdin/stdout).
    ///
    /// Runs until the client disconnects or the transport fails.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Connection`] if the transport setup or serving fails.
    pub async fn serve_stdio(self) -> Result<(), McpError> {
        tracing::info!(
            name = %self.name,
            version = %self.version,
            tools = self.dispatcher.registry().len(),
            "serving MCP over stdio"
        );
        self.serve(stdio()).await
    }

    /// Serve over an arbitrary transport.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Connection`] if the handshake or serving fails.
    pub async fn serve<T, E, A>(self, transport: T) -> Result<(), McpError>
    where
        T: IntoTransport<RoleServer, E, A>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let handler = McpServerHandler {
            dispatcher: self.dispatcher,
            name: self.name,
            version: self.version,
        };
        let service = handler
            .serve(transport)
            .await
            .map_err(|e| McpError::Connection(e.to_string()))?;
        let reason = service
            .waiting()
            .await
            .map_err(|e| McpError::Connection(e.to_string()))?;
        tracing::debug!(?reason, "MCP session ended");
        Ok(())
    }
}

/// Render registry definitions as MCP tool descriptors.
pub(crate) fn mcp_tools(registry: &ToolRegistry) -> Vec<McpTool> {
    registry
        .iter()
        .map(|tool| {
            let schema = tool.input_schema();
            let schema_obj = schema.as_object().cloned().unwrap_or_default();

            McpTool {
                name: Cow::Owned(tool.name.clone()),
                title: None,
                description: Some(Cow::Owned(tool.description.clone())),
                input_schema: Arc::new(schema_obj),
                output_schema: None,
                annotations: None,
                execution: None,
                icons: None,
                meta: None,
            }
        })
        .collect()
}

/// Wrap a [`ToolCallResult`] for the wire.
pub(crate) fn to_call_tool_result(result: &ToolCallResult) -> CallToolResult {
    let structured = serde_json::to_value(result).unwrap_or_default();
    let text = serde_json::to_string_pretty(&structured).unwrap_or_else(|_| structured.to_string());

    let mut wire = if result.is_error() {
        CallToolResult::error(vec![Content::text(text)])
    } else {
        CallToolResult::success(vec![Content::text(text)])
    };
    wire.structured_content = Some(structured);
    wire
}

/// Internal handler implementing [`ServerHandler`] for the MCP protocol.
struct McpServerHandler {
    /// Validates and executes calls.
    dispatcher: Dispatcher,
    /// Server name.
    name: String,
    /// Server version.
    version: String,
}

impl ServerHandler for McpServerHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name.clone(),
                version: self.version.clone(),
                ..Default::default()
            },
            instructions: Some(
                "Reddit tools. post_comment and create_post need account credentials \
                 and are not idempotent."
                    .into(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(mcp_tools(
            self.dispatcher.registry(),
        )))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = ToolCallRequest {
            tool: request.name.into_owned(),
            args: request.arguments.unwrap_or_default(),
        };
        tracing::debug!(tool = %request.tool, "tools/call");
        let result = self.dispatcher.dispatch(request).await;
        Ok(to_call_tool_result(&result))
    }
}

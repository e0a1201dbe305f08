//! The MCP session behind the REST handlers, reopened after transport loss.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reddit_mcp::{McpClient, McpError, McpServer, McpTool};
use reddit_types::{ErrorKind, ToolCallRequest, ToolCallResult, ToolError};
use tokio::sync::Mutex;

type ConnectFuture = Pin<Box<dyn Future<Output = Result<McpClient, McpError>> + Send>>;
type Connector = Box<dyn Fn() -> ConnectFuture + Send + Sync>;

/// A lazily opened MCP session shared by all requests.
///
/// A call that ends in `TransportError` discards the session; the next
/// request opens a new one through the connector. Other errors keep it.
pub struct Session {
    connector: Connector,
    call_timeout: Option<Duration>,
    current: Mutex<Option<Arc<McpClient>>>,
}

impl Session {
    /// A session opened on demand by `connector`.
    pub fn new<F, Fut>(connector: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<McpClient, McpError>> + Send + 'static,
    {
        Self {
            connector: Box::new(move || Box::pin(connector())),
            call_timeout: None,
            current: Mutex::new(None),
        }
    }

    /// A session served by `server` in this process.
    #[must_use]
    pub fn in_process(server: McpServer) -> Self {
        Self::new(move || McpClient::connect_in_process(server.clone()))
    }

    /// Override the per-call timeout of new sessions.
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Whether a session is currently open.
    pub async fn is_connected(&self) -> bool {
        self.current.lock().await.is_some()
    }

    async fn client(&self) -> Result<Arc<McpClient>, McpError> {
        let mut current = self.current.lock().await;
        if let Some(client) = current.as_ref() {
            return Ok(client.clone());
        }
        tracing::debug!("opening MCP session");
        let client = (self.connector)().await?;
        let client = Arc::new(match self.call_timeout {
            Some(timeout) => client.with_call_timeout(timeout),
            None => client,
        });
        *current = Some(client.clone());
        Ok(client)
    }

    /// Drop `stale` if it is still the current session.
    async fn discard(&self, stale: &Arc<McpClient>) {
        let mut current = self.current.lock().await;
        if current.as_ref().is_some_and(|c| Arc::ptr_eq(c, stale)) {
            tracing::warn!("MCP session lost; the next request reconnects");
            *current = None;
        }
    }

    /// Call a tool on the current session, opening one if needed.
    pub async fn call(&self, request: ToolCallRequest) -> ToolCallResult {
        let client = match self.client().await {
            Ok(client) => client,
            Err(err) => return ToolError::transport(format!("could not connect: {err}")).into(),
        };
        let result = client.call(request).await;
        if matches!(
            result,
            ToolCallResult::Error {
                kind: ErrorKind::TransportError,
                ..
            }
        ) {
            self.discard(&client).await;
        }
        result
    }

    /// Tools the server offers.
    ///
    /// # Errors
    ///
    /// [`McpError`] if no session can be opened or the listing fails.
    pub async fn list_tools(&self) -> Result<Vec<McpTool>, McpError> {
        let client = self.client().await?;
        let tools = client.list_tools().await;
        if tools.is_err() {
            self.discard(&client).await;
        }
        tools
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("call_timeout", &self.call_timeout)
            .finish_non_exhaustive()
    }
}

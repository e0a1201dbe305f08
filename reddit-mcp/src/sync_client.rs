//! Blocking facade over [`McpClient`].

use std::ffi::OsString;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use reddit_types::{
    CommentThread, CreatedComment, CreatedPost, ErrorKind, PostListing, SubredditInfo,
    ToolCallRequest, ToolCallResult, ToolError,
};
use rmcp::model::Tool as McpTool;
use serde_json::Value;
use tokio::runtime::Runtime;

use crate::client::McpClient;
use crate::error::McpError;
use crate::requests;
use crate::server::McpServer;

type ConnectFuture = Pin<Box<dyn Future<Output = Result<McpClient, McpError>> + Send>>;
type Connector = Box<dyn Fn() -> ConnectFuture + Send + Sync>;

/// Blocking client for callers without an async runtime.
///
/// Owns a private tokio runtime and at most one MCP session. The session is
/// opened on the first call, reused afterwards, and dropped after a
/// `TransportError` so the next call reconnects. Calls from several threads
/// are serialised.
///
/// Must not be used from inside an async runtime: every method blocks the
/// calling thread.
pub struct SyncClient {
    runtime: Runtime,
    connector: Connector,
    call_timeout: Option<Duration>,
    session: Mutex<Option<McpClient>>,
}

impl SyncClient {
    /// Connect lazily by spawning `program args...` as a stdio MCP server.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Connection`] if the runtime cannot be created.
    pub fn stdio<I, S>(program: impl Into<OsString>, args: I) -> Result<Self, McpError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let program = program.into();
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        Self::with_connector(move || {
            let mut command = tokio::process::Command::new(&program);
            command.args(&args);
            McpClient::connect_stdio(command)
        })
    }

    /// Serve `server` on the facade's own runtime and connect in process.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Connection`] if the runtime cannot be created.
    pub fn in_process(server: McpServer) -> Result<Self, McpError> {
        Self::with_connector(move || McpClient::connect_in_process(server.clone()))
    }

    /// Connect lazily with a custom connector.
    ///
    /// The connector runs on the facade's runtime each time a session is
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Connection`] if the runtime cannot be created.
    pub fn with_connector<F, Fut>(connector: F) -> Result<Self, McpError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<McpClient, McpError>> + Send + 'static,
    {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("reddit-mcp-sync")
            .enable_all()
            .build()
            .map_err(|e| McpError::Connection(format!("could not start runtime: {e}")))?;
        Ok(Self {
            runtime,
            connector: Box::new(move || Box::pin(connector())),
            call_timeout: None,
            session: Mutex::new(None),
        })
    }

    /// Override the per-call timeout of new sessions.
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Whether a session is currently open.
    pub fn is_connected(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<McpClient>> {
        // A panic mid-call leaves at worst a stale session, which the next
        // transport failure discards.
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn connect(&self) -> Result<McpClient, McpError> {
        tracing::debug!("opening MCP session");
        let client = self.runtime.block_on((self.connector)())?;
        Ok(match self.call_timeout {
            Some(timeout) => client.with_call_timeout(timeout),
            None => client,
        })
    }

    /// Call a tool, blocking until it answers or times out.
    pub fn call(&self, request: ToolCallRequest) -> ToolCallResult {
        let mut session = self.lock();
        let client = match session.take() {
            Some(client) => client,
            None => match self.connect() {
                Ok(client) => client,
                Err(err) => {
                    return ToolError::transport(format!("could not connect: {err}")).into();
                }
            },
        };

        let result = self.runtime.block_on(client.call(request));

        if matches!(
            result,
            ToolCallResult::Error {
                kind: ErrorKind::TransportError,
                ..
            }
        ) {
            tracing::warn!("MCP session lost; the next call reconnects");
            drop(client);
        } else {
            *session = Some(client);
        }
        result
    }

    /// Call a tool by name with a JSON argument object.
    ///
    /// # Errors
    ///
    /// The [`ToolError`] of a failed call, or `TypeMismatch` when `args` is
    /// not an object.
    pub fn call_tool(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let request = requests::from_value(name, args)?;
        self.call(request).into_result()
    }

    /// Tools the server offers.
    ///
    /// # Errors
    ///
    /// [`McpError`] if no session can be opened or the listing fails.
    pub fn list_tools(&self) -> Result<Vec<McpTool>, McpError> {
        let mut session = self.lock();
        let client = match session.take() {
            Some(client) => client,
            None => self.connect()?,
        };
        let tools = self.runtime.block_on(client.list_tools());
        if tools.is_ok() {
            *session = Some(client);
        }
        tools
    }

    /// Hot posts of a subreddit.
    ///
    /// # Errors
    ///
    /// The [`ToolError`] of the call.
    pub fn fetch_posts(
        &self,
        subreddit: &str,
        limit: Option<u32>,
    ) -> Result<PostListing, ToolError> {
        requests::decode(self.call(requests::fetch_posts(subreddit, limit)).into_result())
    }

    /// Search posts within a subreddit.
    ///
    /// # Errors
    ///
    /// The [`ToolError`] of the call.
    pub fn search_posts(
        &self,
        subreddit: &str,
        query: &str,
        limit: Option<u32>,
    ) -> Result<PostListing, ToolError> {
        let request = requests::search_posts(subreddit, query, limit);
        requests::decode(self.call(request).into_result())
    }

    /// A post and its comment tree.
    ///
    /// # Errors
    ///
    /// The [`ToolError`] of the call.
    pub fn get_comments(
        &self,
        post_id: &str,
        limit: Option<u32>,
    ) -> Result<CommentThread, ToolError> {
        requests::decode(self.call(requests::get_comments(post_id, limit)).into_result())
    }

    /// Subreddit metadata and rules.
    ///
    /// # Errors
    ///
    /// The [`ToolError`] of the call.
    pub fn subreddit_info(&self, subreddit: &str) -> Result<SubredditInfo, ToolError> {
        requests::decode(self.call(requests::subreddit_info(subreddit)).into_result())
    }

    /// Reply to a post. Not idempotent.
    ///
    /// # Errors
    ///
    /// The [`ToolError`] of the call.
    pub fn post_comment(&self, post_id: &str, text: &str) -> Result<CreatedComment, ToolError> {
        requests::decode(self.call(requests::post_comment(post_id, text)).into_result())
    }

    /// Create a text (`body`) or link (`url`) post. Not idempotent.
    ///
    /// # Errors
    ///
    /// The [`ToolError`] of the call.
    pub fn create_post(
        &self,
        subreddit: &str,
        title: &str,
        body: Option<&str>,
        url: Option<&str>,
    ) -> Result<CreatedPost, ToolError> {
        let request = requests::create_post(subreddit, title, body, url);
        requests::decode(self.call(request).into_result())
    }

    /// Close the session, if one is open. The next call reconnects.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Connection`] if the shutdown fails.
    pub fn disconnect(&self) -> Result<(), McpError> {
        match self.lock().take() {
            Some(client) => self.runtime.block_on(client.close()),
            None => Ok(()),
        }
    }

    /// Close the session and stop the runtime.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Connection`] if the shutdown fails.
    pub fn shutdown(self) -> Result<(), McpError> {
        self.disconnect()
    }
}

impl Drop for SyncClient {
    fn drop(&mut self) {
        let session = self
            .session
            .get_mut()
            .map(Option::take)
            .unwrap_or_else(|poisoned| poisoned.into_inner().take());
        if let Some(client) = session {
            if tokio::runtime::Handle::try_current().is_ok() {
                // Blocking here would panic; dropping the session cancels it.
                drop(client);
            } else if let Err(err) = self.runtime.block_on(client.close()) {
                tracing::debug!(error = %err, "error closing MCP session");
            }
        }
    }
}

impl std::fmt::Debug for SyncClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncClient")
            .field("call_timeout", &self.call_timeout)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

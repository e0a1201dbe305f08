#![deny(missing_docs)]
//! MCP server and clients for the Reddit tools.
//!
//! - [`Dispatcher`] runs one tool call: registry lookup, argument
//!   validation, then the Reddit adapter. Every outcome is a
//!   [`ToolCallResult`](reddit_types::ToolCallResult).
//! - [`McpServer`] exposes a dispatcher over MCP (stdio or any rmcp
//!   transport).
//! - [`McpClient`] is the async client; [`SyncClient`] wraps it for
//!   callers without an async runtime.
//! - [`requests`] builds the call for each tool.

pub mod client;
pub mod dispatch;
pub mod error;
pub mod requests;
pub mod server;
pub mod sync_client;

pub use client::{DEFAULT_CALL_TIMEOUT, McpClient};
pub use dispatch::{Dispatcher, Phase};
pub use error::McpError;
pub use server::{McpServer, SERVER_NAME};
pub use sync_client::SyncClient;

/// MCP tool descriptor, as returned by `list_tools`.
pub use rmcp::model::Tool as McpTool;

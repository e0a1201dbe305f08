#![deny(missing_docs)]
//! Core types shared by every reddit-mcp crate.
//!
//! - [`error`]: the [`ErrorKind`] taxonomy and the [`ToolError`] every
//!   layer returns for a failed call.
//! - [`tool`]: tool schemas ([`ToolDefinition`], [`ArgSpec`]) and the
//!   request/result envelope ([`ToolCallRequest`], [`ToolCallResult`]).
//! - [`types`]: the Reddit records carried as call payloads.
//! - [`credentials`]: the immutable [`Credentials`] value loaded at startup.

pub mod credentials;
pub mod error;
pub mod tool;
pub mod types;

pub use credentials::*;
pub use error::*;
pub use tool::*;
pub use types::*;

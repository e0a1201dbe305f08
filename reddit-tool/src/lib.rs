#![deny(missing_docs)]
//! Tool registry for reddit-mcp.
//!
//! [`ToolRegistry`] is the single source of truth for which tools exist and
//! what their arguments look like. [`validate`] runs the schema-driven
//! argument check once per call, before anything reaches Reddit, and
//! [`ToolRegistry::reddit`] builds the fixed Reddit tool set.

pub mod builtin;
pub mod registry;
pub mod validate;

pub use builtin::*;
pub use registry::*;
pub use validate::*;

#![deny(missing_docs)]
//! Configuration for reddit-mcp.
//!
//! Settings are merged from, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. `reddit-mcp.toml` in the working directory, or an explicit path
//! 3. Environment variables (`REDDIT_*` and `REDDIT_MCP_*`)
//!
//! | Variable | Setting | Default |
//! |---|---|---|
//! | `REDDIT_CLIENT_ID` | `reddit.client_id` | required |
//! | `REDDIT_CLIENT_SECRET` | `reddit.client_secret` | required |
//! | `REDDIT_USER_AGENT` | `reddit.user_agent` | `mcp-reddit-agent/0.1` |
//! | `REDDIT_USERNAME` | `reddit.username` | none (read-only) |
//! | `REDDIT_PASSWORD` | `reddit.password` | none (read-only) |
//! | `REDDIT_MCP_CALL_TIMEOUT_SECS` | `runtime.call_timeout_secs` | `30` |
//! | `REDDIT_MCP_REST_BIND` | `runtime.rest_bind` | `0.0.0.0:8000` |

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::{CONFIG_FILE, RedditSettings, RuntimeSettings, Settings};

//! Command-line definitions.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};

/// Reddit tools over the Model Context Protocol.
#[derive(Parser, Debug)]
#[command(name = "reddit-mcp")]
#[command(author, version, about = "Reddit tools over the Model Context Protocol")]
#[command(long_about = r#"
Serves six Reddit tools (fetch_posts, search_posts, get_comments,
subreddit_info, post_comment, create_post) over MCP, or over a small
JSON REST API.

Credentials come from the environment (REDDIT_CLIENT_ID,
REDDIT_CLIENT_SECRET, and optionally REDDIT_USERNAME / REDDIT_PASSWORD
for posting) or from reddit-mcp.toml.

Example:
  reddit-mcp serve
  reddit-mcp rest --bind 127.0.0.1:8000
  reddit-mcp call fetch_posts -a subreddit=rust -a limit=5
"#)]
pub struct Cli {
    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve MCP over stdin/stdout
    Serve,

    /// Serve the REST API
    Rest {
        /// Listen address (overrides REDDIT_MCP_REST_BIND)
        #[arg(long, value_name = "ADDR")]
        bind: Option<SocketAddr>,

        #[command(flatten)]
        backend: Backend,
    },

    /// Call one tool and print the result as JSON
    Call {
        /// Tool name, e.g. fetch_posts
        tool: String,

        /// Argument as key=value; values that parse as JSON are sent as such
        #[arg(
            short = 'a',
            long = "arg",
            value_name = "KEY=VALUE",
            value_parser = parse_key_value
        )]
        args: Vec<(String, Value)>,

        /// Whole argument object as JSON (merged beneath --arg)
        #[arg(long, value_name = "JSON")]
        json: Option<String>,

        #[command(flatten)]
        backend: Backend,
    },

    /// List the available tools
    Tools {
        /// Print full definitions, including input schemas, as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Where the MCP server runs.
#[derive(Args, Debug, Clone, Copy)]
pub struct Backend {
    /// Run the MCP server in this process instead of a `serve` child
    #[arg(long)]
    pub in_process: bool,
}

/// Parse `key=value`. The value is JSON if it parses as JSON, else a string.
pub fn parse_key_value(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Build the argument object from `--json` and `--arg` flags.
pub fn build_args(
    json: Option<&str>,
    pairs: Vec<(String, Value)>,
) -> Result<Map<String, Value>, String> {
    let mut args = match json {
        None => Map::new(),
        Some(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(other) => return Err(format!("--json must be an object, got {other}")),
            Err(err) => return Err(format!("--json is not valid JSON: {err}")),
        },
    };
    args.extend(pairs);
    Ok(args)
}

//! `reddit-mcp` binary.

mod cli;

use std::ffi::OsString;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use reddit_adapter::{RedditAdapter, RedditHttp};
use reddit_config::Settings;
use reddit_mcp::{McpClient, McpServer, SyncClient};
use reddit_rest::Session;
use reddit_tool::ToolRegistry;
use reddit_types::ToolCallRequest;
use tracing_subscriber::EnvFilter;

use crate::cli::{Backend, Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v. Logs go to stderr: stdout carries the protocol.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    match cli.command {
        Command::Serve => serve(config),
        Command::Rest { bind, backend } => rest(config, bind, backend),
        Command::Call {
            tool,
            args,
            json,
            backend,
        } => call(config, tool, json.as_deref(), args, backend),
        Command::Tools { json } => tools(json),
    }
}

fn load_settings(config: Option<&Path>) -> Result<Settings> {
    Settings::load_from(config).context("failed to load configuration")
}

/// The MCP server for the configured Reddit account.
fn build_server(settings: &Settings) -> Result<McpServer> {
    let credentials = Arc::new(settings.credentials()?);
    let http = RedditHttp::new(credentials.clone());
    let adapter = RedditAdapter::new(Arc::new(http), credentials);
    Ok(McpServer::reddit(adapter))
}

/// `reddit-mcp serve [--config PATH]` as a child command.
fn serve_command(config: Option<&Path>) -> Result<(PathBuf, Vec<OsString>)> {
    let exe = std::env::current_exe().context("cannot locate the reddit-mcp executable")?;
    let mut args = vec!["serve".into()];
    if let Some(path) = config {
        args.push("--config".into());
        args.push(path.as_os_str().to_owned());
    }
    Ok((exe, args))
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")
}

fn serve(config: Option<&Path>) -> Result<()> {
    let settings = load_settings(config)?;
    let server = build_server(&settings)?;
    runtime()?.block_on(server.serve_stdio())?;
    Ok(())
}

fn rest(config: Option<&Path>, bind: Option<SocketAddr>, backend: Backend) -> Result<()> {
    let settings = load_settings(config)?;
    let addr = match bind {
        Some(addr) => addr,
        None => settings.rest_bind()?,
    };
    let timeout = settings.call_timeout()?;

    let session = if backend.in_process {
        Session::in_process(build_server(&settings)?)
    } else {
        let (exe, args) = serve_command(config)?;
        Session::new(move || {
            let mut command = tokio::process::Command::new(&exe);
            command.args(&args);
            McpClient::connect_stdio(command)
        })
    }
    .with_call_timeout(timeout);

    runtime()?.block_on(reddit_rest::serve(addr, Arc::new(session)))?;
    Ok(())
}

fn call(
    config: Option<&Path>,
    tool: String,
    json: Option<&str>,
    pairs: Vec<(String, serde_json::Value)>,
    backend: Backend,
) -> Result<()> {
    let args = cli::build_args(json, pairs).map_err(anyhow::Error::msg)?;
    let settings = load_settings(config)?;
    let timeout = settings.call_timeout()?;

    let client = if backend.in_process {
        SyncClient::in_process(build_server(&settings)?)?
    } else {
        let (exe, args) = serve_command(config)?;
        SyncClient::stdio(exe, args)?
    }
    .with_call_timeout(timeout);

    let result = client.call(ToolCallRequest { tool, args });
    println!("{}", serde_json::to_string_pretty(&result)?);
    client.shutdown()?;

    if result.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

fn tools(json: bool) -> Result<()> {
    let registry = ToolRegistry::reddit();
    if json {
        let definitions: Vec<_> = registry
            .iter()
            .map(|tool| {
                serde_json::json!({
                    "name": tool.name,
                    "description": tool.description,
                    "input_schema": tool.input_schema(),
                    "mutating": tool.mutating,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&definitions)?);
        return Ok(());
    }
    for tool in registry.iter() {
        println!("{:<16} {}", tool.name, tool.description);
    }
    Ok(())
}

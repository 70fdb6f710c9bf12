//! `kbh serve` command
//!
//! Starts the MCP server (stdio) or the JSON HTTP API.
//!
//! # Usage
//! ```bash
//! kbh serve                               # MCP over stdio
//! kbh serve --transport http --port 9090  # HTTP API
//! ```

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use crate::config::Config;
use crate::core::backend::LocalBackend;
use crate::server::{self, AppState};

/// Start a server over the local dataset
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Transport mode (stdio or http)
    #[arg(long, default_value = "stdio")]
    pub transport: String,

    /// HTTP port (default from config)
    #[arg(long)]
    pub port: Option<u16>,

    /// HTTP bind address (default from config)
    #[arg(long)]
    pub bind: Option<String>,
}

pub async fn run(args: ServeArgs, config: &Config) -> Result<()> {
    let backend = LocalBackend::from_config(config)?;

    match args.transport.as_str() {
        "stdio" => {
            info!(transport = "stdio", "starting MCP server");
            let store = Arc::clone(backend.store());
            let limits = config.query.clone();
            tokio::task::spawn_blocking(move || crate::mcp::run_mcp_server(store, limits))
                .await
                .context("MCP server task failed")?
        }
        "http" => {
            let addr = listen_addr(&args, config)?;
            server::serve(AppState::new(backend, config.query.clone()), addr).await
        }
        other => bail!("Unknown transport: {}. Use 'stdio' or 'http'.", other),
    }
}

fn listen_addr(args: &ServeArgs, config: &Config) -> Result<SocketAddr> {
    let bind = args.bind.as_deref().unwrap_or(&config.server.bind);
    let ip: IpAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address: {}", bind))?;
    Ok(SocketAddr::new(ip, args.port.unwrap_or(config.server.port)))
}

use std::io::{stdin, stdout};

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use chartsmith::mcp::server::McpServer;

fn main() -> Result<()> {
    // stdout carries the protocol; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut server = McpServer::new();
    server.run(stdin().lock(), stdout().lock())?;
    Ok(())
}

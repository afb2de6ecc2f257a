//! PatentSafe MCP Server
//!
//! Verifies the PatentSafe connection at startup, then serves MCP tools
//! over stdio.
//!
//! # Configuration
//! Base URL and token come from arguments or `PATENTSAFE_URL` /
//! `PATENTSAFE_TOKEN`; tuning lives in `~/.config/patentsafe-mcp.toml`.

use anyhow::Result;
use clap::Parser;
use rmcp::{transport::stdio, ServiceExt};

use patentsafe_mcp::client::PatentSafeClient;
use patentsafe_mcp::config::Config;
use patentsafe_mcp::logging;
use patentsafe_mcp::server::PatentSafeMcpServer;

#[derive(Parser)]
#[command(name = "patentsafe-mcp")]
#[command(about = "PatentSafe MCP server")]
struct Cli {
    /// PatentSafe base URL
    #[arg(env = "PATENTSAFE_URL")]
    base_url: String,

    /// Personal authentication token
    #[arg(env = "PATENTSAFE_TOKEN")]
    auth_token: String,

    /// Maximum number of characters to return for a single request
    #[arg(long)]
    max_chars: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing("patentsafe_mcp")?;

    let cli = Cli::parse();

    let mut config = Config::load(cli.base_url, cli.auth_token)?;
    if let Some(max_chars) = cli.max_chars {
        config.max_response_chars = max_chars;
    }

    tracing::info!("Starting PatentSafe MCP Server");

    let client = PatentSafeClient::new(&config)?;

    // Verify the connection and gather server metadata before serving;
    // a bad URL or token should fail the launch, not the first tool call.
    let connection = match client.connect().await {
        Ok(info) => info,
        Err(e) => {
            eprintln!("Error: failed to initialize PatentSafe connection: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!("Connected to PatentSafe at {}", config.base_url);
    let mut fields = connection.metadata_fields.clone();
    fields.sort();
    tracing::info!("Available metadata fields: {}", fields.join(", "));

    let server = PatentSafeMcpServer::new(config, client, connection);
    let service = server.serve(stdio()).await?;

    tracing::info!("Server running, waiting for requests...");
    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}

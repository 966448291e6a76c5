//! MCP server entrypoint (stdio transport).
//!
//! Launches an MCP server that exposes the document backend's upload, listing, and lookup
//! operations to agent hosts over stdio.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use docbridge::{
    config::Config, logging, mcp::DocBridgeMcpServer, processing::ProcessingService,
    remote::RemoteClient,
};
use rmcp::{service::ServiceExt, transport::stdio};

#[derive(Parser)]
#[command(
    name = "docbridge",
    version,
    about = "MCP server for uploading and inspecting documents in the processing backend"
)]
struct Cli {
    /// Load environment variables from this file instead of `./.env`.
    #[arg(long)]
    env_file: Option<PathBuf>,
    /// Override the backend base URL (`DOCBRIDGE_API_URL`).
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("failed to load env file {}", path.display()))?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    let mut config = Config::from_env().context("failed to load configuration")?;
    if let Some(api_url) = cli.api_url.as_deref() {
        config = config
            .with_api_url(api_url)
            .context("invalid --api-url value")?;
    }

    logging::init_tracing(config.log_file.as_deref());
    tracing::debug!(api_url = %config.api_url, "Loaded configuration");
    config.warn_if_unauthenticated();

    let client = RemoteClient::new(&config).context("failed to build backend client")?;
    let processing = Arc::new(ProcessingService::new(Arc::new(client)));
    let server = DocBridgeMcpServer::new(processing);

    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP server over stdio")?;

    service
        .waiting()
        .await
        .context("MCP server terminated unexpectedly")?;

    Ok(())
}

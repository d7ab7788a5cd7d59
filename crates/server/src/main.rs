//! folio-mcp server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use folio_client::{Credential, FetchConfig, HttpFetcher, Library, ResourceCache};
use folio_core::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;

    tracing::info!(book_url = ?config.book_url, "Starting folio-mcp server on stdio transport");

    let fetcher = HttpFetcher::new(FetchConfig::from_app_config(&config)?)?;
    let cache = ResourceCache::new(fetcher);
    cache.set_credential(Credential::from_config(&config));

    let handler = handler::FolioServer::new(Library::new(cache), config);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}

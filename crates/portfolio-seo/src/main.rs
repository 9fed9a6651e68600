mod artifacts;
mod config;
mod error;
mod loader;
mod model;
mod route;
mod schema;
mod server;
mod site;
mod sitemap;
mod validation;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

use artifacts::SiteArtifacts;
use config::Config;
use portfolio_common::http::{FetchClient, FetchClientConfig};
use server::PortfolioServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting portfolio-seo");

    let config = Config::from_env()?;
    info!(
        data_path = %config.data_path,
        base_url_override = config.base_url_override.is_some(),
        export = config.export_dir.is_some(),
        "configuration loaded"
    );

    let portfolio = loader::load_portfolio(&config)?;
    info!(
        base_url = %portfolio.base_url(),
        projects = portfolio.projects.len(),
        featured = loader::featured_projects(&portfolio.projects).len(),
        "portfolio loaded"
    );

    if let Some(dir) = &config.export_dir {
        let written = SiteArtifacts::build(&portfolio).write_to(dir)?;
        info!(dir = %dir.display(), files = written.len(), "artifacts exported");
        return Ok(());
    }

    let state = Arc::new(RwLock::new(portfolio));

    if let Some(addr) = &config.http_listen_addr {
        let listener = TcpListener::bind(addr).await?;
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = site::serve(listener, state).await {
                tracing::error!(error = %e, "artifact server stopped");
            }
        });
    }

    let fetch = FetchClient::new(FetchClientConfig::from_env())?;
    info!(
        timeout_secs = fetch.config().timeout.as_secs(),
        max_body_bytes = fetch.config().max_body_bytes,
        "fetch client ready"
    );
    let server = PortfolioServer::new(state, fetch, config.clone());

    if let Some(addr) = &config.mcp_tcp_listen_addr {
        let listener = TcpListener::bind(addr).await?;
        info!(listen_addr = %addr, "MCP server ready, serving on TCP");
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = server.clone();
            tokio::spawn(async move {
                tracing::info!(peer = %peer, "MCP client connected");
                let service = server.serve(stream).await.inspect_err(|e| {
                    tracing::error!(error = %e, "MCP server error");
                })?;
                service.waiting().await?;
                tracing::info!(peer = %peer, "MCP client disconnected");
                Ok::<(), anyhow::Error>(())
            });
        }
    } else {
        info!("MCP server ready, serving on stdio");
        let service = server.serve(stdio()).await.inspect_err(|e| {
            tracing::error!(error = %e, "MCP server error");
        })?;
        service.waiting().await?;
        info!("MCP server shut down");
    }
    Ok(())
}

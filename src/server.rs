//! HTTP server initialization and runtime setup.
//!
//! Builds the outbound fetcher, the strategy chain and the Axum server, and
//! ties in-flight resolutions to the shutdown signal.

use crate::application::services::ResolverService;
use crate::config::Config;
use crate::infrastructure::http::HttpFetcher;
use crate::infrastructure::strategies::build_strategies;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Builds the resolver engine described by `config`.
///
/// The fetcher is created once and shared by every strategy.
///
/// # Errors
///
/// Returns an error if the strategy order is invalid, the HTTP client
/// cannot be built, or the chain is rejected.
pub fn build_resolver(config: &Config) -> Result<ResolverService> {
    let order = config.strategy_kinds()?;
    let fetcher = HttpFetcher::new(&config.browser_identity())?;

    let strategies = build_strategies(&order, &config.upstream_settings(), &fetcher)
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to build strategy chain")?;

    let resolver = ResolverService::new(strategies, config.strategy_timeout())
        .context("Invalid strategy chain")?;

    Ok(resolver)
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Shared outbound HTTP client
/// - Strategy chain and resolver
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - The resolver cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let resolver = build_resolver(&config)?;
    tracing::info!(
        "Strategy chain ready: {}",
        resolver.strategy_names().join(" -> ")
    );

    let shutdown = CancellationToken::new();
    let state = AppState::new(
        Arc::new(resolver),
        config.accepted_hosts.clone(),
        shutdown.clone(),
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C and cancels every in-flight resolution.
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutdown signal received, cancelling in-flight resolutions");
    shutdown.cancel();
}

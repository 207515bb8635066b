//! Address check service: loads configuration, wires the Supabase store into the matcher, and serves HTTP.

use std::future::pending;
use std::sync::Arc;

use anyhow::Result;
use reqwest::Client;
use streetcheck_core::service::AddressMatcher;
use streetcheck_server::{AppState, config::ServerConfig};
use streetcheck_store_supabase::{SupabaseConfig, SupabaseStore};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_err| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let store_config = SupabaseConfig::from_env()?;
    info!(?store_config, policy = ?config.policy, "loaded configuration");

    // HTTP + store setup
    let client = Client::builder().user_agent("streetcheck/0.1").build()?;
    let store = Arc::new(SupabaseStore::new(client, store_config)?);
    let matcher =
        AddressMatcher::new(store, config.policy.clone()).with_lookup_timeout(config.lookup_timeout);

    let app = streetcheck_server::app(AppState::new(matcher));

    let listener = TcpListener::bind(config.bind).await?;
    info!("streetcheck listening on {}", config.bind);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        pending::<()>().await;
    }
    info!("shutting down");
}

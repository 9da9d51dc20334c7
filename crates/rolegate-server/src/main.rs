//! Rolegate demo server
//!
//! Serves the enrollment API behind role-based authorization.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rolegate_server::{Args, Settings, router, shutdown};
use rolegate_store::PostgresStore;
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref())?;

    let store = PostgresStore::connect(
        args.connect_options(),
        settings.authorization.store_config(),
    )
    .await
    .context("failed to connect to database")?;
    store.ping().await.context("failed to ping database")?;

    let app = router(Arc::new(store.clone()), &settings.authorization)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Listening on {addr}");

    let (draining_tx, draining_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown::signal().await;
            tracing::info!("Shutdown in progress...");
            let _ = draining_tx.send(());
        })
        .into_future();

    tokio::select! {
        result = server => result.context("server error")?,
        _ = async {
            if draining_rx.await.is_ok() {
                tokio::time::sleep(shutdown::DRAIN_TIMEOUT).await;
            } else {
                std::future::pending::<()>().await;
            }
        } => {
            tracing::warn!(
                "In-flight requests still running after {:?}; shutting down anyway",
                shutdown::DRAIN_TIMEOUT
            );
        }
    }

    store.close().await;
    Ok(())
}

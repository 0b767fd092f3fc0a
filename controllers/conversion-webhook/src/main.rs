//! Tenant Conversion Webhook
//!
//! Serves `ConversionReview` requests for the `capsule.clastix.io` Tenant CRD,
//! converting objects between the annotation-encoded `v1alpha1` schema and the
//! structured `v1beta1` storage schema.
//!
//! TLS is expected to be terminated in front of this process.

mod error;
mod metrics;
mod server;

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::error::WebhookError;
use crate::metrics::Metrics;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), WebhookError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Tenant Conversion Webhook");

    // Load configuration from environment variables
    let listen_addr = env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let addr: SocketAddr = listen_addr
        .parse()
        .map_err(|e| WebhookError::InvalidConfig(format!("LISTEN_ADDR {:?} is not a socket address: {}", listen_addr, e)))?;

    info!("Configuration:");
    info!("  Listen address: {}", addr);
    info!("  Conversion path: {}", crds::CONVERSION_PATH);
    info!("  Storage version: {}", crds::STORAGE_VERSION);

    let metrics = Arc::new(Metrics::new()?);
    let app = server::router(metrics);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Tenant Conversion Webhook stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

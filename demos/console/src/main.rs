//! Console bootstrap demo.
//!
//! Wires the process-wide facade the way an application entry point would:
//! initialize logging, build the configuration, construct the singleton with
//! an explicit notifier, and hand the instance to whatever needs it. No
//! prototype mutation, no hidden globals beyond the documented singleton.
//!
//! ## Usage
//!
//! ```bash
//! SUPERSEDE_BASE_URL=http://localhost:8080 cargo run -p supersede-demo
//! ```

use std::sync::Arc;

use anyhow::Result;
use supersede_client::{global, ClientConfig, RequestOptions, TracingNotifier};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let base_url = std::env::var("SUPERSEDE_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:8080".to_owned());
    info!(%base_url, "bootstrapping facade");

    let facade = global::instance(ClientConfig::new(base_url), Arc::new(TracingNotifier))?;

    match facade
        .get("/api/health", &[], RequestOptions::default())
        .await
    {
        Ok(response) => info!(code = ?response.code(), msg = ?response.msg(), "healthy"),
        Err(err) => info!(%err, "health check failed"),
    }

    facade.cancel_all();
    Ok(())
}

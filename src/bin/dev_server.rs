//! VibeMart development backend
//!
//! Run with: cargo run --bin vibemart-dev-server
//!
//! # Configuration
//!
//! Environment variables:
//! - `VIBEMART_DEV_HOST`: Host to bind to (default: 127.0.0.1)
//! - `VIBEMART_DEV_PORT`: Port to listen on (default: 8000)
//! - `VIBEMART_LOG_LEVEL` / `VIBEMART_LOG_FORMAT`: Logging (default: info, pretty)
//! - `RUST_LOG`: Overrides the log filter entirely

use std::sync::Arc;
use vibemart::config::Config;
use vibemart::devserver::{serve, Catalog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    config.logging.init();

    tracing::info!(
        "Starting VibeMart dev backend v{}",
        env!("CARGO_PKG_VERSION")
    );

    let catalog = Arc::new(Catalog::sample());
    serve(catalog, &config.dev_server).await?;

    Ok(())
}

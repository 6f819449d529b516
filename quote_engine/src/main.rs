//! Entry point for the Quote Engine binary.
//!
//! Running this binary starts an HTTP server exposing the pricing
//! calculators.  The directory holding the device price files is read
//! from `QUOTE_CATALOG_DIR` (default `catalog`) and the bind address
//! from `QUOTE_BIND_ADDR` (default `127.0.0.1:3000`).  Log verbosity
//! follows `RUST_LOG`.

use quote_engine::config::Settings;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quote_engine=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    quote_engine::api::serve(&settings).await
}

//! Entry point for the quote engine binary.
//!
//! Running this binary starts an HTTP server that exposes a minimal
//! API for pricing contractor quotes.  The directory containing
//! region preset JSON files may be specified via the
//! `QUOTE_REGION_DIR` environment variable; if unset the server looks
//! for a `regions` folder relative to the current working directory.
//! Log verbosity follows `RUST_LOG`, defaulting to `info`.

use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine where region preset files are located
    let region_dir = std::env::var("QUOTE_REGION_DIR").unwrap_or_else(|_| "regions".to_string());
    let region_dir_path = PathBuf::from(region_dir);
    // Determine bind address
    let addr = std::env::var("QUOTE_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    if let Err(err) = quote_engine::api::serve(&addr, region_dir_path).await {
        tracing::error!("error running server: {:#}", err);
    }
}

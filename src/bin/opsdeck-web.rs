//! Opsdeck Web Server Binary
//!
//! This binary starts the Opsdeck web server that provides a REST API and
//! per-device WebSocket command channels for a web-based frontend.
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings (port 3001, shared order store)
//! opsdeck-web
//!
//! # Specify port and an alternate order store
//! opsdeck-web --port 8080 --orders /srv/opsdeck/orders.json
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use opsdeck::config::Config;
use opsdeck::web;

/// Opsdeck Web Server - REST API for the operations dashboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3001")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Order store file. Defaults to the same file the TUI uses.
    #[arg(short, long)]
    orders: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load or create configuration
    let config = Config::load().unwrap_or_default();

    // Use --orders if provided, otherwise the shared store from config
    let orders_path = match args.orders {
        Some(path) => path,
        None => config.orders_file_path()?,
    };

    info!("Order store: {}", orders_path.display());

    // Build socket address
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;

    // Start the server
    web::run_server(config, orders_path, addr).await
}

//! Web server command (feature `web`).

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Args;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use crate::web;

/// Start the REST/WebSocket API server
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "3001")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Order store file (defaults to the shared store)
    #[arg(long)]
    pub orders: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command
    pub fn execute(&self) -> CliResult<()> {
        let filter = if self.verbose { "debug" } else { "info" };
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| filter.into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .init();

        let config = Config::load().unwrap_or_default();
        let orders_path = match &self.orders {
            Some(path) => path.clone(),
            None => config
                .orders_file_path()
                .map_err(|e| CliError::io(e.to_string()))?,
        };

        let addr: SocketAddr = format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| {
                CliError::validation(format!("Invalid bind address {}:{}", self.host, self.port))
            })?;

        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| CliError::io(format!("Failed to start async runtime: {e}")))?;
        runtime
            .block_on(web::run_server(config, orders_path, addr))
            .map_err(|e| CliError::io(e.to_string()))
    }
}

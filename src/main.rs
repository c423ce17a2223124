//! pathrouter (v1)
//!
//! A small JSON service built on Tokio and Axum with its own router.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌────────────────────────────────────────────────────┐
//!                      │                     pathrouter                     │
//!                      │                                                    │
//!   Client Request     │  ┌──────────┐   ┌──────────┐   ┌───────────────┐   │
//!   ───────────────────┼─▶│   net    │──▶│   http   │──▶│  middleware   │   │
//!                      │  │ listener │   │  server  │   │recovery→logs  │   │
//!                      │  └──────────┘   └──────────┘   └───────┬───────┘   │
//!                      │                                        ▼           │
//!                      │                                ┌───────────────┐   │
//!                      │                                │    routing    │   │
//!                      │                                │router→matcher │   │
//!                      │                                └───────┬───────┘   │
//!                      │                                        ▼           │
//!   Client Response    │                                ┌───────────────┐   │
//!   ◀──────────────────┼────────────────────────────────│  api handlers │   │
//!                      │                                └───────────────┘   │
//!                      │                                                    │
//!                      │  lifecycle: Idle → Listening → Draining → Stopped  │
//!                      └────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use pathrouter::api;
use pathrouter::config::{self, AppConfig, ConfigError};
use pathrouter::lifecycle::{signals, Server};
use pathrouter::observability::logging;

#[derive(Parser)]
#[command(name = "pathrouter")]
#[command(about = "Minimal HTTP router with graceful shutdown", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override server.bind_address (e.g. 127.0.0.1:8080).
    #[arg(short, long)]
    bind: Option<String>,

    /// Override server.shutdown_timeout_secs.
    #[arg(long)]
    shutdown_timeout: Option<u64>,
}

impl Cli {
    fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => config::load_config(path)?,
            None => AppConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }
        if let Some(secs) = self.shutdown_timeout {
            config.server.shutdown_timeout_secs = secs;
        }

        config::validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.load()?;

    logging::init(&config.observability);

    tracing::info!("pathrouter v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        shutdown_timeout_secs = config.server.shutdown_timeout_secs,
        max_body_bytes = config.server.max_body_bytes,
        "Configuration loaded"
    );

    // Routes are complete before the listener exists.
    let router = api::routes();
    tracing::info!(routes = router.len(), "Routes registered");

    let server = Server::new(config.server, api::pipeline(router));
    let running = server.start().await.inspect_err(|e| {
        tracing::error!(error = %e, "Server failed to start");
    })?;

    running.run_until(signals::termination_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

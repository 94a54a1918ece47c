//! # BPM Server
//!
//! Standalone HTTP server running the price-appeal status flow with the mock
//! submitter and echo poller.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use bpm_core::config::ConfigManager;
use bpm_core::logging::init_structured_logging;
use bpm_core::orchestration::BpmSystemHandle;

#[derive(Parser)]
#[command(name = "bpm-server")]
#[command(about = "Serve the job submission and status polling workflow over HTTP")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration directory containing bpm-config.yaml (default: config)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Environment section to apply (default: BPM_ENV, then APP_ENV, then development)
    #[arg(short, long)]
    environment: Option<String>,

    /// Override the configured bind address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let environment = cli
        .environment
        .unwrap_or_else(ConfigManager::detect_environment);
    let mut manager = ConfigManager::load_or_default(cli.config_dir, &environment)
        .context("Failed to load configuration")?;

    if let Some(bind) = cli.bind {
        let mut config = manager.config().clone();
        config.server.bind_address = bind;
        manager = ConfigManager::from_config(config, &environment)
            .context("Invalid bind address override")?;
    }

    init_structured_logging(&manager.config().telemetry);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %manager.environment(),
        "Starting bpm-server"
    );

    let system = BpmSystemHandle::bootstrap_demo(manager);
    let listener = system
        .bind()
        .await
        .context("Failed to bind HTTP listener")?;

    system
        .serve(listener, shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("bpm-server shut down");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for shutdown signal, serving until killed");
            std::future::pending::<()>().await;
        }
    }
}

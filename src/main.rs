//! Marketlens - real-time inference gateway
//!
//! Serves price predictions and chart signals to WebSocket clients. Metrics are pushed via
//! structured JSON logs to stdout.
//!
//! # Usage
//! ```sh
//! MARKET_DATA_MODE=alpaca MODEL_DIR=models cargo run -- --port 5000
//! ```
//!
//! # Environment Variables
//! - `GATEWAY_BIND_ADDRESS` / `GATEWAY_PORT` - Listen address (default: 127.0.0.1:5000)
//! - `MODEL_DIR` - Directory holding the scaler, price model and signal model
//! - `MARKET_DATA_MODE` - `mock`, `alpaca` or `csv` (default: mock)
//! - `OBSERVABILITY_ENABLED` - Enable metrics reporting (default: true)
//! - `OBSERVABILITY_INTERVAL` - Interval in seconds between metric outputs (default: 60)

use anyhow::Result;
use clap::Parser;
use marketlens::application::system::Application;
use marketlens::config::Config;
use marketlens::infrastructure::observability::MetricsReporter;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "Real-time price and chart-signal inference gateway")]
struct Args {
    /// Listen address, overrides GATEWAY_BIND_ADDRESS
    #[arg(long)]
    bind: Option<String>,

    /// Listen port, overrides GATEWAY_PORT
    #[arg(short, long)]
    port: Option<u16>,

    /// Model artifact directory, overrides MODEL_DIR
    #[arg(long)]
    model_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let args = Args::parse();
    info!("Marketlens {} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = Config::from_env()?;
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(model_dir) = args.model_dir {
        config.models.model_dir = model_dir;
    }
    info!(
        "Configuration loaded: listen={}, market data={:?}, lookback={}d",
        config.server.socket_address(),
        config.market_data.mode,
        config.market_data.lookback_days
    );

    let app = Application::build(config.clone()).await?;
    let handle = app.start().await?;

    if config.observability.enabled {
        let reporter =
            MetricsReporter::new(handle.metrics.clone(), config.observability.interval_seconds);
        tokio::spawn(reporter.run());
        info!(
            "Metrics reporter started (interval: {}s)",
            config.observability.interval_seconds
        );
    } else {
        info!("Metrics reporting disabled.");
    }

    info!("Gateway running. Press Ctrl+C to shutdown.");
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting...");

    handle.shutdown().await
}

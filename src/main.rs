//! Weather Gateway
//!
//! Serves `/api/health` and `/api/weather` until SIGINT/SIGTERM, then drains.

use std::path::PathBuf;

use clap::Parser;

use weather_gateway::config::load_config;
use weather_gateway::lifecycle;
use weather_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "weather-gateway")]
#[command(version, about = "Health check and weather proxy HTTP service", long_about = None)]
struct Cli {
    /// Optional TOML configuration file. `PORT` still overrides the port.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    logging::init(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address(),
        upstream = %config.upstream.base_url,
        rate_limit = config.rate_limit.max_requests,
        "Configuration loaded"
    );

    if let Err(e) = lifecycle::run(config).await {
        tracing::error!(error = %e, "Server terminated abnormally");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

//! Round-robin HTTP proxy.
//!
//! ```text
//!     Client ──▶ listener ──▶ Dispatcher ──▶ backend[cursor]
//!                                 │            cursor = (cursor + 1) % N
//!     Client ◀──────────────── response streamed back unmodified
//! ```
//!
//! The backend pool comes from `pool.hosts` in the TOML config, overridden by
//! the `LOAD_BALANCER_HOSTS` environment variable (name configurable).

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use round_robin_proxy::config::loader::{load_config, load_or_default};
use round_robin_proxy::lifecycle::{self, signals::shutdown_signal};
use round_robin_proxy::load_balancer::EnvOverride;
use round_robin_proxy::observability::{logging, metrics};

const DEFAULT_CONFIG_PATH: &str = "config/load_balancer.toml";

#[derive(Parser)]
#[command(name = "round-robin-proxy")]
#[command(about = "Forward each request to the next backend in rotation", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_or_default(DEFAULT_CONFIG_PATH.as_ref())?,
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind.to_string();
    }

    logging::init(&config.observability)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        "round-robin-proxy starting"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let source = EnvOverride::from_env(config.pool.env_key.clone(), config.pool.clone());
    let proxy = lifecycle::start(config, &source).await?;

    shutdown_signal().await;
    proxy.stop().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

//! wardend - game server supervisor
//!
//! Loads configuration, builds the Linux host adapter and runs the service
//! until SIGTERM, SIGINT or SIGHUP.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use warden_config::{load_config, Config};
use warden_host_linux::LinuxHost;
use warden_util::{default_config_path, split_address};
use wardend::Service;

/// wardend - status, start control and idle shutdown for a game server
#[derive(Parser, Debug)]
#[command(name = "wardend")]
#[command(about = "Status, start control and idle shutdown for a game server", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/warden/config.toml)
    #[arg(short, long, env = "WARDEN_CONFIG", default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Socket path override
    #[arg(short, long, env = "WARDEN_SOCKET")]
    socket: Option<PathBuf>,

    /// Directory holding the server directories and the alias
    #[arg(long, env = "WARDEN_SERVER_BASE")]
    server_base: Option<PathBuf>,

    /// Game server address, host[:port]
    #[arg(long, env = "WARDEN_SERVER_ADDRESS")]
    address: Option<String>,

    /// Idle or failed ticks before the server is stopped
    #[arg(long, env = "WARDEN_MAX_ATTEMPTS", value_parser = clap::value_parser!(u32).range(1..))]
    max_attempts: Option<u32>,

    /// Seconds between watch ticks
    #[arg(long, env = "WARDEN_WATCH_INTERVAL", value_parser = clap::value_parser!(u64).range(1..))]
    watch_interval: Option<u64>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(socket) = &self.socket {
            config.service.socket_path = socket.clone();
        }
        if let Some(base) = &self.server_base {
            config.server.base_dir = base.clone();
        }
        if let Some(address) = &self.address {
            if let Err(e) = split_address(address) {
                bail!("Invalid --address '{address}': {e}");
            }
            config.server.address = address.clone();
        }
        if let Some(max_attempts) = self.max_attempts {
            config.watch.max_attempts = max_attempts;
        }
        if let Some(secs) = self.watch_interval {
            config.watch.interval = Duration::from_secs(secs);
        }
        Ok(())
    }
}

/// Resolve when a termination signal arrives
async fn shutdown_signal() -> Result<()> {
    let mut sigterm = signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;
    let mut sighup = signal(SignalKind::hangup()).context("Failed to create SIGHUP handler")?;

    tokio::select! {
        _ = sigterm.recv() => info!("Received SIGTERM, shutting down gracefully"),
        _ = sigint.recv() => info!("Received SIGINT, shutting down gracefully"),
        _ = sighup.recv() => info!("Received SIGHUP, shutting down gracefully"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "wardend starting");

    let mut config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;
    args.apply(&mut config)?;

    info!(
        config_path = %args.config.display(),
        base_dir = %config.server.base_dir.display(),
        alias = %config.server.alias,
        address = %config.server.address,
        interval_secs = config.watch.interval.as_secs(),
        max_attempts = config.watch.max_attempts,
        "Configuration loaded"
    );

    let host = Arc::new(LinuxHost::new(
        config.control.session_manager.clone(),
        config.control.ping_timeout,
    ));

    let service = Service::new(config, host).await?;

    let signals = tokio::spawn(shutdown_signal());
    service
        .run(async move {
            match signals.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(error = %e, "Signal handling failed"),
                Err(e) => error!(error = %e, "Signal task failed"),
            }
        })
        .await
}

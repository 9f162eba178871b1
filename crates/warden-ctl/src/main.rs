//! warden-ctl - talk to wardend from the command line

mod render;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use warden_api::{Command, ResponsePayload};
use warden_ipc::IpcClient;
use warden_util::default_socket_path;

/// warden-ctl - query and control the supervised game server
#[derive(Parser, Debug)]
#[command(name = "warden-ctl")]
#[command(about = "Query and control the server supervised by wardend", long_about = None)]
struct Args {
    /// Socket path for wardend connection
    #[arg(short, long, env = "WARDEN_SOCKET")]
    socket: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Show address, status and players
    Status,
    /// Start the server if it is down
    Start,
    /// Stop the server now
    Stop,
    /// Follow service events until interrupted
    Events,
    /// Show service health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let socket_path = args.socket.unwrap_or_else(default_socket_path);
    tracing::debug!(path = %socket_path.display(), "Connecting to wardend");

    let mut client = IpcClient::connect(&socket_path)
        .await
        .with_context(|| format!("Failed to connect to wardend at {}", socket_path.display()))?;

    let command = match args.action {
        Action::Status => Command::GetStatus,
        Action::Start => Command::Start,
        Action::Stop => Command::Stop,
        Action::Health => Command::GetHealth,
        Action::Events => {
            let mut events = client.subscribe().await?;
            loop {
                let event = events.next().await?;
                println!("{}", render::event(&event));
            }
        }
    };

    match client.call(command).await? {
        ResponsePayload::Status(view) => print!("{}", render::status(&view)),
        ResponsePayload::StartResult(outcome) => println!("{}", render::start_outcome(&outcome)),
        ResponsePayload::Stopped { server } => println!("Stop issued for {server}"),
        ResponsePayload::Health(health) => println!(
            "live: {}, config loaded: {}, watcher running: {}",
            health.live, health.config_loaded, health.watcher_running
        ),
        other => bail!("Unexpected response: {other:?}"),
    }

    Ok(())
}

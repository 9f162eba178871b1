//! Host capability traits

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use warden_api::LivenessSnapshot;
use warden_util::SessionId;

/// File whose presence under a server directory bars new starts
pub const MAINTENANCE_MARKER: &str = "lock";

/// Errors from host adapter operations
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {}: {stderr}", describe_exit(.code))]
    NonZeroExit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Unexpected output: {0}")]
    Parse(String),

    #[error("Ping failed: {0}")]
    Ping(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type HostResult<T> = Result<T, HostError>;

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("code {c}"),
        None => "a signal".to_string(),
    }
}

/// Executes external programs
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a program and return its captured standard output
    async fn run_capture(&self, program: &str, args: &[String]) -> HostResult<String>;

    /// Run a control script with positional arguments, reporting success only
    async fn run_script(&self, script: &Path, args: &[String]) -> HostResult<()>;
}

/// Queries the process-supervision layer for tagged sessions
#[async_trait]
pub trait SessionLister: Send + Sync {
    /// All live sessions whose name contains `tag`
    async fn list_tagged_sessions(&self, tag: &str) -> HostResult<BTreeSet<SessionId>>;
}

/// Checks for the maintenance marker inside a server directory
#[async_trait]
pub trait MarkerProbe: Send + Sync {
    /// `Ok(false)` when the marker is absent; `Err` only when the check itself failed
    async fn marker_present(&self, server_dir: &Path) -> HostResult<bool>;
}

/// Network liveness probe against the game server
#[async_trait]
pub trait LivenessProbe: Send + Sync {
    async fn ping(&self, address: &str) -> HostResult<LivenessSnapshot>;
}

/// Everything the core needs from the host
pub trait HostAdapter: CommandRunner + SessionLister + MarkerProbe + LivenessProbe {
    /// Optional: check if the host adapter is healthy
    fn is_healthy(&self) -> bool {
        true
    }
}

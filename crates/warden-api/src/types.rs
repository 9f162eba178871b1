//! Shared types for the wardend API

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Discrete state of the managed server, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerState {
    /// A termination session is active
    Stopping,
    /// A launch session is active but the server does not answer pings yet
    Starting,
    /// A launch session is active and the server answers pings
    Up,
    /// No session is active and the maintenance marker is present
    Locked,
    /// No session is active and no marker is present
    Down,
    /// A probe itself failed
    Undefined,
}

impl ServerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerState::Stopping => "STOPPING",
            ServerState::Starting => "STARTING",
            ServerState::Up => "UP",
            ServerState::Locked => "LOCKED",
            ServerState::Down => "DOWN",
            ServerState::Undefined => "UNDEFINED",
        }
    }
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Player counts reported by a successful liveness ping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivenessSnapshot {
    /// Players currently online
    pub online: u32,
    /// Server capacity
    pub max: u32,
    /// Sample of online player names, in the order the server reported them
    #[serde(default)]
    pub sample: Vec<String>,
}

impl LivenessSnapshot {
    pub fn is_empty(&self) -> bool {
        self.online == 0
    }
}

/// Serializable view of one status observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusView {
    /// Concrete server name behind the alias
    pub server: String,
    /// Base directory the server lives in
    pub base: PathBuf,
    /// Network address used for liveness pings
    pub address: String,
    pub state: ServerState,
    /// Present only when `state` is `Up`
    pub liveness: Option<LivenessSnapshot>,
    /// Present only when `state` is `Undefined`
    pub error: Option<String>,
}

/// Outcome of a start request, as seen by a front end
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StartOutcome {
    /// The server was down and the start command succeeded
    Started { server: String, address: String },
    /// Already up; nothing to do
    AlreadyUp {
        server: String,
        address: String,
        liveness: LivenessSnapshot,
    },
    /// Launched earlier but not yet accepting connections
    AlreadyStarting { server: String, address: String },
    /// Currently shutting down; retry later
    Busy { server: String },
    /// Barred from starting by the maintenance marker
    Locked { server: String },
    /// Status could not be determined; nothing was started
    Unknown { server: String, error: String },
}

/// Health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub live: bool,
    pub config_loaded: bool,
    pub watcher_running: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_display_matches_wire_labels() {
        assert_eq!(ServerState::Up.to_string(), "UP");
        assert_eq!(ServerState::Undefined.to_string(), "UNDEFINED");
    }

    #[test]
    fn start_outcome_is_tagged() {
        let outcome = StartOutcome::Locked {
            server: "survival".into(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "locked");
        assert_eq!(json["server"], "survival");
    }

    #[test]
    fn snapshot_sample_defaults_to_empty() {
        let snap: LivenessSnapshot = serde_json::from_str(r#"{"online":0,"max":20}"#).unwrap();
        assert!(snap.is_empty());
        assert!(snap.sample.is_empty());
    }
}

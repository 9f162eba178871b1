//! Status inference

use std::sync::Arc;
use tracing::debug;
use warden_api::{LivenessSnapshot, ServerState, StatusView};
use warden_host_api::HostAdapter;

use crate::{Probe, ProbeFailed, ServerHandle};

/// Inferred state of a server at one point in time
///
/// Only `Up` carries a liveness snapshot and only `Undefined` carries an
/// error, so the payload rules hold by construction.
#[derive(Debug)]
pub enum ServerStatus {
    Stopping,
    Starting,
    Up(LivenessSnapshot),
    Locked,
    Down,
    Undefined(ProbeFailed),
}

impl ServerStatus {
    pub fn state(&self) -> ServerState {
        match self {
            ServerStatus::Stopping => ServerState::Stopping,
            ServerStatus::Starting => ServerState::Starting,
            ServerStatus::Up(_) => ServerState::Up,
            ServerStatus::Locked => ServerState::Locked,
            ServerStatus::Down => ServerState::Down,
            ServerStatus::Undefined(_) => ServerState::Undefined,
        }
    }

    pub fn liveness(&self) -> Option<&LivenessSnapshot> {
        match self {
            ServerStatus::Up(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ProbeFailed> {
        match self {
            ServerStatus::Undefined(err) => Some(err),
            _ => None,
        }
    }

    /// Whether the server process exists and should be advertised
    pub fn is_present(&self) -> bool {
        matches!(self, ServerStatus::Up(_) | ServerStatus::Starting)
    }

    pub fn view(&self, handle: &ServerHandle) -> StatusView {
        StatusView {
            server: handle.name.clone(),
            base: handle.base.clone(),
            address: handle.address.clone(),
            state: self.state(),
            liveness: self.liveness().cloned(),
            error: self.error().map(|e| e.to_string()),
        }
    }
}

/// Infers server status from sessions, the marker file and a network ping
pub struct StatusEngine {
    host: Arc<dyn HostAdapter>,
}

impl StatusEngine {
    pub fn new(host: Arc<dyn HostAdapter>) -> Self {
        Self { host }
    }

    /// Run the probes in precedence order, stopping at the first decisive one
    ///
    /// Never fails: probe errors become `Undefined`. A failed ping on a
    /// running session is not an error, the server is still starting.
    pub async fn status(&self, handle: &ServerHandle) -> ServerStatus {
        let stopping = match self.host.list_tagged_sessions(&handle.stop_tag()).await {
            Ok(sessions) => sessions,
            Err(source) => {
                return ServerStatus::Undefined(ProbeFailed {
                    probe: Probe::StoppingSessions,
                    source,
                });
            }
        };
        if !stopping.is_empty() {
            return ServerStatus::Stopping;
        }

        let running = match self.host.list_tagged_sessions(&handle.run_tag()).await {
            Ok(sessions) => sessions,
            Err(source) => {
                return ServerStatus::Undefined(ProbeFailed {
                    probe: Probe::RunningSessions,
                    source,
                });
            }
        };
        if !running.is_empty() {
            return match self.host.ping(&handle.address).await {
                Ok(snapshot) => ServerStatus::Up(snapshot),
                Err(e) => {
                    debug!(server = %handle, error = %e, "Ping failed, server still starting");
                    ServerStatus::Starting
                }
            };
        }

        match self.host.marker_present(&handle.dir()).await {
            Ok(true) => ServerStatus::Locked,
            Ok(false) => ServerStatus::Down,
            Err(source) => ServerStatus::Undefined(ProbeFailed {
                probe: Probe::Marker,
                source,
            }),
        }
    }
}

//! Start/stop through the external control script

use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use warden_api::{LivenessSnapshot, StartOutcome};
use warden_host_api::HostAdapter;

use crate::{ControlAction, ControlFailed, ProbeFailed, ServerHandle, ServerStatus, StatusEngine};

/// Outcome of a start request, decided from the inferred status
#[derive(Debug)]
pub enum StartDecision {
    Started,
    AlreadyUp(LivenessSnapshot),
    AlreadyStarting,
    /// A stop is in progress; try again later
    Busy,
    /// Maintenance marker present
    Locked,
    Unknown(ProbeFailed),
}

impl StartDecision {
    pub fn into_outcome(self, handle: &ServerHandle) -> StartOutcome {
        let server = handle.name.clone();
        let address = handle.address.clone();
        match self {
            StartDecision::Started => StartOutcome::Started { server, address },
            StartDecision::AlreadyUp(liveness) => StartOutcome::AlreadyUp {
                server,
                address,
                liveness,
            },
            StartDecision::AlreadyStarting => StartOutcome::AlreadyStarting { server, address },
            StartDecision::Busy => StartOutcome::Busy { server },
            StartDecision::Locked => StartOutcome::Locked { server },
            StartDecision::Unknown(err) => StartOutcome::Unknown {
                server,
                error: err.to_string(),
            },
        }
    }
}

/// Issues control-script invocations for a server
///
/// Success only means the script exited zero; whether the server actually
/// changes state is observed later through status inference.
pub struct Lifecycle {
    host: Arc<dyn HostAdapter>,
    script: PathBuf,
}

impl Lifecycle {
    pub fn new(host: Arc<dyn HostAdapter>, script: impl Into<PathBuf>) -> Self {
        Self {
            host,
            script: script.into(),
        }
    }

    /// `<script> run <name>`
    pub async fn start(&self, handle: &ServerHandle) -> Result<(), ControlFailed> {
        info!(server = %handle, "Starting server");
        self.invoke(ControlAction::Start, handle, vec!["run".into(), handle.name.clone()])
            .await
    }

    /// `<script> stop <name> now`; harmless when the server is already down
    pub async fn stop(&self, handle: &ServerHandle) -> Result<(), ControlFailed> {
        info!(server = %handle, "Stopping server");
        self.invoke(
            ControlAction::Stop,
            handle,
            vec!["stop".into(), handle.name.clone(), "now".into()],
        )
        .await
    }

    /// Start only when the server is down
    pub async fn request_start(
        &self,
        engine: &StatusEngine,
        handle: &ServerHandle,
    ) -> Result<StartDecision, ControlFailed> {
        let decision = match engine.status(handle).await {
            ServerStatus::Down => {
                self.start(handle).await?;
                StartDecision::Started
            }
            ServerStatus::Up(snapshot) => StartDecision::AlreadyUp(snapshot),
            ServerStatus::Starting => StartDecision::AlreadyStarting,
            ServerStatus::Stopping => StartDecision::Busy,
            ServerStatus::Locked => StartDecision::Locked,
            ServerStatus::Undefined(err) => StartDecision::Unknown(err),
        };
        Ok(decision)
    }

    async fn invoke(
        &self,
        action: ControlAction,
        handle: &ServerHandle,
        args: Vec<String>,
    ) -> Result<(), ControlFailed> {
        self.host
            .run_script(&self.script, &args)
            .await
            .map_err(|source| ControlFailed {
                action,
                server: handle.name.clone(),
                source,
            })
    }
}

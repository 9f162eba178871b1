//! Linux host adapter

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;
use warden_api::LivenessSnapshot;
use warden_host_api::{
    CommandRunner, HostAdapter, HostResult, LivenessProbe, MarkerProbe, SessionLister,
};
use warden_util::SessionId;

use crate::{FsMarker, ScreenSessions, ShellRunner, StatusPing};

/// Linux host adapter backed by child processes, screen, the filesystem and TCP
pub struct LinuxHost {
    runner: ShellRunner,
    sessions: ScreenSessions,
    marker: FsMarker,
    ping: StatusPing,
}

impl LinuxHost {
    pub fn new(session_manager: impl Into<String>, ping_timeout: Duration) -> Self {
        Self {
            runner: ShellRunner::new(),
            sessions: ScreenSessions::new(session_manager),
            marker: FsMarker,
            ping: StatusPing::new(ping_timeout),
        }
    }
}

#[async_trait]
impl CommandRunner for LinuxHost {
    async fn run_capture(&self, program: &str, args: &[String]) -> HostResult<String> {
        self.runner.capture(program, args).await
    }

    async fn run_script(&self, script: &Path, args: &[String]) -> HostResult<()> {
        self.runner.script(script, args).await
    }
}

#[async_trait]
impl SessionLister for LinuxHost {
    async fn list_tagged_sessions(&self, tag: &str) -> HostResult<BTreeSet<SessionId>> {
        self.sessions.tagged(tag).await
    }
}

#[async_trait]
impl MarkerProbe for LinuxHost {
    async fn marker_present(&self, server_dir: &Path) -> HostResult<bool> {
        self.marker.present(server_dir).await
    }
}

#[async_trait]
impl LivenessProbe for LinuxHost {
    async fn ping(&self, address: &str) -> HostResult<LivenessSnapshot> {
        self.ping.ping(address).await
    }
}

impl HostAdapter for LinuxHost {}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolve_through_realpath() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("survival");
        std::fs::create_dir(&target).unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("current")).unwrap();

        let host = LinuxHost::new("screen", Duration::from_secs(1));
        let out = host
            .run_capture(
                "realpath",
                &[
                    "-e".into(),
                    "--".into(),
                    dir.path().join("current").display().to_string(),
                ],
            )
            .await
            .unwrap();
        assert!(out.trim().ends_with("/survival"));
    }

    #[tokio::test]
    async fn marker_through_adapter() {
        let dir = tempfile::tempdir().unwrap();
        let host = LinuxHost::new("screen", Duration::from_secs(1));
        assert!(!host.marker_present(dir.path()).await.unwrap());
    }
}

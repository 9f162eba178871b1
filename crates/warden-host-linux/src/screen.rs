//! GNU screen session listing

use std::collections::BTreeSet;
use tokio::process::Command;
use tracing::debug;
use warden_host_api::{HostError, HostResult};
use warden_util::SessionId;

use crate::process::run;

const NO_SESSIONS: &str = "No Sockets found";

/// Lists sessions through `<program> -ls`
#[derive(Debug, Clone)]
pub struct ScreenSessions {
    program: String,
}

impl ScreenSessions {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Every live session, tagged or not
    pub async fn list(&self) -> HostResult<BTreeSet<SessionId>> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-ls");
        let output = run(&self.program, cmd).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        // screen exits non-zero both with and without sessions
        if stdout.contains(NO_SESSIONS) {
            return Ok(BTreeSet::new());
        }

        let sessions = parse_session_list(&stdout);
        if sessions.is_empty() && !output.status.success() {
            return Err(HostError::NonZeroExit {
                program: self.program.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(sessions)
    }

    pub async fn tagged(&self, tag: &str) -> HostResult<BTreeSet<SessionId>> {
        let sessions: BTreeSet<SessionId> = self
            .list()
            .await?
            .into_iter()
            .filter(|s| s.name().contains(tag))
            .collect();
        debug!(tag, count = sessions.len(), "Listed tagged sessions");
        Ok(sessions)
    }
}

/// Extract `<pid>.<name>` identifiers from `screen -ls` output
pub fn parse_session_list(output: &str) -> BTreeSet<SessionId> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .filter(|token| {
            token
                .split_once('.')
                .is_some_and(|(pid, name)| {
                    !pid.is_empty() && pid.bytes().all(|b| b.is_ascii_digit()) && !name.is_empty()
                })
        })
        .map(SessionId::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "There are screens on:\n\
        \t48213.survival-run\t(10/19/2026 08:14:02 PM)\t(Detached)\n\
        \t48377.survival-stop\t(10/19/2026 08:20:11 PM)\t(Detached)\n\
        \t1022.backup\t(Attached)\n\
        3 Sockets in /run/screen/S-minecraft.\n";

    #[test]
    fn parse_listing() {
        let sessions = parse_session_list(LISTING);
        let names: Vec<&str> = sessions.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["backup", "survival-run", "survival-stop"]);
    }

    #[test]
    fn parse_empty_listing() {
        let sessions = parse_session_list("No Sockets found in /run/screen/S-minecraft.\n\n");
        assert!(sessions.is_empty());
    }

    #[tokio::test]
    async fn missing_session_manager_is_an_error() {
        let screen = ScreenSessions::new("/nonexistent/warden-screen");
        assert!(screen.tagged("survival-run").await.is_err());
    }
}

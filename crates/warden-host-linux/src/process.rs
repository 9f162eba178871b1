//! External command execution

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::debug;

use warden_host_api::{HostError, HostResult};

/// Interpreter used for control scripts
pub const DEFAULT_SCRIPT_INTERPRETER: &str = "/bin/bash";

/// Runs programs and control scripts as child processes
#[derive(Debug, Clone)]
pub struct ShellRunner {
    interpreter: PathBuf,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self::with_interpreter(DEFAULT_SCRIPT_INTERPRETER)
    }

    /// Scripts are passed to `interpreter` so they need not be executable
    pub fn with_interpreter(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    pub async fn capture(&self, program: &str, args: &[String]) -> HostResult<String> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        let output = run(program, cmd).await?;
        check_status(program, &output)?;

        String::from_utf8(output.stdout)
            .map_err(|e| HostError::Parse(format!("{program} printed invalid UTF-8: {e}")))
    }

    pub async fn script(&self, script: &Path, args: &[String]) -> HostResult<()> {
        let name = script.display().to_string();
        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(script).args(args);
        let output = run(&name, cmd).await?;

        debug!(
            script = %name,
            ?args,
            stdout = %String::from_utf8_lossy(&output.stdout).trim(),
            "Control script finished"
        );
        check_status(&name, &output)
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn `cmd` and wait for it, capturing both output streams
pub(crate) async fn run(program: &str, mut cmd: Command) -> HostResult<Output> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(program, "Running external command");
    cmd.output().await.map_err(|source| HostError::Spawn {
        program: program.to_string(),
        source,
    })
}

pub(crate) fn check_status(program: &str, output: &Output) -> HostResult<()> {
    if output.status.success() {
        return Ok(());
    }
    Err(HostError::NonZeroExit {
        program: program.to_string(),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn capture_stdout() {
        let runner = ShellRunner::new();
        let out = runner
            .capture("echo", &["-n".into(), "survival".into()])
            .await
            .unwrap();
        assert_eq!(out, "survival");
    }

    #[tokio::test]
    async fn nonzero_exit_is_reported() {
        let runner = ShellRunner::new();
        let err = runner.capture("false", &[]).await.unwrap_err();
        assert!(matches!(err, HostError::NonZeroExit { code: Some(1), .. }));
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
        let runner = ShellRunner::new();
        let err = runner
            .capture("/nonexistent/warden-test-binary", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::Spawn { .. }));
    }

    #[tokio::test]
    async fn script_receives_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("args");
        let script = dir.path().join("ctl.sh");
        let mut file = std::fs::File::create(&script).unwrap();
        writeln!(file, "echo \"$@\" > '{}'", out.display()).unwrap();
        writeln!(file, "[ \"$1\" = run ]").unwrap();
        drop(file);

        let runner = ShellRunner::new();
        runner
            .script(&script, &["run".into(), "survival".into()])
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap().trim(), "run survival");

        let err = runner
            .script(&script, &["stop".into(), "survival".into(), "now".into()])
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::NonZeroExit { .. }));
    }
}

//! Mock host adapter for testing

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use warden_api::LivenessSnapshot;
use warden_util::SessionId;

use crate::{
    CommandRunner, HostAdapter, HostError, HostResult, LivenessProbe, MarkerProbe, SessionLister,
};

/// A host operation observed by the mock, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Capture { program: String, args: Vec<String> },
    Script { script: PathBuf, args: Vec<String> },
    ListSessions { tag: String },
    Marker { server_dir: PathBuf },
    Ping { address: String },
}

/// Mock host adapter for unit/integration testing
///
/// Everything is scripted: alias targets, live sessions, markers and ping
/// replies. Every call is recorded so tests can assert on ordering.
pub struct MockHost {
    next_pid: AtomicU32,
    canonical: Mutex<HashMap<PathBuf, PathBuf>>,
    sessions: Mutex<BTreeSet<SessionId>>,
    markers: Mutex<HashSet<PathBuf>>,
    pings: Mutex<HashMap<String, LivenessSnapshot>>,
    calls: Mutex<Vec<MockCall>>,

    /// Configure command capture to fail
    pub fail_capture: Mutex<bool>,

    /// Configure session listing to fail
    pub fail_sessions: Mutex<bool>,

    /// Configure the marker check to fail
    pub fail_marker: Mutex<bool>,

    /// Configure control scripts to fail
    pub fail_script: Mutex<bool>,

    /// Make `run`/`stop` scripts add/remove the matching sessions
    pub simulate_control: Mutex<bool>,

    /// Hold every ping for this long before answering
    pub ping_delay: Mutex<Option<Duration>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            next_pid: AtomicU32::new(1000),
            canonical: Mutex::new(HashMap::new()),
            sessions: Mutex::new(BTreeSet::new()),
            markers: Mutex::new(HashSet::new()),
            pings: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            fail_capture: Mutex::new(false),
            fail_sessions: Mutex::new(false),
            fail_marker: Mutex::new(false),
            fail_script: Mutex::new(false),
            simulate_control: Mutex::new(false),
            ping_delay: Mutex::new(None),
        }
    }

    /// Let control scripts change session state like the real CLI would
    pub fn with_control_simulation(self) -> Self {
        *self.simulate_control.lock().unwrap() = true;
        self
    }

    /// Make `path` canonicalize to `target`
    pub fn point(&self, path: impl Into<PathBuf>, target: impl Into<PathBuf>) {
        self.canonical
            .lock()
            .unwrap()
            .insert(path.into(), target.into());
    }

    /// Remove a canonicalization so resolving `path` fails
    pub fn unlink(&self, path: impl AsRef<Path>) {
        self.canonical.lock().unwrap().remove(path.as_ref());
    }

    /// Start a fake session named `name`, returning its id
    pub fn add_session(&self, name: &str) -> SessionId {
        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
        let id = SessionId::new(format!("{pid}.{name}"));
        self.sessions.lock().unwrap().insert(id.clone());
        id
    }

    /// Drop every session whose name starts with `prefix`
    pub fn remove_sessions(&self, prefix: &str) {
        self.sessions
            .lock()
            .unwrap()
            .retain(|s| !s.name().starts_with(prefix));
    }

    pub fn set_marker(&self, server_dir: impl Into<PathBuf>, present: bool) {
        let mut markers = self.markers.lock().unwrap();
        let dir = server_dir.into();
        if present {
            markers.insert(dir);
        } else {
            markers.remove(&dir);
        }
    }

    /// Script the ping reply for `address`; `None` makes it time out
    pub fn set_ping(&self, address: &str, reply: Option<LivenessSnapshot>) {
        let mut pings = self.pings.lock().unwrap();
        match reply {
            Some(snapshot) => {
                pings.insert(address.to_string(), snapshot);
            }
            None => {
                pings.remove(address);
            }
        }
    }

    /// All recorded calls, oldest first
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded control-script invocations only
    pub fn script_calls(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MockCall::Script { args, .. } => Some(args),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn apply_control(&self, args: &[String]) {
        match args {
            [action, name, ..] if action == "run" => {
                self.add_session(&format!("{name}-run"));
            }
            [action, name, ..] if action == "stop" => {
                self.remove_sessions(&format!("{name}-"));
            }
            _ => {}
        }
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for MockHost {
    async fn run_capture(&self, program: &str, args: &[String]) -> HostResult<String> {
        self.record(MockCall::Capture {
            program: program.to_string(),
            args: args.to_vec(),
        });

        if *self.fail_capture.lock().unwrap() {
            return Err(HostError::Internal("Mock capture failure".into()));
        }

        match (program, args.last()) {
            ("realpath", Some(path)) => self
                .canonical
                .lock()
                .unwrap()
                .get(Path::new(path))
                .map(|target| format!("{}\n", target.display()))
                .ok_or_else(|| HostError::NonZeroExit {
                    program: program.to_string(),
                    code: Some(1),
                    stderr: format!("realpath: {path}: No such file or directory"),
                }),
            _ => Err(HostError::Internal(format!("Unscripted command: {program}"))),
        }
    }

    async fn run_script(&self, script: &Path, args: &[String]) -> HostResult<()> {
        self.record(MockCall::Script {
            script: script.to_path_buf(),
            args: args.to_vec(),
        });

        if *self.fail_script.lock().unwrap() {
            return Err(HostError::NonZeroExit {
                program: script.display().to_string(),
                code: Some(2),
                stderr: "Mock script failure".into(),
            });
        }

        if *self.simulate_control.lock().unwrap() {
            self.apply_control(args);
        }
        Ok(())
    }
}

#[async_trait]
impl SessionLister for MockHost {
    async fn list_tagged_sessions(&self, tag: &str) -> HostResult<BTreeSet<SessionId>> {
        self.record(MockCall::ListSessions {
            tag: tag.to_string(),
        });

        if *self.fail_sessions.lock().unwrap() {
            return Err(HostError::Internal("Mock session listing failure".into()));
        }

        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.name().contains(tag))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MarkerProbe for MockHost {
    async fn marker_present(&self, server_dir: &Path) -> HostResult<bool> {
        self.record(MockCall::Marker {
            server_dir: server_dir.to_path_buf(),
        });

        if *self.fail_marker.lock().unwrap() {
            return Err(HostError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "Mock marker failure",
            )));
        }

        Ok(self.markers.lock().unwrap().contains(server_dir))
    }
}

#[async_trait]
impl LivenessProbe for MockHost {
    async fn ping(&self, address: &str) -> HostResult<LivenessSnapshot> {
        self.record(MockCall::Ping {
            address: address.to_string(),
        });

        let delay = *self.ping_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.pings
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .ok_or(HostError::Timeout(Duration::from_secs(5)))
    }
}

impl HostAdapter for MockHost {}

//! Integration tests for wardend
//!
//! These run the full service (core, watcher, IPC) against a scripted host.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use warden_api::{
    Command, ErrorCode, EventPayload, LivenessSnapshot, ResponsePayload, ResponseResult,
    ServerState, StartOutcome,
};
use warden_config::parse_config;
use warden_host_api::MockHost;
use warden_ipc::IpcClient;
use wardend::Service;

const ADDR: &str = "mc.example.org";

struct Harness {
    host: Arc<MockHost>,
    socket: PathBuf,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<anyhow::Result<()>>,
    _dir: TempDir,
}

impl Harness {
    async fn start(host: Arc<MockHost>, max_attempts: u32, interval: Duration) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("wardend.sock");

        let mut config = parse_config(&format!(
            r#"
            config_version = 1

            [server]
            base_dir = "/opt/paper"
            address = "{ADDR}"

            [control]
            script = "/opt/paper/pst.sh"

            [watch]
            max_attempts = {max_attempts}

            [service]
            socket_path = "{}"
            "#,
            socket.display()
        ))
        .unwrap();
        config.watch.interval = interval;

        let service = Service::new(config, host.clone()).await.unwrap();
        let (tx, rx) = oneshot::channel();
        let task = tokio::spawn(service.run(async {
            let _ = rx.await;
        }));

        Self {
            host,
            socket,
            shutdown: Some(tx),
            task,
            _dir: dir,
        }
    }

    async fn client(&self) -> IpcClient {
        IpcClient::connect(&self.socket).await.unwrap()
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        tokio::time::timeout(Duration::from_secs(5), &mut self.task)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}

fn scripted_host() -> Arc<MockHost> {
    let host = Arc::new(MockHost::new().with_control_simulation());
    host.point("/opt/paper/current", "/opt/paper/survival");
    host
}

async fn status(client: &mut IpcClient) -> ServerState {
    match client.call(Command::GetStatus).await.unwrap() {
        ResponsePayload::Status(view) => {
            assert_eq!(view.server, "survival");
            assert_eq!(view.address, ADDR);
            view.state
        }
        other => panic!("unexpected payload {other:?}"),
    }
}

async fn start(client: &mut IpcClient) -> StartOutcome {
    match client.call(Command::Start).await.unwrap() {
        ResponsePayload::StartResult(outcome) => outcome,
        other => panic!("unexpected payload {other:?}"),
    }
}

#[tokio::test]
async fn status_and_start_over_ipc() {
    let harness = Harness::start(scripted_host(), 3, Duration::from_secs(3600)).await;
    let mut client = harness.client().await;

    assert_eq!(status(&mut client).await, ServerState::Down);

    assert!(matches!(start(&mut client).await, StartOutcome::Started { .. }));
    assert_eq!(status(&mut client).await, ServerState::Starting);
    assert!(matches!(
        start(&mut client).await,
        StartOutcome::AlreadyStarting { .. }
    ));

    harness.host.set_ping(
        ADDR,
        Some(LivenessSnapshot {
            online: 1,
            max: 20,
            sample: vec!["alex".into()],
        }),
    );
    match start(&mut client).await {
        StartOutcome::AlreadyUp { liveness, .. } => assert_eq!(liveness.sample, vec!["alex"]),
        other => panic!("unexpected outcome {other:?}"),
    }

    assert_eq!(harness.host.script_calls().len(), 1);
    harness.stop().await;
}

#[tokio::test]
async fn locked_server_is_not_started() {
    let host = scripted_host();
    host.set_marker("/opt/paper/survival", true);
    let harness = Harness::start(host, 3, Duration::from_secs(3600)).await;
    let mut client = harness.client().await;

    assert_eq!(status(&mut client).await, ServerState::Locked);
    assert!(matches!(start(&mut client).await, StartOutcome::Locked { .. }));
    assert!(harness.host.script_calls().is_empty());
    harness.stop().await;
}

#[tokio::test]
async fn unresolvable_alias_is_reported() {
    let host = Arc::new(MockHost::new());
    let harness = Harness::start(host, 3, Duration::from_secs(3600)).await;
    let mut client = harness.client().await;

    let response = client.send(Command::GetStatus).await.unwrap();
    match response.result {
        ResponseResult::Err(e) => assert_eq!(e.code, ErrorCode::ResolutionFailed),
        other => panic!("unexpected result {other:?}"),
    }
    harness.stop().await;
}

#[tokio::test]
async fn control_failure_is_reported() {
    let host = scripted_host();
    *host.fail_script.lock().unwrap() = true;
    let harness = Harness::start(host, 3, Duration::from_secs(3600)).await;
    let mut client = harness.client().await;

    let response = client.send(Command::Start).await.unwrap();
    match response.result {
        ResponseResult::Err(e) => assert_eq!(e.code, ErrorCode::ControlFailed),
        other => panic!("unexpected result {other:?}"),
    }
    harness.stop().await;
}

#[tokio::test]
async fn health_and_ping() {
    let harness = Harness::start(scripted_host(), 3, Duration::from_secs(3600)).await;
    let mut client = harness.client().await;

    assert!(matches!(
        client.call(Command::Ping).await.unwrap(),
        ResponsePayload::Pong
    ));
    match client.call(Command::GetHealth).await.unwrap() {
        ResponsePayload::Health(health) => {
            assert!(health.live);
            assert!(health.watcher_running);
        }
        other => panic!("unexpected payload {other:?}"),
    }
    harness.stop().await;
}

#[tokio::test]
async fn slow_status_does_not_block_other_clients() {
    let host = scripted_host();
    host.add_session("survival-run");
    host.set_ping(ADDR, Some(LivenessSnapshot::default()));
    let harness = Harness::start(host, 3, Duration::from_secs(3600)).await;

    let mut fast = harness.client().await;
    fast.call(Command::Ping).await.unwrap();

    *harness.host.ping_delay.lock().unwrap() = Some(Duration::from_secs(2));
    let mut slow = harness.client().await;
    let pending = tokio::spawn(async move { status(&mut slow).await });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let pong = tokio::time::timeout(Duration::from_millis(500), fast.call(Command::Ping))
        .await
        .expect("ping was held up behind a slow status request")
        .unwrap();
    assert!(matches!(pong, ResponsePayload::Pong));
    assert!(!pending.is_finished());

    assert_eq!(pending.await.unwrap(), ServerState::Up);
    harness.stop().await;
}

#[tokio::test]
async fn watcher_stops_idle_server_and_clears_presence() {
    let host = scripted_host();
    host.add_session("survival-run");
    host.set_ping(ADDR, Some(LivenessSnapshot::default()));
    let harness = Harness::start(host, 3, Duration::from_millis(100)).await;

    let mut events = harness.client().await.subscribe().await.unwrap();

    let mut forced_stop = false;
    let mut cleared = false;
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !(forced_stop && cleared) {
        let event = tokio::time::timeout_at(deadline, events.next())
            .await
            .expect("idle server was not stopped in time")
            .unwrap();
        match event.payload {
            EventPayload::ForcedStop { server } => {
                assert_eq!(server, "survival");
                forced_stop = true;
            }
            EventPayload::PresenceChanged { label: None } => cleared = true,
            _ => {}
        }
    }

    assert!(harness
        .host
        .script_calls()
        .contains(&vec!["stop".to_string(), "survival".to_string(), "now".to_string()]));
    harness.stop().await;
}

#[tokio::test]
async fn shutdown_notifies_subscribers_and_removes_socket() {
    let harness = Harness::start(scripted_host(), 3, Duration::from_secs(3600)).await;
    let socket = harness.socket.clone();
    let mut events = harness.client().await.subscribe().await.unwrap();

    let shutdown = tokio::spawn(harness.stop());
    let event = tokio::time::timeout(Duration::from_secs(5), events.next())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(event.payload, EventPayload::Shutdown));

    shutdown.await.unwrap();
    assert!(!socket.exists());
}

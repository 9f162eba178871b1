//! wardend service
//!
//! Wires together:
//! - Core supervisor (resolver, status engine, lifecycle)
//! - The idle-shutdown watch loop
//! - IPC server and event fan-out

use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};
use warden_api::{
    Command, ErrorCode, ErrorInfo, Event, EventPayload, HealthStatus, Response, ResponsePayload,
};
use warden_config::Config;
use warden_core::{Supervisor, WatchEvent, Watcher};
use warden_host_api::HostAdapter;
use warden_ipc::{IpcServer, ServerMessage};
use warden_util::ClientId;

/// Main service state
pub struct Service {
    config: Config,
    host: Arc<dyn HostAdapter>,
    supervisor: Arc<Supervisor>,
    ipc: Arc<IpcServer>,
}

impl Service {
    /// Build the core and bind the IPC socket
    pub async fn new(config: Config, host: Arc<dyn HostAdapter>) -> Result<Self> {
        let supervisor = Arc::new(Supervisor::new(host.clone(), &config));

        let socket_path = config.service.socket_path.clone();
        let mut ipc = IpcServer::new(&socket_path);
        ipc.start()
            .await
            .with_context(|| format!("Failed to start IPC server at {:?}", socket_path))?;

        Ok(Self {
            config,
            host,
            supervisor,
            ipc: Arc::new(ipc),
        })
    }

    /// Serve until `shutdown` resolves
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> Result<()> {
        let ipc = self.ipc.clone();
        let mut ipc_messages = ipc
            .take_message_receiver()
            .await
            .context("IPC message receiver already taken")?;

        let ipc_accept = ipc.clone();
        tokio::spawn(async move {
            if let Err(e) = ipc_accept.run().await {
                error!(error = %e, "IPC server error");
            }
        });

        let mut presence = Self::startup_presence(&self.supervisor).await;
        if let Some(label) = &presence {
            info!(server = %label, "Server already running at startup");
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (watch_tx, mut watch_events) = mpsc::unbounded_channel();
        let watcher = Watcher::new(self.supervisor.clone(), self.config.watch.max_attempts);
        let watch_task = watcher.spawn(self.config.watch.interval, shutdown_rx, watch_tx);

        info!("Service running");

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }

                Some(event) = watch_events.recv() => {
                    Self::handle_watch_event(&ipc, &mut presence, event);
                }

                Some(msg) = ipc_messages.recv() => {
                    let watcher_running = !watch_task.is_finished();
                    self.handle_ipc_message(watcher_running, msg);
                }
            }
        }

        info!("Shutting down wardend");

        let _ = shutdown_tx.send(true);
        if let Err(e) = watch_task.await {
            warn!(error = %e, "Watch loop ended abnormally");
        }

        ipc.broadcast_event(Event::new(EventPayload::Shutdown));
        ipc.shutdown();

        info!("Shutdown complete");
        Ok(())
    }

    /// Presence to advertise if the server was already live before we started
    async fn startup_presence(supervisor: &Supervisor) -> Option<String> {
        let handle = match supervisor.resolver.resolve().await {
            Ok(handle) => handle,
            Err(e) => {
                warn!(error = %e, "Cannot determine server at startup");
                return None;
            }
        };

        let status = supervisor.engine.status(&handle).await;
        debug!(server = %handle, status = %status.state(), "Startup status");
        status.is_present().then(|| handle.name)
    }

    fn handle_watch_event(ipc: &IpcServer, presence: &mut Option<String>, event: WatchEvent) {
        match event {
            WatchEvent::TickSkipped { reason } => {
                debug!(reason = %reason, "Watch tick skipped");
            }

            WatchEvent::HandOff { from, to } => {
                ipc.broadcast_event(Event::new(EventPayload::HandOff { from, to }));
            }

            WatchEvent::Observed {
                view,
                counter,
                max_attempts,
            } => {
                ipc.broadcast_event(Event::new(EventPayload::StatusObserved {
                    view,
                    counter,
                    max_attempts,
                }));
            }

            WatchEvent::Presence { label } => {
                if *presence != label {
                    info!(label = ?label, "Presence changed");
                    *presence = label.clone();
                    ipc.broadcast_event(Event::new(EventPayload::PresenceChanged { label }));
                }
            }

            WatchEvent::ForcedStop { server } => {
                ipc.broadcast_event(Event::new(EventPayload::ForcedStop { server }));
            }
        }
    }

    /// Each request is answered on its own task
    fn handle_ipc_message(&self, watcher_running: bool, msg: ServerMessage) {
        match msg {
            ServerMessage::Request { client_id, request } => {
                let supervisor = self.supervisor.clone();
                let host = self.host.clone();
                let ipc = self.ipc.clone();

                tokio::spawn(async move {
                    let health = HealthStatus {
                        live: host.is_healthy(),
                        config_loaded: true,
                        watcher_running,
                    };
                    let response = handle_command(
                        &supervisor,
                        health,
                        &client_id,
                        request.request_id,
                        request.command,
                    )
                    .await;

                    if let Err(e) = ipc.send_response(&client_id, response).await {
                        debug!(client_id = %client_id, error = %e, "Failed to send response");
                    }
                });
            }

            ServerMessage::ClientConnected { client_id, uid } => {
                info!(client_id = %client_id, uid = ?uid, "Client connected");
            }

            ServerMessage::ClientDisconnected { client_id } => {
                debug!(client_id = %client_id, "Client disconnected");
            }
        }
    }
}

/// Answer one client command
pub async fn handle_command(
    supervisor: &Supervisor,
    health: HealthStatus,
    client_id: &ClientId,
    request_id: u64,
    command: Command,
) -> Response {
    match command {
        Command::GetStatus => match supervisor.resolver.resolve().await {
            Ok(handle) => {
                let status = supervisor.engine.status(&handle).await;
                Response::success(request_id, ResponsePayload::Status(status.view(&handle)))
            }
            Err(e) => resolution_error(request_id, e),
        },

        Command::Start => {
            let handle = match supervisor.resolver.resolve().await {
                Ok(handle) => handle,
                Err(e) => return resolution_error(request_id, e),
            };

            match supervisor
                .lifecycle
                .request_start(&supervisor.engine, &handle)
                .await
            {
                Ok(decision) => {
                    info!(server = %handle, decision = ?decision, "Start requested");
                    Response::success(
                        request_id,
                        ResponsePayload::StartResult(decision.into_outcome(&handle)),
                    )
                }
                Err(e) => {
                    warn!(error = %e, "Start failed");
                    Response::error(request_id, ErrorInfo::new(ErrorCode::ControlFailed, e.to_string()))
                }
            }
        }

        Command::Stop => {
            let handle = match supervisor.resolver.resolve().await {
                Ok(handle) => handle,
                Err(e) => return resolution_error(request_id, e),
            };

            match supervisor.lifecycle.stop(&handle).await {
                Ok(()) => Response::success(
                    request_id,
                    ResponsePayload::Stopped {
                        server: handle.name,
                    },
                ),
                Err(e) => {
                    warn!(error = %e, "Stop failed");
                    Response::error(request_id, ErrorInfo::new(ErrorCode::ControlFailed, e.to_string()))
                }
            }
        }

        Command::SubscribeEvents => Response::success(
            request_id,
            ResponsePayload::Subscribed {
                client_id: client_id.clone(),
            },
        ),

        Command::UnsubscribeEvents => Response::success(request_id, ResponsePayload::Unsubscribed),

        Command::GetHealth => Response::success(request_id, ResponsePayload::Health(health)),

        Command::Ping => Response::success(request_id, ResponsePayload::Pong),
    }
}

fn resolution_error(request_id: u64, e: warden_core::ResolutionFailed) -> Response {
    warn!(error = %e, "Cannot resolve server");
    Response::error(request_id, ErrorInfo::new(ErrorCode::ResolutionFailed, e.to_string()))
}

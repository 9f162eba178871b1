//! Idle-shutdown watch loop

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::{ServerHandle, ServerStatus, Supervisor, WatchEvent};

/// Consecutive idle/failed observations, with a saturating threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleCounter {
    value: u32,
    max: u32,
}

impl IdleCounter {
    pub fn new(max: u32) -> Self {
        Self { value: 0, max }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Apply one observation and return the new value
    ///
    /// A server that is down, locked, changing state or has players resets
    /// the count. An empty server or an undeterminable status counts up.
    pub fn observe(&mut self, status: &ServerStatus) -> u32 {
        self.value = match status {
            ServerStatus::Down
            | ServerStatus::Locked
            | ServerStatus::Stopping
            | ServerStatus::Starting => 0,
            ServerStatus::Up(snapshot) if snapshot.online >= 1 => 0,
            ServerStatus::Up(_) | ServerStatus::Undefined(_) => self.value.saturating_add(1),
        };
        self.value
    }

    pub fn is_saturated(&self) -> bool {
        self.value >= self.max
    }

    /// Pin at the threshold after a forced stop
    pub fn clamp(&mut self) {
        self.value = self.max;
    }
}

/// Periodically checks the configured server and stops it once idle
///
/// Owns the only mutable watch state: the last resolved handle and the idle
/// counter. Both survive ticks where resolution fails.
pub struct Watcher {
    supervisor: Arc<Supervisor>,
    last: Option<ServerHandle>,
    counter: IdleCounter,
}

impl Watcher {
    pub fn new(supervisor: Arc<Supervisor>, max_attempts: u32) -> Self {
        Self {
            supervisor,
            last: None,
            counter: IdleCounter::new(max_attempts),
        }
    }

    pub fn last_handle(&self) -> Option<&ServerHandle> {
        self.last.as_ref()
    }

    pub fn counter(&self) -> u32 {
        self.counter.value()
    }

    /// Run one iteration and return what happened, in order
    pub async fn tick(&mut self) -> Vec<WatchEvent> {
        let mut events = Vec::new();

        let handle = match self.supervisor.resolver.resolve().await {
            Ok(handle) => handle,
            Err(e) => {
                warn!(error = %e, "Skipping watch tick");
                events.push(WatchEvent::TickSkipped {
                    reason: e.to_string(),
                });
                return events;
            }
        };

        if let Some(last) = self.last.take() {
            if last != handle {
                info!(from = %last, to = %handle, "Server alias moved, stopping previous server");
                if let Err(e) = self.supervisor.lifecycle.stop(&last).await {
                    warn!(error = %e, "Failed to stop previous server");
                }
                events.push(WatchEvent::HandOff {
                    from: last.name,
                    to: handle.name.clone(),
                });
            }
        }
        self.last = Some(handle.clone());

        let status = self.supervisor.engine.status(&handle).await;
        let previous = self.counter.value();
        let counter = self.counter.observe(&status);

        if counter != previous {
            info!(
                server = %handle,
                status = %status.state(),
                counter,
                max_attempts = self.counter.max(),
                "Idle counter changed"
            );
        } else {
            debug!(server = %handle, status = %status.state(), counter, "Watch tick");
        }
        if let Some(err) = status.error() {
            warn!(server = %handle, error = %err, "Status undetermined");
        }

        events.push(WatchEvent::Observed {
            view: status.view(&handle),
            counter,
            max_attempts: self.counter.max(),
        });

        if status.is_present() {
            events.push(WatchEvent::Presence {
                label: Some(handle.name.clone()),
            });
        }

        if self.counter.is_saturated() {
            info!(server = %handle, counter, "Max idle attempts reached, stopping server");
            if let Err(e) = self.supervisor.lifecycle.stop(&handle).await {
                warn!(error = %e, "Failed to stop idle server");
            }
            events.push(WatchEvent::ForcedStop {
                server: handle.name.clone(),
            });
            events.push(WatchEvent::Presence { label: None });
            self.counter.clamp();
        }

        events
    }

    /// Run the loop on its own task until `shutdown` becomes true
    ///
    /// The first tick happens one `period` after spawning. Ticks never
    /// overlap; a tick that overruns the period delays the next one.
    pub fn spawn(
        mut self,
        period: Duration,
        mut shutdown: watch::Receiver<bool>,
        events: mpsc::UnboundedSender<WatchEvent>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            info!(interval_secs = period.as_secs(), "Watch loop started");

            loop {
                if *shutdown.borrow() {
                    break;
                }

                tokio::select! {
                    _ = interval.tick() => {
                        for event in self.tick().await {
                            if events.send(event).is_err() {
                                debug!("Watch event receiver dropped");
                            }
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }

            info!("Watch loop stopped");
        })
    }
}

//! Events emitted by the watch loop

use warden_api::StatusView;

/// Events emitted by the watch loop, one batch per tick
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// The alias could not be resolved; nothing else happened this tick
    TickSkipped { reason: String },

    /// The alias moved; the previous server was asked to stop
    HandOff { from: String, to: String },

    /// Status inferred for the current server
    Observed {
        view: StatusView,
        counter: u32,
        max_attempts: u32,
    },

    /// Presence label to advertise (`None` clears it)
    Presence { label: Option<String> },

    /// Idle threshold reached and a stop was issued
    ForcedStop { server: String },
}

//! Event types for wardend -> client streaming

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::{StatusView, API_VERSION};

/// Event envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub api_version: u32,
    pub timestamp: DateTime<Local>,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(payload: EventPayload) -> Self {
        Self {
            api_version: API_VERSION,
            timestamp: warden_util::now(),
            payload,
        }
    }
}

/// All possible events from the service to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    /// Presence label changed; `None` clears it
    PresenceChanged { label: Option<String> },

    /// The watcher observed a status on its tick
    StatusObserved {
        view: StatusView,
        counter: u32,
        max_attempts: u32,
    },

    /// The watcher stopped an idle or unreachable server
    ForcedStop { server: String },

    /// The alias moved to another server; the previous one was stopped
    HandOff { from: String, to: String },

    /// Service is shutting down
    Shutdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serialization() {
        let event = Event::new(EventPayload::HandOff {
            from: "survival".into(),
            to: "creative".into(),
        });

        let json = serde_json::to_string(&event).unwrap();
        let parsed: Event = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.api_version, API_VERSION);
        assert!(matches!(parsed.payload, EventPayload::HandOff { ref to, .. } if to == "creative"));
    }

    #[test]
    fn presence_clear_serializes_null() {
        let json = serde_json::to_value(EventPayload::PresenceChanged { label: None }).unwrap();
        assert_eq!(json["type"], "presence_changed");
        assert!(json["label"].is_null());
    }
}

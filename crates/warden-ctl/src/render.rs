//! Plain-text rendering of responses and events

use std::fmt::Write;
use warden_api::{Event, EventPayload, StartOutcome, StatusView};
use warden_util::format_datetime_full;

pub fn status(view: &StatusView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Server:  {}", view.server);
    let _ = writeln!(out, "IP:      {}", view.address);
    let _ = writeln!(out, "Status:  {}", view.state);

    if let Some(liveness) = &view.liveness {
        let _ = writeln!(out, "Players capacity: {}/{}", liveness.online, liveness.max);
        if !liveness.sample.is_empty() {
            let _ = writeln!(out, "Players online:");
            for name in &liveness.sample {
                let _ = writeln!(out, "  {name}");
            }
        }
    }

    if let Some(error) = &view.error {
        let _ = writeln!(out, "Error:   {error}");
    }
    out
}

pub fn start_outcome(outcome: &StartOutcome) -> String {
    match outcome {
        StartOutcome::Started { server, address } => {
            format!("Starting {server}, it will be available at {address} shortly")
        }
        StartOutcome::AlreadyUp {
            server,
            address,
            liveness,
        } => format!(
            "{server} is already up at {address} ({}/{} players)",
            liveness.online, liveness.max
        ),
        StartOutcome::AlreadyStarting { server, address } => {
            format!("{server} was started but is not ready yet ({address})")
        }
        StartOutcome::Busy { server } => {
            format!("{server} is shutting down, retry when it has finished")
        }
        StartOutcome::Locked { server } => {
            format!("{server} is locked for maintenance and cannot be started")
        }
        StartOutcome::Unknown { server, error } => {
            format!("Status of {server} could not be determined: {error}")
        }
    }
}

pub fn event(event: &Event) -> String {
    let body = match &event.payload {
        EventPayload::PresenceChanged { label: Some(label) } => format!("presence: {label}"),
        EventPayload::PresenceChanged { label: None } => "presence cleared".to_string(),
        EventPayload::StatusObserved {
            view,
            counter,
            max_attempts,
        } => format!("{} {} (idle {counter}/{max_attempts})", view.server, view.state),
        EventPayload::ForcedStop { server } => format!("{server} stopped after idling"),
        EventPayload::HandOff { from, to } => format!("alias moved {from} -> {to}, {from} stopped"),
        EventPayload::Shutdown => "wardend shutting down".to_string(),
    };
    format!("[{}] {body}", format_datetime_full(&event.timestamp))
}

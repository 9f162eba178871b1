//! Command types for the wardend protocol

use serde::{Deserialize, Serialize};
use warden_util::ClientId;

use crate::{HealthStatus, StartOutcome, StatusView, API_VERSION};

/// Request wrapper with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Request ID for correlation
    pub request_id: u64,
    /// API version
    pub api_version: u32,
    /// The command
    pub command: Command,
}

impl Request {
    pub fn new(request_id: u64, command: Command) -> Self {
        Self {
            request_id,
            api_version: API_VERSION,
            command,
        }
    }
}

/// Response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Corresponding request ID
    pub request_id: u64,
    /// API version
    pub api_version: u32,
    /// Response payload or error
    pub result: ResponseResult,
}

impl Response {
    pub fn success(request_id: u64, payload: ResponsePayload) -> Self {
        Self {
            request_id,
            api_version: API_VERSION,
            result: ResponseResult::Ok(payload),
        }
    }

    pub fn error(request_id: u64, error: ErrorInfo) -> Self {
        Self {
            request_id,
            api_version: API_VERSION,
            result: ResponseResult::Err(error),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseResult {
    Ok(ResponsePayload),
    Err(ErrorInfo),
}

/// Error information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Error codes for the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
    /// The alias could not be resolved to a concrete server
    ResolutionFailed,
    /// The control script reported failure
    ControlFailed,
    InternalError,
}

/// All possible commands from clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Resolve the current server and infer its status
    GetStatus,

    /// Start the current server if it is down
    Start,

    /// Stop the current server unconditionally
    Stop,

    /// Subscribe to events (returns immediately, events stream separately)
    SubscribeEvents,

    /// Unsubscribe from events
    UnsubscribeEvents,

    /// Get health status
    GetHealth,

    /// Ping for keepalive
    Ping,
}

/// Response payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponsePayload {
    Status(StatusView),
    StartResult(StartOutcome),
    Stopped { server: String },
    Subscribed { client_id: ClientId },
    Unsubscribed,
    Health(HealthStatus),
    Pong,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServerState;

    #[test]
    fn request_serialization() {
        let req = Request::new(1, Command::GetStatus);
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""type":"get_status""#));

        let parsed: Request = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.request_id, 1);
        assert!(matches!(parsed.command, Command::GetStatus));
    }

    #[test]
    fn response_serialization() {
        let resp = Response::success(
            7,
            ResponsePayload::Status(StatusView {
                server: "survival".into(),
                base: "/srv/paper".into(),
                address: "mc.example.org".into(),
                state: ServerState::Down,
                liveness: None,
                error: None,
            }),
        );

        let json = serde_json::to_string(&resp).unwrap();
        let parsed: Response = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.request_id, 7);
        match parsed.result {
            ResponseResult::Ok(ResponsePayload::Status(view)) => {
                assert_eq!(view.state, ServerState::Down)
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn error_response_round_trip() {
        let resp = Response::error(3, ErrorInfo::new(ErrorCode::ResolutionFailed, "no such alias"));
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("resolution_failed"));
    }
}

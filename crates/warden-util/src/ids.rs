//! Strongly-typed identifiers for wardend

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a terminal session reported by the session manager
///
/// For GNU screen this is `<pid>.<session name>`, e.g. `4242.survival-run`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Session name without the leading `<pid>.` prefix, if any
    pub fn name(&self) -> &str {
        match self.0.split_once('.') {
            Some((pid, name)) if !pid.is_empty() && pid.bytes().all(|b| b.is_ascii_digit()) => name,
            _ => &self.0,
        }
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Unique identifier for a connected IPC client
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_name_strips_pid() {
        assert_eq!(SessionId::new("4242.survival-run").name(), "survival-run");
        assert_eq!(SessionId::new("survival-run").name(), "survival-run");
        // Dots inside the name itself are kept
        assert_eq!(SessionId::new("17.map.v2-stop").name(), "map.v2-stop");
        assert_eq!(SessionId::new("v1.2-run").name(), "v1.2-run");
    }

    #[test]
    fn client_id_uniqueness() {
        assert_ne!(ClientId::new(), ClientId::new());
    }

    #[test]
    fn ids_serialize_deserialize() {
        let session = SessionId::new("1.creative-run");
        let json = serde_json::to_string(&session).unwrap();
        let parsed: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(session, parsed);
    }
}

//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// The managed game server
    pub server: RawServerConfig,

    /// How the server is controlled and probed
    pub control: RawControlConfig,

    /// Idle-shutdown watcher settings
    #[serde(default)]
    pub watch: RawWatchConfig,

    /// Service-level settings
    #[serde(default)]
    pub service: RawServiceConfig,
}

/// Server location and identity
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawServerConfig {
    /// Directory holding one subdirectory per server
    pub base_dir: PathBuf,

    /// Symlink under `base_dir` naming the active server (default: "current")
    pub alias: Option<String>,

    /// Address players connect to, `host[:port]`
    pub address: String,
}

/// Control script and probe settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawControlConfig {
    /// Control CLI invoked as `<script> run <name>` / `<script> stop <name> now`
    pub script: PathBuf,

    /// Session manager binary used to list sessions (default: "screen")
    pub session_manager: Option<String>,

    /// Liveness ping timeout in seconds (default: 5)
    pub ping_timeout_seconds: Option<u64>,
}

/// Watcher settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawWatchConfig {
    /// Seconds between ticks (default: 60)
    pub interval_seconds: Option<u64>,

    /// Consecutive idle/failed ticks before a forced stop (default: 3)
    pub max_attempts: Option<u32>,
}

/// Service-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawServiceConfig {
    /// IPC socket path
    pub socket_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
            config_version = 1

            [server]
            base_dir = "/opt/paper"
            alias = "current"
            address = "mc.example.org:25570"

            [control]
            script = "/opt/paper/pst.sh"
            session_manager = "/usr/bin/screen"
            ping_timeout_seconds = 3

            [watch]
            interval_seconds = 30
            max_attempts = 5

            [service]
            socket_path = "/tmp/warden.sock"
        "#;

        let config: RawConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.alias.as_deref(), Some("current"));
        assert_eq!(config.watch.max_attempts, Some(5));
        assert_eq!(config.control.ping_timeout_seconds, Some(3));
    }

    #[test]
    fn watch_and_service_sections_are_optional() {
        let toml_str = r#"
            config_version = 1

            [server]
            base_dir = "/opt/paper"
            address = "mc.example.org"

            [control]
            script = "/opt/paper/pst.sh"
        "#;

        let config: RawConfig = toml::from_str(toml_str).unwrap();
        assert!(config.watch.interval_seconds.is_none());
        assert!(config.service.socket_path.is_none());
    }
}

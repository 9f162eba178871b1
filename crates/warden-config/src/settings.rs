//! Validated configuration structures

use crate::schema::{RawConfig, RawControlConfig, RawServerConfig, RawServiceConfig, RawWatchConfig};
use std::path::PathBuf;
use std::time::Duration;

/// Alias used when the config does not name one
pub const DEFAULT_ALIAS: &str = "current";

/// Session manager used when the config does not name one
pub const DEFAULT_SESSION_MANAGER: &str = "screen";

const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_secs(60);
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Validated configuration, passed explicitly to every component
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub control: ControlConfig,
    pub watch: WatchConfig,
    pub service: ServiceConfig,
}

impl Config {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            server: ServerConfig::from_raw(raw.server),
            control: ControlConfig::from_raw(raw.control),
            watch: WatchConfig::from_raw(raw.watch),
            service: ServiceConfig::from_raw(raw.service),
        }
    }
}

/// Which server to manage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub base_dir: PathBuf,
    pub alias: String,
    pub address: String,
}

impl ServerConfig {
    fn from_raw(raw: RawServerConfig) -> Self {
        Self {
            base_dir: raw.base_dir,
            alias: raw.alias.unwrap_or_else(|| DEFAULT_ALIAS.to_string()),
            address: raw.address,
        }
    }
}

/// How the server is controlled and probed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlConfig {
    pub script: PathBuf,
    pub session_manager: String,
    pub ping_timeout: Duration,
}

impl ControlConfig {
    fn from_raw(raw: RawControlConfig) -> Self {
        Self {
            script: raw.script,
            session_manager: raw
                .session_manager
                .unwrap_or_else(|| DEFAULT_SESSION_MANAGER.to_string()),
            ping_timeout: raw
                .ping_timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_PING_TIMEOUT),
        }
    }
}

/// Idle-shutdown watcher settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl WatchConfig {
    fn from_raw(raw: RawWatchConfig) -> Self {
        Self {
            interval: raw
                .interval_seconds
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_WATCH_INTERVAL),
            max_attempts: raw.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_WATCH_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub socket_path: PathBuf,
}

impl ServiceConfig {
    fn from_raw(raw: RawServiceConfig) -> Self {
        Self {
            socket_path: raw
                .socket_path
                .unwrap_or_else(warden_util::socket_path_without_env),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            socket_path: warden_util::socket_path_without_env(),
        }
    }
}

//! Configuration parsing and validation for wardend
//!
//! Supports TOML configuration with:
//! - Versioned schema
//! - Server location, alias and network address
//! - Control script and probe settings
//! - Watcher interval and idle-shutdown threshold
//! - Validation with clear error messages

mod schema;
mod settings;
mod validation;

pub use schema::*;
pub use settings::*;
pub use validation::*;

use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<ValidationError> },

    #[error("Unsupported config version: {0}")]
    UnsupportedVersion(u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Load and validate configuration from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from a TOML string
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    let raw: RawConfig = toml::from_str(content)?;

    if raw.config_version != CURRENT_CONFIG_VERSION {
        return Err(ConfigError::UnsupportedVersion(raw.config_version));
    }

    let errors = validate_config(&raw);
    if !errors.is_empty() {
        return Err(ConfigError::ValidationFailed { errors });
    }

    Ok(Config::from_raw(raw))
}

/// Current supported config version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    const MINIMAL: &str = r#"
        config_version = 1

        [server]
        base_dir = "/opt/paper"
        address = "mc.example.org"

        [control]
        script = "/opt/paper/pst.sh"
    "#;

    #[test]
    fn parse_minimal_config_applies_defaults() {
        let config = parse_config(MINIMAL).unwrap();
        assert_eq!(config.server.alias, DEFAULT_ALIAS);
        assert_eq!(config.control.session_manager, DEFAULT_SESSION_MANAGER);
        assert_eq!(config.control.ping_timeout, Duration::from_secs(5));
        assert_eq!(config.watch.interval, Duration::from_secs(60));
        assert_eq!(config.watch.max_attempts, 3);
    }

    #[test]
    fn reject_wrong_version() {
        let config = MINIMAL.replace("config_version = 1", "config_version = 99");
        let result = parse_config(&config);
        assert!(matches!(result, Err(ConfigError::UnsupportedVersion(99))));
    }

    #[test]
    fn validation_errors_are_collected() {
        let config = format!("{MINIMAL}\n[watch]\nmax_attempts = 0\n");
        match parse_config(&config) {
            Err(ConfigError::ValidationFailed { errors }) => assert_eq!(errors.len(), 1),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server.base_dir, Path::new("/opt/paper"));
    }

    #[test]
    fn missing_file_is_read_error() {
        let result = load_config("/nonexistent/warden/config.toml");
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }
}

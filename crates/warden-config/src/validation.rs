//! Configuration validation

use crate::schema::RawConfig;
use std::path::Component;
use std::path::Path;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("[{section}] {field} cannot be empty")]
    EmptyField {
        section: &'static str,
        field: &'static str,
    },

    #[error("[server] alias '{0}' must be a single path component")]
    InvalidAlias(String),

    #[error("[server] invalid address '{value}': {message}")]
    InvalidAddress { value: String, message: String },

    #[error("[{section}] {field} must be greater than zero")]
    ZeroValue {
        section: &'static str,
        field: &'static str,
    },
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.server.base_dir.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyField {
            section: "server",
            field: "base_dir",
        });
    }

    if let Some(alias) = &config.server.alias {
        if alias.is_empty() {
            errors.push(ValidationError::EmptyField {
                section: "server",
                field: "alias",
            });
        } else if !is_single_component(alias) {
            errors.push(ValidationError::InvalidAlias(alias.clone()));
        }
    }

    if let Err(message) = warden_util::split_address(&config.server.address) {
        errors.push(ValidationError::InvalidAddress {
            value: config.server.address.clone(),
            message,
        });
    }

    if config.control.script.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyField {
            section: "control",
            field: "script",
        });
    }

    if config
        .control
        .session_manager
        .as_ref()
        .is_some_and(|s| s.trim().is_empty())
    {
        errors.push(ValidationError::EmptyField {
            section: "control",
            field: "session_manager",
        });
    }

    if config.control.ping_timeout_seconds == Some(0) {
        errors.push(ValidationError::ZeroValue {
            section: "control",
            field: "ping_timeout_seconds",
        });
    }

    if config.watch.interval_seconds == Some(0) {
        errors.push(ValidationError::ZeroValue {
            section: "watch",
            field: "interval_seconds",
        });
    }

    if config.watch.max_attempts == Some(0) {
        errors.push(ValidationError::ZeroValue {
            section: "watch",
            field: "max_attempts",
        });
    }

    errors
}

fn is_single_component(alias: &str) -> bool {
    let mut components = Path::new(alias).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(extra: &str) -> RawConfig {
        let base = r#"
            config_version = 1

            [server]
            base_dir = "/opt/paper"
            address = "mc.example.org"

            [control]
            script = "/opt/paper/pst.sh"
        "#;
        toml::from_str(&format!("{base}\n{extra}")).unwrap()
    }

    #[test]
    fn minimal_config_is_valid() {
        assert!(validate_config(&raw("")).is_empty());
    }

    #[test]
    fn alias_must_be_single_component() {
        let mut config = raw("");
        config.server.alias = Some("../elsewhere".into());
        let errors = validate_config(&config);
        assert!(matches!(errors.as_slice(), [ValidationError::InvalidAlias(_)]));

        config.server.alias = Some("nested/dir".into());
        assert_eq!(validate_config(&config).len(), 1);

        config.server.alias = Some("current".into());
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn zero_values_are_rejected_together() {
        let errors = validate_config(&raw(
            r#"
            [watch]
            interval_seconds = 0
            max_attempts = 0
            "#,
        ));
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| matches!(e, ValidationError::ZeroValue { section: "watch", .. })));
    }

    #[test]
    fn bad_address_is_reported() {
        let mut config = raw("");
        config.server.address = "mc.example.org:99999".into();
        let errors = validate_config(&config);
        assert!(matches!(errors.as_slice(), [ValidationError::InvalidAddress { .. }]));
    }

    #[test]
    fn empty_paths_are_reported() {
        let mut config = raw("");
        config.server.base_dir = "".into();
        config.control.script = "".into();
        assert_eq!(validate_config(&config).len(), 2);
    }
}

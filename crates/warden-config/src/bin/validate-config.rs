//! Config validation CLI tool
//!
//! Validates a wardend configuration file and prints the effective settings.

use std::path::PathBuf;
use std::process::ExitCode;
use warden_config::ConfigError;
use warden_util::default_config_path;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let config_path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let default_path = default_config_path();
            eprintln!("Usage: validate-config [config-file]");
            eprintln!();
            eprintln!("Validates a wardend configuration file.");
            eprintln!();
            eprintln!("Default location: {}", default_path.display());
            return ExitCode::from(2);
        }
    };

    if !config_path.exists() {
        eprintln!("Error: Configuration file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match warden_config::load_config(&config_path) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Server:");
            println!("  Base directory: {}", config.server.base_dir.display());
            println!("  Alias: {}", config.server.alias);
            println!("  Address: {}", config.server.address);
            println!("Control:");
            println!("  Script: {}", config.control.script.display());
            println!("  Session manager: {}", config.control.session_manager);
            println!("  Ping timeout: {}s", config.control.ping_timeout.as_secs());
            println!("Watch:");
            println!("  Interval: {}s", config.watch.interval.as_secs());
            println!("  Max idle attempts: {}", config.watch.max_attempts);
            println!("Socket: {}", config.service.socket_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver,
                        warden_config::CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}

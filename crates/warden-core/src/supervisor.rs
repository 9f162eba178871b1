//! Resolver, status engine and lifecycle bundled for one configured server

use std::sync::Arc;
use warden_config::Config;
use warden_host_api::HostAdapter;

use crate::{Lifecycle, Resolver, StatusEngine};

/// Everything needed to observe and control the configured server
///
/// Shared between the watch loop and front-end requests. Holds no mutable
/// state of its own.
pub struct Supervisor {
    pub resolver: Resolver,
    pub engine: StatusEngine,
    pub lifecycle: Lifecycle,
}

impl Supervisor {
    pub fn new(host: Arc<dyn HostAdapter>, config: &Config) -> Self {
        Self {
            resolver: Resolver::from_config(host.clone(), &config.server),
            engine: StatusEngine::new(host.clone()),
            lifecycle: Lifecycle::new(host, &config.control.script),
        }
    }
}

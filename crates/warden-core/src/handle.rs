//! Resolved server identity

use std::fmt;
use std::path::PathBuf;

/// A concrete server, produced fresh by every resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerHandle {
    pub base: PathBuf,
    pub name: String,
    pub address: String,
}

impl ServerHandle {
    pub fn new(base: impl Into<PathBuf>, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            name: name.into(),
            address: address.into(),
        }
    }

    /// Directory holding this server's files
    pub fn dir(&self) -> PathBuf {
        self.base.join(&self.name)
    }

    /// Session tag of the launch session
    pub fn run_tag(&self) -> String {
        format!("{}-run", self.name)
    }

    /// Session tag of the termination session
    pub fn stop_tag(&self) -> String {
        format!("{}-stop", self.name)
    }
}

impl fmt::Display for ServerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

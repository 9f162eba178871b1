//! Core error types

use std::fmt;
use thiserror::Error;
use warden_host_api::HostError;

/// The alias could not be mapped to a concrete server
#[derive(Debug, Error)]
#[error("cannot resolve server alias '{alias}': {source}")]
pub struct ResolutionFailed {
    pub alias: String,
    #[source]
    pub source: HostError,
}

/// Which probe of the status inference failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    StoppingSessions,
    RunningSessions,
    Marker,
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Probe::StoppingSessions => f.write_str("termination session probe"),
            Probe::RunningSessions => f.write_str("launch session probe"),
            Probe::Marker => f.write_str("maintenance marker probe"),
        }
    }
}

/// A probe could not determine its answer
#[derive(Debug, Error)]
#[error("{probe} failed: {source}")]
pub struct ProbeFailed {
    pub probe: Probe,
    #[source]
    pub source: HostError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Start,
    Stop,
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlAction::Start => f.write_str("start"),
            ControlAction::Stop => f.write_str("stop"),
        }
    }
}

/// The control script did not exit successfully
#[derive(Debug, Error)]
#[error("cannot {action} server '{server}': {source}")]
pub struct ControlFailed {
    pub action: ControlAction,
    pub server: String,
    #[source]
    pub source: HostError,
}

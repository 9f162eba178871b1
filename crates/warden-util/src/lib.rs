//! Shared utilities for wardend
//!
//! This crate provides:
//! - Game server address parsing
//! - ID types (SessionId, ClientId)
//! - Wall-clock helpers for event timestamps
//! - Default paths for the config file and control socket

mod address;
mod ids;
mod paths;
mod time;

pub use address::*;
pub use ids::*;
pub use paths::*;
pub use time::*;

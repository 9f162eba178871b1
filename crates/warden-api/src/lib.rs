//! Protocol types for wardend IPC
//!
//! This crate defines the stable API between wardend and its front ends:
//! - Server status tags and liveness snapshots
//! - Commands (requests from clients)
//! - Responses
//! - Events (service -> clients)
//! - Versioning

mod commands;
mod events;
mod types;

pub use commands::*;
pub use events::*;
pub use types::*;

/// Current API version
pub const API_VERSION: u32 = 1;

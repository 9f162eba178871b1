//! Linux host adapter for wardend
//!
//! Provides:
//! - External command execution with captured output
//! - GNU screen session listing
//! - Maintenance marker checks on the filesystem
//! - Minecraft Server List Ping over TCP

mod adapter;
mod marker;
mod ping;
mod process;
mod screen;

pub use adapter::*;
pub use marker::*;
pub use ping::*;
pub use process::*;
pub use screen::*;

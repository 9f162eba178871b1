//! Host adapter trait interfaces for wardend
//!
//! This crate defines the capability-based interface between the core and
//! platform-specific implementations. It contains no platform code itself.

mod mock;
mod traits;

pub use mock::*;
pub use traits::*;

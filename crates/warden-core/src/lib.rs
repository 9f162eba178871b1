//! Server state inference and supervision for wardend
//!
//! This crate is the heart of wardend, containing:
//! - Alias resolution (`current` -> concrete server directory)
//! - Status inference (Stopping > Starting/Up > Locked > Down, Undefined on probe failure)
//! - Lifecycle control through the external control script
//! - The idle-shutdown watch loop

mod error;
mod events;
mod handle;
mod lifecycle;
mod resolver;
mod status;
mod supervisor;
mod watch;

pub use error::*;
pub use events::*;
pub use handle::*;
pub use lifecycle::*;
pub use resolver::*;
pub use status::*;
pub use supervisor::*;
pub use watch::*;

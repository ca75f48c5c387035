//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerConfig (host, port)
//!     → listener.rs (bind, fatal on failure)
//!     → ListenerState: Unbound → Bound(addr)
//!     → Hand off to HTTP layer
//! ```

pub mod listener;

pub use listener::{Listener, ListenerError, ListenerState, ListenerStatus};

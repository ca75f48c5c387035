//! Database connectivity subsystem.
//!
//! # Data Flow
//! ```text
//! startup
//!     → connection.rs spawns the single attempt (non-blocking)
//!     → connector.rs parses the target, builds the client, pings
//!     → state published on a watch channel (Connecting → Connected | Failed)
//!
//! request handlers
//!     → RouteRequest::database()
//!     → ConnectionManager::database() (503 when not connected)
//! ```
//!
//! # Design Decisions
//! - Connection failure is reported, never fatal
//! - No retry: one attempt per process lifetime
//! - The driver pools internally; the core shares the handle by clone

pub mod connection;
pub mod connector;

pub use connection::{ConnectionManager, ConnectionState};
pub use connector::{redact_target, Connector, DatabaseTarget, DbError, MongoConnector};

//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     RouteGroup[] in mount order
//!     → group.rs (RouteTable: method, pattern, handler)
//!     → matcher.rs (compile patterns)
//!     → router.rs (freeze as immutable Dispatcher)
//!
//! Incoming Request (method, path, parsed payload)
//!     → router.rs (groups in mount order, entries in declaration order)
//!     → handler.rs (RouteRequest handed to the matched handler)
//!     → Response, or 404 when nothing matched
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by mount order)

pub mod group;
pub mod handler;
pub mod matcher;
pub mod router;

pub use group::{RouteEntry, RouteGroup, RouteTable, TableGroup};
pub use handler::{BoxedHandler, Handler, RouteRequest};
pub use matcher::{MethodMatcher, PathParams, PathPattern, PatternError};
pub use router::{Dispatcher, DispatcherBuilder, RouteMatch, RoutingError};

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request pipeline and DB connection manager emit:
//!     → logging.rs  (subscriber: EnvFilter + pretty or JSON output)
//!     → metrics.rs  (request counter/histogram, database_connected gauge)
//!     → tracing.rs  (one span per request, tagged with x-request-id)
//! ```
//!
//! Log output goes to stdout. The Prometheus exporter is off unless
//! `observability.metrics_enabled` is set.

pub mod logging;
pub mod metrics;
pub mod tracing;

pub use self::logging::init as init_logging;
pub use self::metrics::init_metrics;

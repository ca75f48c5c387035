//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → environment overrides: PORT, MONGODB_URL, MONGODB_DB, LOG_LEVEL, LOG_FORMAT
//!     → CLI flags (main.rs)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable, passed explicitly at startup)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults except the database secret
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, load_from_env, ConfigError};
pub use schema::{
    BodyConfig, DatabaseConfig, ListenerConfig, LogFormat, ObservabilityConfig, ServerConfig,
    TimeoutConfig,
};
pub use validation::ValidationError;

//! Storefront HTTP server library

pub mod config;
pub mod db;
pub mod error;
pub mod groups;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;

pub use config::schema::ServerConfig;
pub use error::ApiError;
pub use http::HttpServer;
pub use lifecycle::{start, RunningServer, Shutdown, StartupError};

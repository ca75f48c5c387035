//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_PORT: &str = "PORT";
pub const ENV_MONGODB_URL: &str = "MONGODB_URL";
pub const ENV_MONGODB_DB: &str = "MONGODB_DB";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {reason}")]
    Env { var: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file into a configuration without validating it.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServerConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` abstracts the environment so callers can supply a fixed map.
/// Empty values are treated as unset.
pub fn apply_env_overrides<F>(config: &mut ServerConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

    if let Some(port) = get(ENV_PORT) {
        config.listener.port = port.trim().parse().map_err(|e| ConfigError::Env {
            var: ENV_PORT,
            reason: format!("'{}' is not a valid TCP port ({})", port, e),
        })?;
    }

    if let Some(url) = get(ENV_MONGODB_URL) {
        config.database.url = Some(url);
    }

    if let Some(name) = get(ENV_MONGODB_DB) {
        config.database.name = name;
    }

    if let Some(level) = get(ENV_LOG_LEVEL) {
        config.observability.log_level = level;
    }

    if let Some(format) = get(ENV_LOG_FORMAT) {
        config.observability.log_format = format
            .parse()
            .map_err(|reason| ConfigError::Env { var: ENV_LOG_FORMAT, reason })?;
    }

    Ok(())
}

/// Build the effective configuration: defaults, then the optional file,
/// then environment overrides, then validation.
pub fn load<F>(path: Option<&Path>, lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    apply_env_overrides(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// [`load`] against the process environment.
pub fn load_from_env(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    load(path, |var| std::env::var(var).ok())
}

//! Shared utilities for integration and load testing.
#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use mongodb::Database;
use storefront_server::config::{load, ServerConfig};
use storefront_server::db::{Connector, DatabaseTarget, DbError};
use storefront_server::groups::default_groups;
use storefront_server::lifecycle::{start, RunningServer, Shutdown};

/// Connects to nothing; the attempt fails straight away.
pub struct RefusingConnector;

impl Connector for RefusingConnector {
    async fn connect(&self, target: &DatabaseTarget) -> Result<Database, DbError> {
        Err(DbError::InvalidTarget(format!("refused {}", target.redacted())))
    }
}

/// The attempt never finishes.
pub struct StalledConnector;

impl Connector for StalledConnector {
    async fn connect(&self, _target: &DatabaseTarget) -> Result<Database, DbError> {
        std::future::pending().await
    }
}

/// Build a config from a fixed environment.
pub fn config_from(env: &[(&str, &str)]) -> ServerConfig {
    let env: HashMap<String, String> = env
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let mut config = load(None, |var| env.get(var).cloned()).unwrap();
    config.listener.host = "127.0.0.1".into();
    config
}

/// Loopback config on an ephemeral port with an unusable database URL.
pub fn test_config() -> ServerConfig {
    config_from(&[("PORT", "0"), ("MONGODB_URL", "not-a-mongodb-url")])
}

/// A port that was free a moment ago.
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

pub async fn start_server<C: Connector>(
    config: ServerConfig,
    connector: C,
) -> (RunningServer, Shutdown) {
    let shutdown = Shutdown::new();
    let server = start(config, default_groups(), connector, &shutdown)
        .await
        .expect("server should start");
    (server, shutdown)
}

pub fn url(server: &RunningServer, path: &str) -> String {
    format!("http://{}{}", server.local_addr(), path)
}

/// Non-pooled client so shutdown tests see fresh connections.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

/// Poll `f` until it returns true or a few seconds pass.
pub async fn eventually<F, Fut>(mut f: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..50 {
        if f().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    false
}

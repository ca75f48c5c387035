//! Startup orchestration.
//!
//! # Responsibilities
//! - Begin the database connection without waiting on it
//! - Mount route groups in order
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Mount and bind errors are fatal; database errors never are
//! - Subsystems initialize in order, not concurrently
//! - The "connected at port" line is logged only after a successful bind

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::db::{ConnectionManager, Connector, DatabaseTarget};
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::net::{Listener, ListenerError, ListenerState, ListenerStatus};
use crate::routing::{Dispatcher, RouteGroup, RoutingError};

/// Fatal startup and serving errors.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no database URL configured")]
    MissingDatabaseUrl,

    #[error("route mount failed: {0}")]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A server that has bound its port and is accepting traffic.
pub struct RunningServer {
    local_addr: SocketAddr,
    listener: ListenerStatus,
    database: Arc<ConnectionManager>,
    dispatcher: Arc<Dispatcher>,
    task: JoinHandle<std::io::Result<()>>,
}

impl RunningServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn listener_state(&self) -> ListenerState {
        self.listener.state()
    }

    pub fn subscribe_listener(&self) -> watch::Receiver<ListenerState> {
        self.listener.subscribe()
    }

    /// The process-wide connection manager.
    pub fn database(&self) -> &Arc<ConnectionManager> {
        &self.database
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Wait for the server to stop after a shutdown trigger.
    pub async fn wait(self) -> Result<(), StartupError> {
        self.task.await??;
        Ok(())
    }
}

impl std::fmt::Debug for RunningServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunningServer")
            .field("local_addr", &self.local_addr)
            .field("database", &self.database)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

/// Bring the server up.
///
/// Returns once the listener is bound. The database attempt keeps running
/// in the background and its outcome never affects the result.
pub async fn start<C: Connector>(
    config: ServerConfig,
    groups: Vec<Box<dyn RouteGroup>>,
    connector: C,
    shutdown: &Shutdown,
) -> Result<RunningServer, StartupError> {
    let target = DatabaseTarget::from_config(&config.database).ok_or(StartupError::MissingDatabaseUrl)?;
    let database = ConnectionManager::start(connector, target);

    let dispatcher = Arc::new(Dispatcher::builder().mount_all(groups).build()?);
    tracing::info!(
        groups = ?dispatcher.group_names(),
        routes = dispatcher.route_count(),
        "Routes mounted"
    );

    let listener_status = ListenerStatus::new();
    let listener = Listener::bind(&config.listener).await?;
    let local_addr = listener.local_addr();
    listener_status.mark_bound(local_addr);
    tracing::info!(port = local_addr.port(), "connected at port {}", local_addr.port());

    let server = HttpServer::new(config, dispatcher.clone(), database.clone());
    let task = tokio::spawn(server.run(
        listener.into_inner(),
        shutdown.subscribe(),
        shutdown.subscribe(),
    ));

    Ok(RunningServer {
        local_addr,
        listener: listener_status,
        database,
        dispatcher,
        task,
    })
}

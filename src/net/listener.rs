//! TCP listener binding.
//!
//! # Responsibilities
//! - Bind to the configured host and port
//! - Publish the one-way `Unbound → Bound` transition
//!
//! # Design Decisions
//! - Bind failure is returned to the caller, which treats it as fatal
//! - No fallback port negotiation

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Process-wide listener state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Unbound,
    Bound(SocketAddr),
}

impl ListenerState {
    pub fn is_bound(&self) -> bool {
        matches!(self, ListenerState::Bound(_))
    }
}

/// A bound TCP listener.
pub struct Listener {
    inner: TcpListener,
    local_addr: SocketAddr,
}

impl Listener {
    /// Bind to the configured address.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ListenerError> {
        let address = config.bind_address();
        let bind_error = |source| ListenerError::Bind {
            address: address.clone(),
            source,
        };

        let inner = TcpListener::bind(&address).await.map_err(bind_error)?;
        let local_addr = inner.local_addr().map_err(bind_error)?;

        tracing::info!(address = %local_addr, "Listener bound");

        Ok(Self { inner, local_addr })
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn into_inner(self) -> TcpListener {
        self.inner
    }
}

/// Tracks the listener state for observers.
#[derive(Debug)]
pub struct ListenerStatus {
    tx: watch::Sender<ListenerState>,
}

impl ListenerStatus {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ListenerState::Unbound);
        Self { tx }
    }

    /// Record the bind. Later calls are ignored.
    pub fn mark_bound(&self, addr: SocketAddr) {
        self.tx.send_if_modified(|state| {
            if state.is_bound() {
                return false;
            }
            *state = ListenerState::Bound(addr);
            true
        });
    }

    pub fn state(&self) -> ListenerState {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListenerState> {
        self.tx.subscribe()
    }
}

impl Default for ListenerStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback(port: u16) -> ListenerConfig {
        ListenerConfig {
            host: "127.0.0.1".into(),
            port,
        }
    }

    #[tokio::test]
    async fn test_bind_ephemeral() {
        let listener = Listener::bind(&loopback(0)).await.unwrap();
        assert_ne!(listener.local_addr().port(), 0);
    }

    #[tokio::test]
    async fn test_port_in_use() {
        let first = Listener::bind(&loopback(0)).await.unwrap();
        let taken = first.local_addr().port();

        let err = Listener::bind(&loopback(taken)).await.err().unwrap();
        assert!(matches!(err, ListenerError::Bind { .. }));
        assert!(err.to_string().contains(&taken.to_string()));
    }

    #[test]
    fn test_status_transitions_once() {
        let status = ListenerStatus::new();
        assert_eq!(status.state(), ListenerState::Unbound);

        let a: SocketAddr = "127.0.0.1:1000".parse().unwrap();
        let b: SocketAddr = "127.0.0.1:2000".parse().unwrap();
        status.mark_bound(a);
        status.mark_bound(b);
        assert_eq!(status.state(), ListenerState::Bound(a));
    }
}

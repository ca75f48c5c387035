//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router: core `GET /` plus the route-group dispatcher
//! - Wire up middleware (request ID, tracing, panic boundary, timeout,
//!   metrics, JSON body parsing)
//! - Serve on a bound listener until shutdown, draining in-flight requests

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::db::ConnectionManager;
use crate::http::body::{parse_json_body, read_body};
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::http::response::handle_panic;
use crate::observability::{metrics, tracing::make_request_span};
use crate::routing::{Dispatcher, RouteRequest};

/// Body of `GET /`.
pub const GREETING: &str = "Hello from storefront-server!";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub database: Arc<ConnectionManager>,
    pub body_limit: usize,
}

/// HTTP server for the storefront.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server. Route groups must already be mounted.
    pub fn new(
        config: ServerConfig,
        dispatcher: Arc<Dispatcher>,
        database: Arc<ConnectionManager>,
    ) -> Self {
        let state = AppState {
            dispatcher,
            database,
            body_limit: config.body.limit_bytes,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers run outermost first: request ID, trace span, request ID
    /// propagation, metrics, panic boundary, timeout, body parser.
    /// Metrics sit outside the panic boundary and the timeout so their 500s
    /// and 408s are counted.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let body_config = Arc::new(config.body.clone());

        Router::new()
            .route("/", get(greeting).fallback(dispatch))
            .fallback(dispatch)
            .with_state(state)
            .layer(middleware::from_fn_with_state(body_config, parse_json_body))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(middleware::from_fn(metrics::track_requests))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// The assembled router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on an already bound listener until `shutdown` fires.
    ///
    /// In-flight requests get `timeouts.shutdown_grace_secs` to finish,
    /// counted from when `deadline` fires. Both receivers must be
    /// subscribed before the signal is sent.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
        mut deadline: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let grace = Duration::from_secs(self.config.timeouts.shutdown_grace_secs);

        let serve = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .into_future();

        tokio::select! {
            result = serve => result?,
            _ = async {
                let _ = deadline.recv().await;
                tokio::time::sleep(grace).await;
            } => {
                tracing::warn!(grace_secs = grace.as_secs(), "Drain deadline passed, closing remaining connections");
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

async fn greeting() -> &'static str {
    GREETING
}

/// Hand everything except the core routes to the route groups.
async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match read_body(body, &parts.headers, state.body_limit).await {
        Ok(bytes) => bytes,
        Err(e) => return e.into_response(),
    };

    let request = RouteRequest::new(parts, bytes).with_database(state.database.clone());
    state.dispatcher.dispatch(request).await
}

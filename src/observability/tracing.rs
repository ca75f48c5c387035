//! Request spans.
//!
//! Every request gets one `http_request` span carrying the method, URI and
//! request ID, so log lines emitted by handlers can be correlated.

use axum::{body::Body, http::Request};
use tracing::Span;

use crate::http::request::RequestIdExt;

/// Span builder for `tower_http::trace::TraceLayer`.
pub fn make_request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request.request_id().unwrap_or("unknown"),
    )
}

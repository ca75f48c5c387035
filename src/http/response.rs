//! Response helpers shared by the core.
//!
//! # Responsibilities
//! - Map handler panics to a 500 with the standard error body
//!
//! # Design Decisions
//! - Panic payloads are logged, never sent to the client

use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::error::ApiError;

/// Panic handler for `CatchPanicLayer::custom`.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(panic = %detail, "Request handler panicked");

    ApiError::Internal("internal server error".to_string()).into_response()
}

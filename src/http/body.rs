//! JSON body parsing middleware.
//!
//! # Responsibilities
//! - Recognise JSON content types (`application/json`, `application/*+json`)
//! - Deserialize JSON bodies into a [`JsonPayload`] request extension
//! - Reject malformed, oversized or non-UTF-8 JSON before any route runs
//!
//! # Design Decisions
//! - Empty bodies and non-JSON bodies yield an empty object, never an error
//! - The raw bytes are put back into the request for handlers that want them
//! - Large bodies are parsed on the blocking pool to keep the event loop free

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};

use crate::config::BodyConfig;
use crate::error::ApiError;

/// Parsed request payload, attached to every request that passes the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPayload(pub Value);

impl Default for JsonPayload {
    fn default() -> Self {
        Self(empty_payload())
    }
}

/// The value handlers see when there is nothing to parse.
pub fn empty_payload() -> Value {
    Value::Object(Map::new())
}

/// Whether the request declares a JSON body.
///
/// Errors with 415 when a JSON type names a charset other than UTF-8.
pub fn is_json_content(headers: &HeaderMap) -> Result<bool, ApiError> {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return Ok(false);
    };

    let mut params = content_type.split(';');
    let essence = params.next().unwrap_or_default().trim().to_ascii_lowercase();
    let is_json = essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"));
    if !is_json {
        return Ok(false);
    }

    for param in params {
        let Some((name, value)) = param.split_once('=') else {
            continue;
        };
        if !name.trim().eq_ignore_ascii_case("charset") {
            continue;
        }
        let charset = value.trim().trim_matches('"').to_ascii_lowercase();
        if charset != "utf-8" && charset != "utf8" {
            return Err(ApiError::UnsupportedMediaType(format!(
                "unsupported charset \"{}\"",
                charset
            )));
        }
    }

    Ok(true)
}

/// Parse a JSON body. Blank bodies produce an empty object.
pub fn parse_payload(bytes: &[u8], strict: bool) -> Result<Value, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(empty_payload());
    }

    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| ApiError::BadRequest(format!("malformed JSON body: {}", e)))?;

    if strict && !(value.is_object() || value.is_array()) {
        return Err(ApiError::BadRequest(
            "JSON body must be an object or array".to_string(),
        ));
    }

    Ok(value)
}

/// Buffer a body, enforcing `limit`.
pub async fn read_body(body: Body, headers: &HeaderMap, limit: usize) -> Result<Bytes, ApiError> {
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared.is_some_and(|len| len > limit) {
        return Err(ApiError::PayloadTooLarge { limit });
    }

    // Reads fail on the limit or on a vanished client; the latter never
    // sees the status.
    axum::body::to_bytes(body, limit)
        .await
        .map_err(|_| ApiError::PayloadTooLarge { limit })
}

/// Middleware entry point, installed with `from_fn_with_state`.
pub async fn parse_json_body(
    State(config): State<Arc<BodyConfig>>,
    request: Request,
    next: Next,
) -> Response {
    match prepare(&config, request).await {
        Ok(request) => next.run(request).await,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected request body");
            e.into_response()
        }
    }
}

async fn prepare(config: &BodyConfig, mut request: Request) -> Result<Request, ApiError> {
    if !is_json_content(request.headers())? {
        request.extensions_mut().insert(JsonPayload::default());
        return Ok(request);
    }

    let (mut parts, body) = request.into_parts();
    let bytes = read_body(body, &parts.headers, config.limit_bytes).await?;

    let payload = if bytes.len() > config.offload_threshold_bytes {
        let raw = bytes.clone();
        let strict = config.strict;
        tokio::task::spawn_blocking(move || parse_payload(&raw, strict))
            .await
            .map_err(|e| ApiError::Internal(format!("body parser task failed: {}", e)))??
    } else {
        parse_payload(&bytes, config.strict)?
    };

    parts.extensions.insert(JsonPayload(payload));
    Ok(Request::from_parts(parts, Body::from(bytes)))
}

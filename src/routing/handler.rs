//! Handler abstraction and the request view handed to route groups.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use axum::{
    body::Bytes,
    http::{request::Parts, Extensions, HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;
use mongodb::Database;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::db::{ConnectionManager, ConnectionState};
use crate::error::ApiError;
use crate::http::body::{empty_payload, JsonPayload};
use crate::http::request::RequestIdExt;
use crate::routing::matcher::PathParams;

/// A request as seen by route-group handlers.
///
/// The body has already been through the JSON parser, so `payload()` is
/// always a valid value (`{}` when there was nothing to parse).
pub struct RouteRequest {
    parts: Parts,
    body: Bytes,
    payload: Value,
    params: PathParams,
    database: Option<Arc<ConnectionManager>>,
}

impl RouteRequest {
    pub fn new(mut parts: Parts, body: Bytes) -> Self {
        let payload = parts
            .extensions
            .remove::<JsonPayload>()
            .map(|p| p.0)
            .unwrap_or_else(empty_payload);

        Self {
            parts,
            body,
            payload,
            params: PathParams::default(),
            database: None,
        }
    }

    /// Attach the process-wide connection manager.
    pub fn with_database(mut self, database: Arc<ConnectionManager>) -> Self {
        self.database = Some(database);
        self
    }

    pub(crate) fn set_params(&mut self, params: PathParams) {
        self.params = params;
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    pub fn extensions(&self) -> &Extensions {
        &self.parts.extensions
    }

    pub fn request_id(&self) -> Option<&str> {
        self.parts.headers.request_id()
    }

    /// Raw body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Parsed JSON payload.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Deserialize the payload into `T`, answering 400 on mismatch.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        T::deserialize(&self.payload)
            .map_err(|e| ApiError::BadRequest(format!("invalid request body: {}", e)))
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    pub fn params(&self) -> &PathParams {
        &self.params
    }

    /// Query string as a map. Repeated keys keep the last value.
    pub fn query(&self) -> HashMap<String, String> {
        self.parts
            .uri
            .query()
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default()
    }

    /// Database connection state, if a manager is attached.
    pub fn connection_state(&self) -> Option<ConnectionState> {
        self.database.as_ref().map(|db| db.state())
    }

    /// Shared database handle; 503 while connecting, after failure, or when
    /// no database is attached.
    pub fn database(&self) -> Result<Database, ApiError> {
        let manager = self
            .database
            .as_ref()
            .ok_or_else(|| ApiError::DatabaseUnavailable("not configured".to_string()))?;
        manager
            .database()
            .map_err(|e| ApiError::DatabaseUnavailable(e.to_string()))
    }
}

/// Something that can answer a [`RouteRequest`].
///
/// Implemented for every `async fn(RouteRequest) -> impl IntoResponse`.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, request: RouteRequest) -> BoxFuture<'static, Response>;
}

impl<F, Fut, R> Handler for F
where
    F: Fn(RouteRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn call(&self, request: RouteRequest) -> BoxFuture<'static, Response> {
        let future = (self)(request);
        Box::pin(async move { future.await.into_response() })
    }
}

pub type BoxedHandler = Arc<dyn Handler>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde::Deserialize;
    use serde_json::json;

    fn request(uri: &str, payload: Option<Value>) -> RouteRequest {
        let mut req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        if let Some(p) = payload {
            req.extensions_mut().insert(JsonPayload(p));
        }
        let (parts, _) = req.into_parts();
        RouteRequest::new(parts, Bytes::new())
    }

    #[test]
    fn test_payload_defaults_to_empty_object() {
        assert_eq!(request("/", None).payload(), &json!({}));
    }

    #[test]
    fn test_typed_payload() {
        #[derive(Deserialize)]
        struct Signin {
            email: String,
        }

        let req = request("/", Some(json!({ "email": "a@b.c", "password": "x" })));
        let signin: Signin = req.json().unwrap();
        assert_eq!(signin.email, "a@b.c");

        let bad = request("/", Some(json!({ "email": 7 })));
        assert!(matches!(bad.json::<Signin>(), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_query() {
        let req = request("/api/products?category=Mobiles&q=a+b", None);
        let query = req.query();
        assert_eq!(query.get("category").map(String::as_str), Some("Mobiles"));
        assert_eq!(query.get("q").map(String::as_str), Some("a b"));
    }

    #[test]
    fn test_database_without_manager() {
        let err = request("/", None).database().unwrap_err();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_closure_handler() {
        let handler: BoxedHandler = Arc::new(|req: RouteRequest| async move {
            format!("path={}", req.path())
        });
        let response = handler.call(request("/x", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

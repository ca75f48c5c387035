//! Route composition and dispatch.
//!
//! # Responsibilities
//! - Mount route groups in a fixed order and compile their patterns
//! - Look up the handler for a request
//! - Answer 404 when nothing matches
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc without locks)
//! - Groups evaluated in mount order, entries in declaration order
//! - First match wins; overlap across groups is not an error
//! - Explicit NoMatch rather than silent default

use std::collections::HashMap;

use axum::{
    http::Method,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::error::ApiError;
use crate::routing::group::RouteGroup;
use crate::routing::handler::{BoxedHandler, RouteRequest};
use crate::routing::matcher::{MethodMatcher, PathParams, PathPattern, PatternError};

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("route group '{group}': invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        group: String,
        pattern: String,
        #[source]
        source: PatternError,
    },
}

struct CompiledRoute {
    method: MethodMatcher,
    pattern: PathPattern,
    handler: BoxedHandler,
}

struct MountedGroup {
    name: String,
    routes: Vec<CompiledRoute>,
}

/// Result of a successful lookup.
pub struct RouteMatch<'a> {
    pub group: &'a str,
    pub pattern: &'a str,
    pub handler: &'a BoxedHandler,
    pub params: PathParams,
}

/// Collects route groups in mount order.
#[derive(Default)]
pub struct DispatcherBuilder {
    groups: Vec<Box<dyn RouteGroup>>,
}

impl DispatcherBuilder {
    pub fn mount<G: RouteGroup + 'static>(self, group: G) -> Self {
        self.mount_boxed(Box::new(group))
    }

    pub fn mount_boxed(mut self, group: Box<dyn RouteGroup>) -> Self {
        self.groups.push(group);
        self
    }

    pub fn mount_all(self, groups: impl IntoIterator<Item = Box<dyn RouteGroup>>) -> Self {
        groups.into_iter().fold(self, DispatcherBuilder::mount_boxed)
    }

    /// Compile every group. Any invalid pattern aborts the build.
    pub fn build(self) -> Result<Dispatcher, RoutingError> {
        let mut first_owner: HashMap<(String, String), String> = HashMap::new();
        let mut mounted = Vec::with_capacity(self.groups.len());

        for group in &self.groups {
            let name = group.name().to_string();
            let mut routes = Vec::new();

            for entry in group.routes().into_entries() {
                let pattern =
                    PathPattern::parse(&entry.pattern).map_err(|source| RoutingError::InvalidPattern {
                        group: name.clone(),
                        pattern: entry.pattern.clone(),
                        source,
                    })?;

                let key = (entry.method.to_string(), entry.pattern.clone());
                match first_owner.get(&key) {
                    Some(owner) if *owner != name => {
                        tracing::debug!(
                            group = %name,
                            shadowed_by = %owner,
                            method = %entry.method,
                            pattern = %entry.pattern,
                            "Route shadowed by earlier group"
                        );
                    }
                    Some(_) => {}
                    None => {
                        first_owner.insert(key, name.clone());
                    }
                }

                routes.push(CompiledRoute {
                    method: entry.method,
                    pattern,
                    handler: entry.handler,
                });
            }

            tracing::info!(group = %name, routes = routes.len(), "Route group mounted");
            mounted.push(MountedGroup { name, routes });
        }

        Ok(Dispatcher { groups: mounted })
    }
}

/// The global dispatch table.
pub struct Dispatcher {
    groups: Vec<MountedGroup>,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Find the first entry matching `method` and `path`.
    pub fn find(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        self.groups.iter().find_map(|group| {
            group.routes.iter().find_map(|route| {
                if !route.method.matches(method) {
                    return None;
                }
                route.pattern.matches(path).map(|params| RouteMatch {
                    group: &group.name,
                    pattern: route.pattern.as_str(),
                    handler: &route.handler,
                    params,
                })
            })
        })
    }

    /// Run the matching handler, or answer 404.
    pub async fn dispatch(&self, mut request: RouteRequest) -> Response {
        let path = request.path().to_string();
        let method = request.method().clone();

        let Some(route) = self.find(&method, &path) else {
            tracing::debug!(method = %method, path = %path, "No route matched");
            return ApiError::NotFound(format!("Cannot {} {}", method, path)).into_response();
        };

        tracing::debug!(
            group = %route.group,
            pattern = %route.pattern,
            "Dispatching request"
        );

        request.set_params(route.params);
        route.handler.call(request).await
    }

    /// Mounted group names, in mount order.
    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    pub fn route_count(&self) -> usize {
        self.groups.iter().map(|g| g.routes.len()).sum()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("groups", &self.group_names())
            .field("routes", &self.route_count())
            .finish()
    }
}

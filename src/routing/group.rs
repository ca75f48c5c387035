//! Route groups: independently authored bundles of handlers.

use std::sync::Arc;

use axum::http::Method;

use crate::routing::handler::{BoxedHandler, Handler};
use crate::routing::matcher::MethodMatcher;

/// A bundle of (method, path pattern, handler) entries mounted as one unit.
///
/// Groups know nothing about each other; the dispatcher decides precedence
/// by mount order.
pub trait RouteGroup: Send + Sync {
    /// Identifier used in logs and mount errors.
    fn name(&self) -> &str;

    /// The group's entries, in declaration order.
    fn routes(&self) -> RouteTable;
}

/// One declared route, not yet compiled.
#[derive(Clone)]
pub struct RouteEntry {
    pub(crate) method: MethodMatcher,
    pub(crate) pattern: String,
    pub(crate) handler: BoxedHandler,
}

impl std::fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEntry")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// Ordered route declarations.
#[derive(Clone, Default, Debug)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn push<H: Handler>(mut self, method: MethodMatcher, pattern: &str, handler: H) -> Self {
        self.entries.push(RouteEntry {
            method,
            pattern: pattern.to_string(),
            handler: Arc::new(handler),
        });
        self
    }

    pub fn route<H: Handler>(self, method: Method, pattern: &str, handler: H) -> Self {
        self.push(MethodMatcher::Exact(method), pattern, handler)
    }

    pub fn get<H: Handler>(self, pattern: &str, handler: H) -> Self {
        self.route(Method::GET, pattern, handler)
    }

    pub fn post<H: Handler>(self, pattern: &str, handler: H) -> Self {
        self.route(Method::POST, pattern, handler)
    }

    pub fn put<H: Handler>(self, pattern: &str, handler: H) -> Self {
        self.route(Method::PUT, pattern, handler)
    }

    pub fn patch<H: Handler>(self, pattern: &str, handler: H) -> Self {
        self.route(Method::PATCH, pattern, handler)
    }

    pub fn delete<H: Handler>(self, pattern: &str, handler: H) -> Self {
        self.route(Method::DELETE, pattern, handler)
    }

    /// Match every method.
    pub fn any<H: Handler>(self, pattern: &str, handler: H) -> Self {
        self.push(MethodMatcher::Any, pattern, handler)
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<RouteEntry> {
        self.entries
    }
}

/// A group made from a fixed table, for ad-hoc composition.
pub struct TableGroup {
    name: String,
    table: RouteTable,
}

impl TableGroup {
    pub fn new(name: impl Into<String>, table: RouteTable) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }
}

impl RouteGroup for TableGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn routes(&self) -> RouteTable {
        self.table.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::handler::RouteRequest;

    async fn noop(_req: RouteRequest) -> &'static str {
        "ok"
    }

    #[test]
    fn test_declaration_order_kept() {
        let table = RouteTable::new()
            .get("/a", noop)
            .post("/b", noop)
            .any("/c", noop);

        let patterns: Vec<&str> = table.entries().iter().map(|e| e.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["/a", "/b", "/c"]);
        assert_eq!(table.entries()[1].method, MethodMatcher::Exact(Method::POST));
        assert_eq!(table.entries()[2].method, MethodMatcher::Any);
    }

    #[test]
    fn test_table_group() {
        let group = TableGroup::new("misc", RouteTable::new().get("/ping", noop));
        assert_eq!(group.name(), "misc");
        assert_eq!(group.routes().len(), 1);
    }
}

//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the routes built at startup
//! - Resolve a request to exactly one route
//! - Report ambiguous route tables
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan over every route; all matches are counted
//! - Explicit NoMatch / Ambiguous rather than a silent default

use axum::http::Method;
use std::sync::Arc;

use crate::http::{Request, Response};
use crate::routing::matcher::{AndMatcher, Matcher, MethodMatcher, PathPrefixMatcher};

/// Synchronous request handler attached to a route.
pub type Handler = Arc<dyn Fn(&Request) -> Response + Send + Sync>;

/// A (method, path prefix, handler) entry of the route table.
pub struct Route {
    method: Method,
    path: String,
    matcher: AndMatcher,
    handler: Handler,
}

impl Route {
    pub fn new<F>(method: Method, path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        let path = path.into();
        let matcher = AndMatcher::new(vec![
            Box::new(MethodMatcher::new(method.clone())),
            Box::new(PathPrefixMatcher::new(path.clone())),
        ]);
        Self {
            method,
            path,
            matcher,
            handler: Arc::new(handler),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn matches(&self, method: &Method, path: &str) -> bool {
        self.matcher.matches(method, path)
    }

    pub fn handle(&self, request: &Request) -> Response {
        (self.handler)(request)
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish()
    }
}

/// Outcome of resolving a request against the route table.
#[derive(Debug)]
pub enum Resolution<'a> {
    Matched(&'a Route),
    NoMatch,
    /// More than one route matched; carries the match count.
    Ambiguous(usize),
}

/// Immutable route table.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Find the single route matching `method` and `path`.
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution<'_> {
        let mut matched = self.routes.iter().filter(|r| r.matches(method, path));
        match (matched.next(), matched.count()) {
            (None, _) => Resolution::NoMatch,
            (Some(route), 0) => Resolution::Matched(route),
            (Some(_), rest) => Resolution::Ambiguous(rest + 1),
        }
    }

    /// Pairs of routes that can both match one request.
    ///
    /// Two routes conflict when they share a method and one path is a prefix
    /// of the other.
    pub fn conflicts(&self) -> Vec<(&Route, &Route)> {
        let mut conflicts = Vec::new();
        for (i, a) in self.routes.iter().enumerate() {
            for b in &self.routes[i + 1..] {
                if a.method == b.method && (a.path.starts_with(&b.path) || b.path.starts_with(&a.path)) {
                    conflicts.push((a, b));
                }
            }
        }
        conflicts
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn route(method: Method, path: &'static str) -> Route {
        Route::new(method, path, move |_req: &Request| Response::for_status(StatusCode::OK, path))
    }

    fn table() -> RouteTable {
        RouteTable::new(vec![
            route(Method::GET, "/persons"),
            route(Method::PUT, "/persons"),
            route(Method::GET, "/pets"),
        ])
    }

    fn resolved_path(table: &RouteTable, method: Method, path: &str) -> Option<String> {
        match table.resolve(&method, path) {
            Resolution::Matched(r) => Some(r.path().to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_single_match() {
        let table = table();
        assert_eq!(resolved_path(&table, Method::GET, "/persons/1").as_deref(), Some("/persons"));
        assert_eq!(resolved_path(&table, Method::GET, "/pets?x=1").as_deref(), Some("/pets"));
        assert_eq!(resolved_path(&table, Method::PUT, "/persons").as_deref(), Some("/persons"));
    }

    #[test]
    fn test_no_match() {
        let table = table();
        assert!(matches!(table.resolve(&Method::DELETE, "/persons/1"), Resolution::NoMatch));
        assert!(matches!(table.resolve(&Method::GET, "/people"), Resolution::NoMatch));
        assert!(matches!(table.resolve(&Method::GET, "/"), Resolution::NoMatch));
    }

    #[test]
    fn test_prefix_without_segment_boundary() {
        let table = table();
        assert_eq!(resolved_path(&table, Method::GET, "/personsXYZ").as_deref(), Some("/persons"));
    }

    #[test]
    fn test_ambiguous_regardless_of_order() {
        let forward = RouteTable::new(vec![route(Method::GET, "/per"), route(Method::GET, "/persons")]);
        let backward = RouteTable::new(vec![route(Method::GET, "/persons"), route(Method::GET, "/per")]);

        for table in [&forward, &backward] {
            assert!(matches!(table.resolve(&Method::GET, "/persons/1"), Resolution::Ambiguous(2)));
            assert_eq!(resolved_path(table, Method::GET, "/perch").as_deref(), Some("/per"));
        }
    }

    #[test]
    fn test_handler_invoked() {
        let table = table();
        let request = Request::new(Method::GET, "/pets".parse().unwrap(), Default::default(), "");
        match table.resolve(&request.method, request.path()) {
            Resolution::Matched(r) => assert_eq!(r.handle(&request).body, "OK: /pets"),
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn test_conflicts() {
        assert!(table().conflicts().is_empty());

        let table = RouteTable::new(vec![
            route(Method::GET, "/per"),
            route(Method::PUT, "/per"),
            route(Method::GET, "/persons"),
        ]);
        let conflicts = table.conflicts();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].0.path(), "/per");
        assert_eq!(conflicts[0].1.path(), "/persons");
    }
}

//! Route matching logic.
//!
//! # Responsibilities
//! - Match request method (exact)
//! - Match path prefix (case-sensitive, pure string prefix)
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - `/persons` matches `/personsX` as well as `/persons/1`
//! - Method comparison is exact (`GET` never matches `HEAD`)

use axum::http::Method;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if a request with this method and path matches.
    fn matches(&self, method: &Method, path: &str) -> bool;
}

/// Matches the request method.
#[derive(Debug, Clone)]
pub struct MethodMatcher {
    method: Method,
}

impl MethodMatcher {
    pub fn new(method: Method) -> Self {
        Self { method }
    }
}

impl Matcher for MethodMatcher {
    fn matches(&self, method: &Method, _path: &str) -> bool {
        *method == self.method
    }
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, _method: &Method, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// Combines multiple matchers with AND semantics.
#[derive(Debug)]
pub struct AndMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AndMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for AndMatcher {
    fn matches(&self, method: &Method, path: &str) -> bool {
        self.matchers.iter().all(|m| m.matches(method, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_matcher() {
        let matcher = MethodMatcher::new(Method::PATCH);
        assert!(matcher.matches(&Method::PATCH, "/anything"));
        assert!(!matcher.matches(&Method::PUT, "/anything"));
    }

    #[test]
    fn test_path_matcher() {
        let matcher = PathPrefixMatcher::new("/persons");

        assert!(matcher.matches(&Method::GET, "/persons"));
        assert!(matcher.matches(&Method::GET, "/persons/1"));
        assert!(matcher.matches(&Method::GET, "/personsX"));
        assert!(!matcher.matches(&Method::GET, "/person"));
        assert!(!matcher.matches(&Method::GET, "/Persons"));
    }

    #[test]
    fn test_and_matcher() {
        let matcher = AndMatcher::new(vec![
            Box::new(MethodMatcher::new(Method::GET)),
            Box::new(PathPrefixMatcher::new("/persons")),
        ]);

        assert!(matcher.matches(&Method::GET, "/persons/2"));
        assert!(!matcher.matches(&Method::DELETE, "/persons/2"));
        assert!(!matcher.matches(&Method::GET, "/other"));
    }
}

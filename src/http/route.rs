//! Path matching and request dispatch
//!
//! Routes are held as an ordered list and evaluated in registration order.
//! Patterns are structured per-segment matchers rather than regexes: a
//! pattern matches only when the path has exactly the same number of
//! segments, every literal segment is equal, and every parameter segment is
//! non-empty. The shipped route table is disjoint by construction (distinct
//! segment counts and literal positions), so registration order never
//! decides between two candidate matches.

use std::collections::HashMap;

use tracing::info;

use crate::http::types::{Request, Response};

/// One token of a path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// Values captured for the parameter segments of a matched pattern
pub type PathParams<'a> = HashMap<&'a str, &'a str>;

/// Structured path pattern: fixed segment count, literal or named
/// parameter per position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parses a pattern like `/v1/providers/{namespace}/{type}/versions`.
    /// Brace-wrapped segments become named parameters.
    pub fn parse(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();
        Self { segments }
    }

    /// Tests `path` against this pattern, returning captured parameters on a
    /// match. Parameter segments must be non-empty.
    pub fn matches<'a>(&'a self, path: &'a str) -> Option<PathParams<'a>> {
        let path = path.strip_prefix('/')?;
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) => {
                    if literal != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    params.insert(name.as_str(), part);
                }
            }
        }

        Some(params)
    }
}

/// Trait for request handlers selected by the router
#[async_trait::async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, request: &Request, params: PathParams<'_>) -> Response;
}

struct Route {
    pattern: PathPattern,
    handler: Box<dyn Handler>,
}

/// Dispatches requests to the first route whose pattern matches the path
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registers a route; evaluation follows registration order
    pub fn route(mut self, pattern: &str, handler: impl Handler + 'static) -> Self {
        self.routes.push(Route {
            pattern: PathPattern::parse(pattern),
            handler: Box::new(handler),
        });
        self
    }

    /// Resolves the request path to a handler and runs it; an unmatched path
    /// is a normal 404 outcome, not an error
    pub async fn dispatch(&self, request: &Request) -> Response {
        info!("Path: {}", request.path);

        for route in &self.routes {
            if let Some(params) = route.pattern.matches(&request.path) {
                return route.handler.handle(request, params).await;
            }
        }

        Response::not_found()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

//! Request routing and path matching.
//!
//! Routes map an HTTP method plus a path pattern to a handler name.
//! Patterns use `{param}` segments; extracted parameters travel with the
//! match. Routes are checked in registration order and the first match
//! wins, which lets a trailing method-wildcard route play the part of a
//! catch-all on a path whose other verbs are unsupported.

use http::Method;
use smallvec::SmallVec;

/// Parameters stored inline before spilling to the heap. The offers API
/// has at most one per route.
const INLINE_PARAMS: usize = 2;

/// Path parameters extracted from a route match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the value for a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns an iterator over the parameters.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// A matched route with its extracted path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    name: &'static str,
    params: Params,
}

impl RouteMatch {
    /// Returns the handler name for this route.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the extracted path parameters.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Consumes the match and returns the parameters.
    #[must_use]
    pub fn into_params(self) -> Params {
        self.params
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

#[derive(Debug, Clone)]
struct Route {
    /// `None` matches any method, mirroring an `all`-style registration.
    method: Option<Method>,
    segments: Vec<Segment>,
    name: &'static str,
}

impl Route {
    fn new(method: Option<Method>, pattern: &str, name: &'static str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s.starts_with('{') && s.ends_with('}') {
                    Segment::Param(s[1..s.len() - 1].to_string())
                } else {
                    Segment::Literal(s.to_string())
                }
            })
            .collect();
        Self {
            method,
            segments,
            name,
        }
    }

    fn match_path(&self, path: &str) -> Option<Params> {
        let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if path_segments.len() != self.segments.len() {
            return None;
        }

        let mut params = Params::new();
        for (pattern, actual) in self.segments.iter().zip(path_segments) {
            match pattern {
                Segment::Literal(expected) => {
                    if expected != actual {
                        return None;
                    }
                }
                Segment::Param(name) => params.push(name.clone(), actual),
            }
        }
        Some(params)
    }
}

/// HTTP request router for the offers API.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registers a route for a single method.
    pub fn add(&mut self, method: Method, pattern: &str, name: &'static str) {
        self.routes.push(Route::new(Some(method), pattern, name));
    }

    /// Registers a route matching every method on a pattern.
    ///
    /// Register these after the method-specific routes; first match wins.
    pub fn add_any(&mut self, pattern: &str, name: &'static str) {
        self.routes.push(Route::new(None, pattern, name));
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Matches a request against the route table.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        for route in &self.routes {
            if route.method.as_ref().is_some_and(|m| m != method) {
                continue;
            }
            if let Some(params) = route.match_path(path) {
                return Some(RouteMatch {
                    name: route.name,
                    params,
                });
            }
        }
        None
    }
}

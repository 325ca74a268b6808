//! Method + pattern route table.

use http::Method;

use crate::{Params, RouteError, RoutePattern};

/// A matched route with the captured path variables.
///
/// Returned by [`Router::match_route`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    endpoint: &'a str,
    params: Params,
}

impl<'a> RouteMatch<'a> {
    /// Creates a new route match.
    #[must_use]
    pub fn new(endpoint: &'a str, params: Params) -> Self {
        Self { endpoint, params }
    }

    /// Name of the endpoint the route was registered for.
    #[must_use]
    pub fn endpoint(&self) -> &'a str {
        self.endpoint
    }

    /// Captured path variables.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Consumes the match and returns the path variables.
    #[must_use]
    pub fn into_params(self) -> Params {
        self.params
    }
}

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    pattern: RoutePattern,
    endpoint: String,
}

/// HTTP route table.
///
/// Routes are tried in registration order and the first one whose method and
/// pattern both match wins.
///
/// # Example
///
/// ```rust
/// use argus_router::Router;
/// use http::Method;
///
/// let mut router = Router::new();
/// router.add_route(Method::GET, "/", "index").unwrap();
/// router.add_route(Method::GET, "/users/<int:id>", "get_user").unwrap();
///
/// let m = router.match_route(&Method::GET, "/users/42").unwrap();
/// assert_eq!(m.endpoint(), "get_user");
/// assert_eq!(m.params().get("id"), Some("42"));
///
/// assert!(router.match_route(&Method::POST, "/users/42").is_none());
/// ```
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

    /// Registers `pattern` for `method`, dispatching to `endpoint`.
    pub fn add_route(
        &mut self,
        method: Method,
        pattern: impl AsRef<str>,
        endpoint: impl Into<String>,
    ) -> Result<(), RouteError> {
        let pattern = RoutePattern::parse(pattern.as_ref())?;
        self.routes.push(Route {
            method,
            pattern,
            endpoint: endpoint.into(),
        });
        Ok(())
    }

    /// Number of registered routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Matches a request.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| {
                route
                    .pattern
                    .matches(path)
                    .map(|params| RouteMatch::new(&route.endpoint, params))
            })
    }

    /// Returns true if some route matches `path` under any method.
    ///
    /// Used to tell "405 Method Not Allowed" apart from "404 Not Found".
    #[must_use]
    pub fn matches_any_method(&self, path: &str) -> bool {
        self.routes.iter().any(|route| route.pattern.matches(path).is_some())
    }

    /// Returns true if an endpoint of that name is registered.
    #[must_use]
    pub fn has_endpoint(&self, endpoint: &str) -> bool {
        self.routes.iter().any(|r| r.endpoint == endpoint)
    }

    /// Registered endpoint names, in registration order.
    pub fn endpoints(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.endpoint.as_str())
    }
}

//! Route patterns and path variables for Argus.
//!
//! This crate turns patterns such as `/users/<int:id>` into matchers and
//! collects the captured path variables into [`Params`]. Those variables are
//! what the parser calls the `view_args` location.
//!
//! # Example
//!
//! ```rust
//! use argus_router::Router;
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.add_route(Method::GET, "/users/<id>", "get_user").unwrap();
//!
//! let route = router.match_route(&Method::GET, "/users/42").unwrap();
//! assert_eq!(route.endpoint(), "get_user");
//! assert_eq!(route.params().get("id"), Some("42"));
//! ```

#![doc(html_root_url = "https://docs.rs/argus-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod params;
mod pattern;
mod router;

pub use params::Params;
pub use pattern::{Converter, RoutePattern};
pub use router::{RouteMatch, Router};

/// Errors raised while registering a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// The converter in `<converter:name>` is not known.
    #[error("unknown path converter: {0}")]
    UnknownConverter(String),

    /// A variable segment has an empty or malformed name.
    #[error("invalid path variable: {0}")]
    InvalidVariable(String),

    /// A `path` variable appeared before the last segment.
    #[error("path variable '{0}' must be the last segment")]
    PathNotLast(String),

    /// The same variable name was used twice.
    #[error("duplicate path variable: {0}")]
    DuplicateVariable(String),
}

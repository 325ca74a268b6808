//! The request view used during argument parsing.
//!
//! [`RequestContext`] owns the parts of an HTTP request that argument
//! locations read from. It is built once per request by the server and never
//! mutated while a parse is running.

use argus_router::Params;
use bytes::Bytes;
use http::{header, HeaderMap, Method, Uri};
use mime::Mime;

/// Context providing access to all parts of an HTTP request.
///
/// # Example
///
/// ```rust
/// use argus_extract::RequestContext;
/// use argus_router::Params;
/// use http::{HeaderMap, Method, Uri};
/// use bytes::Bytes;
///
/// let mut params = Params::new();
/// params.push("id", "123");
///
/// let ctx = RequestContext::new(
///     Method::GET,
///     Uri::from_static("/users/123"),
///     HeaderMap::new(),
///     Bytes::new(),
///     params,
/// );
///
/// assert_eq!(ctx.method(), &Method::GET);
/// assert_eq!(ctx.view_args().get("id"), Some("123"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    view_args: Params,
}

impl RequestContext {
    /// Creates a new request context.
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes, view_args: Params) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            view_args,
        }
    }

    /// Starts a builder, mostly useful in tests.
    #[must_use]
    pub fn builder() -> RequestContextBuilder {
        RequestContextBuilder::new()
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the path portion of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the query string if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the raw request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the variables captured from the route pattern.
    #[must_use]
    pub fn view_args(&self) -> &Params {
        &self.view_args
    }

    /// Returns a specific header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE.as_str())
    }

    /// Returns the parsed media type of the body, if the header is valid.
    #[must_use]
    pub fn mime(&self) -> Option<Mime> {
        self.content_type().and_then(|v| v.parse().ok())
    }

    /// Returns true for `application/json` and `application/*+json`.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mime().is_some_and(|m| is_json_mime(&m))
    }

    /// Checks if the request body is empty.
    #[must_use]
    pub fn is_body_empty(&self) -> bool {
        self.body.is_empty()
    }
}

pub(crate) fn is_json_mime(m: &Mime) -> bool {
    m.type_() == mime::APPLICATION && (m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON))
}

/// Builder for constructing a [`RequestContext`].
///
/// Method defaults to `GET` and the URI to `/`.
#[derive(Debug, Default)]
pub struct RequestContextBuilder {
    method: Option<Method>,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Bytes,
    view_args: Params,
}

impl RequestContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI.
    #[must_use]
    pub fn uri(mut self, uri: Uri) -> Self {
        self.uri = Some(uri);
        self
    }

    /// Sets the headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Appends a header. Invalid names or values are skipped.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            name.parse::<http::HeaderName>(),
            value.parse::<http::HeaderValue>(),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a JSON body along with its content type.
    #[must_use]
    pub fn json(self, body: impl Into<Bytes>) -> Self {
        self.header("content-type", "application/json").body(body)
    }

    /// Sets a urlencoded form body along with its content type.
    #[must_use]
    pub fn form(self, body: impl Into<Bytes>) -> Self {
        self.header("content-type", "application/x-www-form-urlencoded")
            .body(body)
    }

    /// Adds a single route variable.
    #[must_use]
    pub fn view_arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.view_args.push(name, value);
        self
    }

    /// Builds the request context.
    #[must_use]
    pub fn build(self) -> RequestContext {
        RequestContext {
            method: self.method.unwrap_or(Method::GET),
            uri: self.uri.unwrap_or_else(|| Uri::from_static("/")),
            headers: self.headers,
            body: self.body,
            view_args: self.view_args,
        }
    }
}

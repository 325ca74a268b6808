//! Handler registration and the `use_args` wrapper.
//!
//! A [`Handler`] is a type-erased async function from a request to a
//! response. Plain handlers are made with [`handler_fn`]; handlers that take
//! parsed arguments are made with [`UseArgs::handler`], which parses the
//! request against a [`Schema`] first and aborts with the error response when
//! that fails.
//!
//! ```rust
//! use argus_schema::{Field, Schema};
//! use argus_server::{HandlerRegistry, UseArgs};
//!
//! let hello = UseArgs::new(Schema::builder().field("name", Field::string().required()).build())
//!     .handler(|_req, args| async move {
//!         format!("Hello {}", args.str("name").unwrap_or_default())
//!     });
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register("index", hello);
//! assert!(registry.contains("index"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use argus_extract::{ParseOptions, Parser, RequestContext};
use argus_schema::{Location, ParsedArgs, Schema};
use http::StatusCode;

use crate::abort::abort;
use crate::response::{HttpResponse, IntoResponse};

/// Type alias for a boxed response future.
pub type BoxedResponse = Pin<Box<dyn Future<Output = HttpResponse> + Send>>;

/// A type-erased handler function.
pub type ErasedHandler = Arc<dyn Fn(RequestContext, Arc<Parser>) -> BoxedResponse + Send + Sync>;

/// A registered request handler.
#[derive(Clone)]
pub struct Handler {
    inner: ErasedHandler,
}

impl Handler {
    /// Wraps an already erased handler.
    #[must_use]
    pub fn from_erased(inner: ErasedHandler) -> Self {
        Self { inner }
    }

    /// Runs the handler.
    pub fn call(&self, request: RequestContext, parser: Arc<Parser>) -> BoxedResponse {
        (self.inner)(request, parser)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

/// Makes a handler that receives the request only.
pub fn handler_fn<F, Fut, R>(f: F) -> Handler
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    let f = Arc::new(f);
    Handler::from_erased(Arc::new(move |request: RequestContext, _parser: Arc<Parser>| -> BoxedResponse {
        let f = Arc::clone(&f);
        Box::pin(async move { f(request).await.into_response() })
    }))
}

/// Binds a schema and parse options to a handler.
///
/// `location` reads every unpinned field from one place. `error_status`
/// replaces the 422 and `error_header` adds headers to the error response.
#[derive(Debug, Clone)]
pub struct UseArgs {
    schema: Arc<Schema>,
    options: ParseOptions,
}

impl UseArgs {
    /// Uses `schema` with default options.
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self::shared(Arc::new(schema))
    }

    /// Uses a schema shared with other handlers.
    #[must_use]
    pub fn shared(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            options: ParseOptions::default(),
        }
    }

    /// Reads every field without a pinned location from `location`.
    #[must_use]
    pub fn location(mut self, location: Location) -> Self {
        self.options = self.options.location(location);
        self
    }

    /// Status for validation failures.
    #[must_use]
    pub fn error_status(mut self, status: StatusCode) -> Self {
        self.options = self.options.error_status(status);
        self
    }

    /// Header added to validation error responses.
    #[must_use]
    pub fn error_header(mut self, name: &str, value: &str) -> Self {
        self.options = self.options.error_header(name, value);
        self
    }

    /// The bound schema.
    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Wraps `f`, which only runs when the request parses.
    pub fn handler<F, Fut, R>(self, f: F) -> Handler
    where
        F: Fn(RequestContext, ParsedArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        let Self { schema, options } = self;
        let options = Arc::new(options);
        let f = Arc::new(f);

        Handler::from_erased(Arc::new(move |request: RequestContext, parser: Arc<Parser>| -> BoxedResponse {
            let schema = Arc::clone(&schema);
            let options = Arc::clone(&options);
            let f = Arc::clone(&f);
            Box::pin(async move {
                let parsed = {
                    let ctx = parser.context(&request);
                    parser.parse(&schema, &ctx, &options).await
                };
                match parsed {
                    Ok(args) => f(request, args).await.into_response(),
                    Err(err) => abort(&err),
                }
            })
        }))
    }
}

/// Registry of handlers keyed by endpoint name.
#[derive(Debug, Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Handler>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `endpoint`, replacing any previous one.
    pub fn register(&mut self, endpoint: impl Into<String>, handler: Handler) {
        self.handlers.insert(endpoint.into(), handler);
    }

    /// Returns true if `endpoint` has a handler.
    #[must_use]
    pub fn contains(&self, endpoint: &str) -> bool {
        self.handlers.contains_key(endpoint)
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs the handler for `endpoint`, or returns `None` if there is none.
    pub fn invoke(
        &self,
        endpoint: &str,
        request: RequestContext,
        parser: Arc<Parser>,
    ) -> Option<BoxedResponse> {
        self.handlers.get(endpoint).map(|h| h.call(request, parser))
    }
}

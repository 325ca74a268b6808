//! HTTP server.
//!
//! Accepts HTTP/1.1 connections with hyper, matches each request against the
//! [`Router`], builds a [`RequestContext`] and runs the endpoint's
//! [`Handler`]. Requests can also be dispatched in-process with
//! [`Server::dispatch`], which is what the tests do.
//!
//! # Example
//!
//! ```rust,no_run
//! use argus_schema::{Field, Schema};
//! use argus_server::{Server, UseArgs};
//! use http::Method;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let hello = UseArgs::new(Schema::builder().field("name", Field::string().required()).build())
//!     .handler(|_req, args| async move {
//!         format!("Hello {}", args.str("name").unwrap_or_default())
//!     });
//!
//! Server::builder()
//!     .http_addr("127.0.0.1:8080")
//!     .route(Method::GET, "/", "index", hello)?
//!     .build()
//!     .run()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use argus_config::ArgusConfig;
use argus_extract::{Parser, ParserConfig, RequestContext};
use argus_router::{RouteError, Router};
use bytes::Bytes;
use http::{HeaderValue, Method, Request, StatusCode};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tracing::Instrument;
use uuid::Uuid;

use crate::abort::body_too_large;
use crate::handler::{Handler, HandlerRegistry};
use crate::response::{error_response, HttpResponse};
use crate::shutdown::{InFlight, ShutdownSignal};

/// Header carrying the per-request id on every response.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Errors raised while configuring or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listen address is not a socket address.
    #[error("invalid listen address '{addr}': {source}")]
    InvalidAddress {
        /// The configured address.
        addr: String,
        /// Parse failure.
        #[source]
        source: std::net::AddrParseError,
    },

    /// Binding the listener failed.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The address.
        addr: SocketAddr,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A route pattern was rejected.
    #[error(transparent)]
    Route(#[from] RouteError),
}

/// The HTTP server.
#[derive(Debug)]
pub struct Server {
    http_addr: String,
    request_timeout: Duration,
    shutdown_timeout: Duration,
    router: Router,
    handlers: HandlerRegistry,
    parser: Arc<Parser>,
}

impl Server {
    /// Creates a server builder.
    #[must_use]
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// The configured listen address.
    #[must_use]
    pub fn http_addr(&self) -> &str {
        &self.http_addr
    }

    /// The route table.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// The registered handlers.
    #[must_use]
    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// The argument parser shared by every handler.
    #[must_use]
    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    /// Time allowed for reading the body and, separately, for the handler.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Runs until SIGINT or SIGTERM.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_with_shutdown(ShutdownSignal::with_os_signals()).await
    }

    /// Runs until `shutdown` is triggered, then waits up to the shutdown
    /// timeout for open connections to finish.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr: SocketAddr = self
            .http_addr
            .parse()
            .map_err(|source| ServerError::InvalidAddress {
                addr: self.http_addr.clone(),
                source,
            })?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener.
    pub async fn serve(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        if let Ok(local) = listener.local_addr() {
            tracing::info!(addr = %local, routes = self.router.route_count(), "listening");
        }

        let server = Arc::new(self);
        let in_flight = InFlight::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote)) => {
                        let server = Arc::clone(&server);
                        let guard = in_flight.enter();
                        let shutdown = shutdown.clone();
                        tokio::spawn(async move {
                            if let Err(e) = server.handle_connection(stream, shutdown).await {
                                tracing::error!(%remote, error = %e, "connection error");
                            }
                            drop(guard);
                        });
                    }
                    Err(e) => tracing::error!(error = %e, "failed to accept connection"),
                },
                () = shutdown.triggered() => {
                    tracing::info!("shutdown requested, no longer accepting connections");
                    break;
                }
            }
        }

        let open = in_flight.count();
        if open > 0 {
            tracing::info!(open, timeout = ?server.shutdown_timeout, "waiting for connections to close");
        }
        if tokio::time::timeout(server.shutdown_timeout, in_flight.drained())
            .await
            .is_err()
        {
            tracing::warn!(open = in_flight.count(), "shutdown timeout reached");
        }

        tracing::info!("server stopped");
        Ok(())
    }

    async fn handle_connection(
        self: &Arc<Self>,
        stream: TcpStream,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let server = Arc::clone(self);
        let service = service_fn(move |req: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { Ok::<_, Infallible>(server.handle_request(req).await) }
        });

        let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
        tokio::pin!(conn);

        tokio::select! {
            result = conn.as_mut() => result,
            () = shutdown.triggered() => {
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        }
    }

    async fn handle_request(&self, req: Request<Incoming>) -> HttpResponse {
        let (parts, body) = req.into_parts();
        let limit = self.parser.config().max_body_size;

        match read_body(body, limit, self.request_timeout).await {
            Ok(body) => self.dispatch(Request::from_parts(parts, body)).await,
            Err(response) => {
                tracing::debug!(path = parts.uri.path(), status = response.status().as_u16(), "body rejected");
                response
            }
        }
    }

    /// Routes and handles a request whose body has already been read.
    ///
    /// Every response carries an `x-request-id` header.
    pub async fn dispatch(&self, request: Request<Bytes>) -> HttpResponse {
        let request_id = Uuid::now_v7();
        let span = tracing::debug_span!(
            "request",
            request_id = %request_id,
            method = %request.method(),
            path = request.uri().path(),
        );

        let mut response = self.route(request).instrument(span).await;
        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }

    async fn route(&self, request: Request<Bytes>) -> HttpResponse {
        let (parts, body) = request.into_parts();
        let path = parts.uri.path().to_string();

        let Some(route) = self.router.match_route(&parts.method, &path) else {
            return if self.router.matches_any_method(&path) {
                tracing::debug!("method not allowed");
                error_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
            } else {
                tracing::debug!("no matching route");
                error_response(StatusCode::NOT_FOUND, &format!("no route for {path}"))
            };
        };

        let endpoint = route.endpoint();
        let request = RequestContext::new(parts.method, parts.uri, parts.headers, body, route.params().clone());
        let Some(response) = self.handlers.invoke(endpoint, request, Arc::clone(&self.parser)) else {
            tracing::error!(endpoint, "route has no handler");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "no handler for route");
        };

        match tokio::time::timeout(self.request_timeout, response).await {
            Ok(response) => {
                tracing::debug!(endpoint, status = response.status().as_u16(), "handled");
                response
            }
            Err(_) => {
                tracing::warn!(endpoint, "handler timed out");
                error_response(StatusCode::GATEWAY_TIMEOUT, "handler timed out")
            }
        }
    }
}

/// Reads a body of at most `limit` bytes within `timeout`.
///
/// The body is cut off as soon as it passes the limit, so an oversized
/// upload is never buffered in full.
async fn read_body<B>(body: B, limit: usize, timeout: Duration) -> Result<Bytes, HttpResponse>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match tokio::time::timeout(timeout, Limited::new(body, limit).collect()).await {
        Ok(Ok(collected)) => Ok(collected.to_bytes()),
        Ok(Err(e)) if e.is::<LengthLimitError>() => {
            tracing::warn!(limit, "request body too large");
            Err(body_too_large())
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "failed to read request body");
            Err(error_response(StatusCode::BAD_REQUEST, "failed to read request body"))
        }
        Err(_) => {
            tracing::warn!("request body timed out");
            Err(error_response(StatusCode::REQUEST_TIMEOUT, "request body timed out"))
        }
    }
}

/// Builder for [`Server`].
#[derive(Debug)]
pub struct ServerBuilder {
    http_addr: String,
    request_timeout: Duration,
    shutdown_timeout: Duration,
    parser: ParserConfig,
    router: Router,
    handlers: HandlerRegistry,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    /// Creates a builder with the default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&ArgusConfig::default())
    }

    /// Creates a builder from loaded configuration.
    #[must_use]
    pub fn from_config(config: &ArgusConfig) -> Self {
        Self {
            http_addr: config.server.http_addr.clone(),
            request_timeout: Duration::from_millis(config.server.request_timeout_ms),
            shutdown_timeout: Duration::from_secs(config.server.shutdown_timeout_secs),
            parser: ParserConfig::from(&config.parser),
            router: Router::new(),
            handlers: HandlerRegistry::new(),
        }
    }

    /// Sets the listen address.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.http_addr = addr.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets how long shutdown waits for open connections.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Sets the parser settings.
    #[must_use]
    pub fn parser(mut self, config: ParserConfig) -> Self {
        self.parser = config;
        self
    }

    /// Adds a route and its handler.
    pub fn route(
        mut self,
        method: Method,
        pattern: &str,
        endpoint: &str,
        handler: Handler,
    ) -> Result<Self, ServerError> {
        self.router.add_route(method, pattern, endpoint)?;
        self.handlers.register(endpoint, handler);
        Ok(self)
    }

    /// Builds the server.
    #[must_use]
    pub fn build(self) -> Server {
        Server {
            http_addr: self.http_addr,
            request_timeout: self.request_timeout,
            shutdown_timeout: self.shutdown_timeout,
            router: self.router,
            handlers: self.handlers,
            parser: Arc::new(Parser::new(self.parser)),
        }
    }
}

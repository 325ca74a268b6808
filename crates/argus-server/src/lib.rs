//! # Argus Server
//!
//! The HTTP boundary for Argus: a hyper server with a route table, the
//! [`UseArgs`] wrapper that parses arguments before a handler runs, and the
//! rendering of parse failures as JSON error responses.
//!
//! ## Error responses
//!
//! A failed parse never reaches the handler. The client receives:
//!
//! ```json
//! {"code": 422, "status": "Unprocessable Entity", "messages": {"name": ["Missing data for required field."]}}
//! ```
//!
//! with status 422 (or the per-use override), 400 for malformed bodies and
//! 413 for oversized ones.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod abort;
mod handler;
mod response;
mod server;
mod shutdown;
pub mod telemetry;

pub use abort::abort;
pub use handler::{handler_fn, BoxedResponse, ErasedHandler, Handler, HandlerRegistry, UseArgs};
pub use response::{
    build_response, error_response, json_response, HttpResponse, IntoResponse, JsonResponse,
    ResponseBody, TextResponse,
};
pub use server::{Server, ServerBuilder, ServerError, REQUEST_ID_HEADER};
pub use shutdown::{InFlight, InFlightGuard, ShutdownSignal};

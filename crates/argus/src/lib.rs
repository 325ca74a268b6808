//! # Argus
//!
//! Declarative request argument parsing for async HTTP services.
//!
//! Declare what a handler needs as a [`Schema`](schema::Schema), bind it with
//! [`UseArgs`](server::UseArgs), and the handler only runs with validated
//! arguments. Missing or invalid fields are answered with a 422 listing every
//! problem; malformed JSON bodies with a 400.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use argus::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let hello = UseArgs::new(Schema::builder().field("name", Field::string().required()).build())
//!         .handler(|_req, args| async move {
//!             format!("Hello {}", args.str("name").unwrap_or_default())
//!         });
//!
//!     Server::builder()
//!         .route(Method::GET, "/", "index", hello)?
//!         .build()
//!         .run()
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Crates
//!
//! ```text
//! argus-router   route patterns, path variables
//! argus-schema   fields, coercion, validators
//! argus-extract  locations, body decode cache, parser
//! argus-config   layered configuration
//! argus-server   hyper server, UseArgs, error responses
//! ```

#![doc(html_root_url = "https://docs.rs/argus/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use argus_config as config;
pub use argus_extract as extract;
pub use argus_router as router;
pub use argus_schema as schema;
pub use argus_server as server;

/// Prelude module for convenient imports.
///
/// ```rust
/// use argus::prelude::*;
///
/// let schema = Schema::builder().field("page", Field::integer().default_value(1)).build();
/// assert_eq!(schema.len(), 1);
/// ```
pub mod prelude {
    pub use argus_config::{ArgusConfig, ConfigLoader};
    pub use argus_extract::{ParseError, ParseOptions, Parser, ParserConfig, RequestContext};
    pub use argus_schema::{
        ArgValue, Field, FieldKind, Location, ParsedArgs, Schema, UploadedFile, Validator,
    };
    pub use argus_server::{
        abort, handler_fn, IntoResponse, JsonResponse, Server, ShutdownSignal, TextResponse,
        UseArgs,
    };
    pub use http::{Method, StatusCode};
}

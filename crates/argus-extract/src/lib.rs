//! # Argus Extract
//!
//! Reads request arguments from their locations and loads them through an
//! [`argus_schema::Schema`].
//!
//! | Location | Source |
//! |----------|--------|
//! | `querystring` | URL query string |
//! | `form` | urlencoded or multipart body text parts |
//! | `json` | JSON body (object members) |
//! | `headers` | request headers, case-insensitive |
//! | `cookies` | `Cookie` headers |
//! | `files` | multipart file parts |
//! | `view_args` | variables captured by the route pattern |
//!
//! Bodies are decoded lazily and at most once per request through the
//! [`DecodeCache`] owned by each [`ParseContext`].
//!
//! ## Errors
//!
//! [`Parser::parse`] returns [`ParseError`], which carries the status code,
//! the message map and any extra headers for the error response:
//!
//! - validation failures: 422 (configurable) with per-field messages
//! - malformed JSON: 400 with `{"json": ["Invalid JSON body."]}`
//! - malformed multipart: 400 with `{"form": ["Invalid form body."]}`
//! - oversized body: 413 with `{"body": ["Request body too large."]}`

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cache;
mod context;
mod cookie;
mod error;
mod multidict;
mod multipart;
mod parser;
mod resolve;

pub use cache::{BodyKind, DecodeCache, ParseContext, DEFAULT_MAX_BODY_SIZE};
pub use context::{RequestContext, RequestContextBuilder};
pub use cookie::parse_cookies;
pub use error::{ParseError, BODY_TOO_LARGE_MESSAGE, INVALID_FORM_MESSAGE, INVALID_JSON_MESSAGE};
pub use multidict::MultiDict;
pub use multipart::{decode_multipart, FormData};
pub use parser::{ParseOptions, Parser, ParserConfig};
pub use resolve::resolve;

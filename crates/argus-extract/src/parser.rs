//! The request argument parser.

use std::slice;

use argus_config::ParserSection;
use argus_schema::{Location, ParsedArgs, Schema};
use http::{HeaderMap, StatusCode};
use indexmap::IndexMap;

use crate::cache::{ParseContext, DEFAULT_MAX_BODY_SIZE};
use crate::context::RequestContext;
use crate::error::ParseError;
use crate::resolve::resolve;

/// Runtime parser settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Locations searched, in order, for fields without a pinned location.
    pub default_locations: Vec<Location>,
    /// Status used for validation failures.
    pub error_status: StatusCode,
    /// Largest body that will be decoded.
    pub max_body_size: usize,
    /// Whether a whitespace-only JSON body counts as missing.
    pub blank_json_is_missing: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            default_locations: Location::DEFAULTS.to_vec(),
            error_status: StatusCode::UNPROCESSABLE_ENTITY,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            blank_json_is_missing: true,
        }
    }
}

impl From<&ParserSection> for ParserConfig {
    fn from(section: &ParserSection) -> Self {
        Self {
            default_locations: section.default_locations.clone(),
            error_status: StatusCode::from_u16(section.error_status)
                .unwrap_or(StatusCode::UNPROCESSABLE_ENTITY),
            max_body_size: section.max_body_size,
            blank_json_is_missing: section.blank_json_is_missing,
        }
    }
}

/// Per-use overrides, as given to `use_args`.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Location used for every field without a pinned one.
    pub location: Option<Location>,
    /// Status used for validation failures.
    pub error_status: Option<StatusCode>,
    /// Headers added to validation error responses.
    pub error_headers: HeaderMap,
}

impl ParseOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads all unpinned fields from `location`.
    #[must_use]
    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Overrides the validation error status.
    #[must_use]
    pub fn error_status(mut self, status: StatusCode) -> Self {
        self.error_status = Some(status);
        self
    }

    /// Adds a header to validation error responses. Invalid names or values
    /// are skipped.
    #[must_use]
    pub fn error_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            name.parse::<http::HeaderName>(),
            value.parse::<http::HeaderValue>(),
        ) {
            self.error_headers.append(name, value);
        }
        self
    }
}

/// Parses request arguments against a schema.
///
/// # Example
///
/// ```rust
/// use argus_extract::{Parser, RequestContext};
/// use argus_schema::{Field, Schema};
/// use http::Uri;
///
/// # tokio_test_block(async {
/// let schema = Schema::builder()
///     .field("name", Field::string().required())
///     .build();
/// let request = RequestContext::builder()
///     .uri(Uri::from_static("/?name=Ann"))
///     .build();
///
/// let args = Parser::default().parse_request(&schema, &request).await.unwrap();
/// assert_eq!(args.str("name"), Some("Ann"));
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Creates a parser with the given settings.
    #[must_use]
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// The parser settings.
    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Creates a parse context for `request` honoring the configured limits.
    #[must_use]
    pub fn context<'r>(&self, request: &'r RequestContext) -> ParseContext<'r> {
        ParseContext::new(request)
            .with_max_body_size(self.config.max_body_size)
            .with_blank_json_is_missing(self.config.blank_json_is_missing)
    }

    /// Parses `request` with default options.
    ///
    /// # Errors
    ///
    /// See [`Parser::parse`].
    pub async fn parse_request(
        &self,
        schema: &Schema,
        request: &RequestContext,
    ) -> Result<ParsedArgs, ParseError> {
        let ctx = self.context(request);
        self.parse(schema, &ctx, &ParseOptions::default()).await
    }

    /// Resolves and loads every schema field.
    ///
    /// Fields are resolved in schema order. A field with a pinned location
    /// reads only from it; otherwise the per-use location, or the default
    /// locations in order, are tried until one has a value.
    ///
    /// # Errors
    ///
    /// A malformed or oversized body aborts immediately. Otherwise every
    /// field is loaded and all failures are returned together as
    /// [`ParseError::Validation`].
    pub async fn parse(
        &self,
        schema: &Schema,
        ctx: &ParseContext<'_>,
        options: &ParseOptions,
    ) -> Result<ParsedArgs, ParseError> {
        let mut raw = IndexMap::with_capacity(schema.len());

        for (name, field) in schema.fields() {
            let key = field.source_key(name);
            let pinned = field.location_hint().or(options.location);
            let locations: &[Location] = match &pinned {
                Some(location) => slice::from_ref(location),
                None => &self.config.default_locations,
            };

            let mut found = None;
            for &location in locations {
                if let Some(value) = resolve(location, ctx, key, field).await? {
                    found = Some((location, value));
                    break;
                }
            }

            match found {
                Some((location, value)) => {
                    tracing::debug!(field = name, %location, "argument found");
                    raw.insert(name.to_string(), value);
                }
                None => tracing::debug!(field = name, "argument missing"),
            }
        }

        schema.load(raw).map_err(|source| {
            let status = options.error_status.unwrap_or(self.config.error_status);
            tracing::info!(
                status = status.as_u16(),
                fields = source.messages().len(),
                "request arguments failed validation"
            );
            ParseError::Validation {
                status,
                headers: options.error_headers.clone(),
                source,
            }
        })
    }
}

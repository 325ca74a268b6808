//! Per-request decode cache.
//!
//! A [`ParseContext`] is created for each request and owns a [`DecodeCache`].
//! Every location resolver goes through the context, so the body is decoded
//! at most once per kind no matter how many fields read from it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use serde_json::Value;
use tokio::sync::OnceCell;

use crate::context::RequestContext;
use crate::cookie::parse_cookies;
use crate::error::ParseError;
use crate::multidict::MultiDict;
use crate::multipart::{decode_multipart, FormData};

/// Default maximum body size accepted for decoding (1 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// A body representation held by the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// Urlencoded or multipart form data.
    Form,
    /// A JSON document.
    Json,
}

/// Lazily decoded request data, keyed by kind.
///
/// Cells are `tokio::sync::OnceCell`s so concurrent lookups within one
/// request wait on the same decode.
#[derive(Debug, Default)]
pub struct DecodeCache {
    query: OnceLock<MultiDict>,
    cookies: OnceLock<MultiDict>,
    form: OnceCell<FormData>,
    json: OnceCell<Option<Value>>,
    form_decodes: AtomicUsize,
    json_decodes: AtomicUsize,
}

impl DecodeCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the body was decoded as `kind`.
    #[must_use]
    pub fn decode_count(&self, kind: BodyKind) -> usize {
        match kind {
            BodyKind::Form => self.form_decodes.load(Ordering::Relaxed),
            BodyKind::Json => self.json_decodes.load(Ordering::Relaxed),
        }
    }

    /// Returns true once `kind` has been resolved (decoded or found absent).
    #[must_use]
    pub fn is_cached(&self, kind: BodyKind) -> bool {
        match kind {
            BodyKind::Form => self.form.initialized(),
            BodyKind::Json => self.json.initialized(),
        }
    }
}

/// Everything one parse needs: the request, its decode cache and limits.
#[derive(Debug)]
pub struct ParseContext<'r> {
    request: &'r RequestContext,
    cache: DecodeCache,
    max_body_size: usize,
    blank_json_is_missing: bool,
}

impl<'r> ParseContext<'r> {
    /// Creates a context with default limits.
    #[must_use]
    pub fn new(request: &'r RequestContext) -> Self {
        Self {
            request,
            cache: DecodeCache::new(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            blank_json_is_missing: true,
        }
    }

    /// Sets the largest body that will be decoded.
    #[must_use]
    pub fn with_max_body_size(mut self, limit: usize) -> Self {
        self.max_body_size = limit;
        self
    }

    /// Sets whether a whitespace-only JSON body counts as missing.
    #[must_use]
    pub fn with_blank_json_is_missing(mut self, missing: bool) -> Self {
        self.blank_json_is_missing = missing;
        self
    }

    /// The request being parsed.
    #[must_use]
    pub fn request(&self) -> &'r RequestContext {
        self.request
    }

    /// The decode cache.
    #[must_use]
    pub fn cache(&self) -> &DecodeCache {
        &self.cache
    }

    /// The parsed query string.
    pub fn query(&self) -> &MultiDict {
        self.cache.query.get_or_init(|| {
            self.request
                .query_string()
                .map(MultiDict::from_urlencoded)
                .unwrap_or_default()
        })
    }

    /// The parsed cookies.
    pub fn cookies(&self) -> &MultiDict {
        self.cache
            .cookies
            .get_or_init(|| parse_cookies(self.request.headers()))
    }

    /// The decoded form body.
    ///
    /// Bodies that are neither urlencoded nor multipart decode to an empty
    /// form.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::BodyTooLarge`] or [`ParseError::InvalidForm`].
    pub async fn form(&self) -> Result<&FormData, ParseError> {
        self.cache.form.get_or_try_init(|| self.decode_form()).await
    }

    /// The decoded JSON body, or `None` when the request carries no JSON.
    ///
    /// JSON is only read when the body is non-empty and the media type is
    /// JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::BodyTooLarge`] or [`ParseError::InvalidJson`].
    pub async fn json(&self) -> Result<Option<&Value>, ParseError> {
        let decoded = self
            .cache
            .json
            .get_or_try_init(|| async { self.decode_json() })
            .await?;
        Ok(decoded.as_ref())
    }

    fn check_size(&self) -> Result<(), ParseError> {
        let actual = self.request.body().len();
        if actual > self.max_body_size {
            tracing::warn!(limit = self.max_body_size, actual, "request body too large");
            return Err(ParseError::BodyTooLarge {
                limit: self.max_body_size,
                actual,
            });
        }
        Ok(())
    }

    async fn decode_form(&self) -> Result<FormData, ParseError> {
        if self.request.is_body_empty() {
            return Ok(FormData::default());
        }

        let Some(media) = self.request.mime() else {
            return Ok(FormData::default());
        };

        let body = self.request.body();
        if media.type_() == mime::APPLICATION && media.subtype() == mime::WWW_FORM_URLENCODED {
            self.check_size()?;
            self.cache.form_decodes.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(kind = "form", bytes = body.len(), "decoding body");
            Ok(FormData::from_fields(MultiDict::from_urlencoded_bytes(body)))
        } else if media.type_() == mime::MULTIPART && media.subtype() == mime::FORM_DATA {
            self.check_size()?;
            self.cache.form_decodes.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(kind = "multipart", bytes = body.len(), "decoding body");
            let content_type = self.request.content_type().unwrap_or_default();
            decode_multipart(content_type, body.clone())
                .await
                .map_err(|source| {
                    tracing::warn!(error = %source, "malformed multipart body");
                    ParseError::InvalidForm { source }
                })
        } else {
            Ok(FormData::default())
        }
    }

    fn decode_json(&self) -> Result<Option<Value>, ParseError> {
        let body = self.request.body();
        if body.is_empty() || !self.request.is_json() {
            return Ok(None);
        }
        if self.blank_json_is_missing && body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        self.check_size()?;
        self.cache.json_decodes.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(kind = "json", bytes = body.len(), "decoding body");
        serde_json::from_slice(body).map(Some).map_err(|source| {
            tracing::warn!(error = %source, "malformed JSON body");
            ParseError::InvalidJson { source }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_json_decoded_once() {
        let request = RequestContext::builder().json(r#"{"a": 1}"#).build();
        let ctx = ParseContext::new(&request);

        assert_eq!(ctx.json().await.unwrap(), Some(&json!({"a": 1})));
        assert_eq!(ctx.json().await.unwrap(), Some(&json!({"a": 1})));
        assert_eq!(ctx.cache().decode_count(BodyKind::Json), 1);
        assert!(ctx.cache().is_cached(BodyKind::Json));
    }

    #[tokio::test]
    async fn test_concurrent_json_lookups_share_decode() {
        let request = RequestContext::builder().json(r#"[1, 2]"#).build();
        let ctx = ParseContext::new(&request);

        let (a, b) = tokio::join!(ctx.json(), ctx.json());
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(ctx.cache().decode_count(BodyKind::Json), 1);
    }

    #[tokio::test]
    async fn test_empty_json_body_is_missing() {
        let request = RequestContext::builder().json("").build();
        let ctx = ParseContext::new(&request);
        assert_eq!(ctx.json().await.unwrap(), None);
        assert_eq!(ctx.cache().decode_count(BodyKind::Json), 0);
    }

    #[tokio::test]
    async fn test_blank_json_body() {
        let request = RequestContext::builder().json("  \n ").build();

        let lenient = ParseContext::new(&request);
        assert_eq!(lenient.json().await.unwrap(), None);

        let strict = ParseContext::new(&request).with_blank_json_is_missing(false);
        assert!(matches!(
            strict.json().await,
            Err(ParseError::InvalidJson { .. })
        ));
    }

    #[tokio::test]
    async fn test_non_json_mimetype_ignored() {
        let request = RequestContext::builder()
            .header("content-type", "text/plain")
            .body(r#"{"a": 1}"#)
            .build();
        let ctx = ParseContext::new(&request);
        assert_eq!(ctx.json().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let request = RequestContext::builder().json("{not json").build();
        let ctx = ParseContext::new(&request);
        let err = ctx.json().await.unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson { .. }));
    }

    #[tokio::test]
    async fn test_form_decoded_once() {
        let request = RequestContext::builder().form("a=1&b=2").build();
        let ctx = ParseContext::new(&request);

        assert_eq!(ctx.form().await.unwrap().fields().get("a"), Some("1"));
        assert_eq!(ctx.form().await.unwrap().fields().get("b"), Some("2"));
        assert_eq!(ctx.cache().decode_count(BodyKind::Form), 1);
    }

    #[tokio::test]
    async fn test_form_ignores_other_content_types() {
        let request = RequestContext::builder().json(r#"{"a": 1}"#).build();
        let ctx = ParseContext::new(&request);
        assert!(ctx.form().await.unwrap().fields().is_empty());
        assert_eq!(ctx.cache().decode_count(BodyKind::Form), 0);
    }

    #[tokio::test]
    async fn test_body_too_large() {
        let request = RequestContext::builder().form("a=1234567890").build();
        let ctx = ParseContext::new(&request).with_max_body_size(4);
        let err = ctx.form().await.unwrap_err();
        assert!(matches!(err, ParseError::BodyTooLarge { limit: 4, actual: 12 }));
    }

    #[test]
    fn test_query_and_cookies() {
        let request = RequestContext::builder()
            .uri(http::Uri::from_static("/?q=rust&q=tokio"))
            .header("cookie", "sid=abc")
            .build();
        let ctx = ParseContext::new(&request);
        assert_eq!(ctx.query().get_all("q"), ["rust", "tokio"]);
        assert_eq!(ctx.cookies().get("sid"), Some("abc"));
    }
}

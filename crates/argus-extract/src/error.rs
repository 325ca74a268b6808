//! Parse failures and their HTTP rendering data.

use argus_schema::{ErrorMessages, ValidationError};
use http::{HeaderMap, StatusCode};

/// Message reported under `json` for a body that is not valid JSON.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON body.";
/// Message reported under `form` for a malformed multipart body.
pub const INVALID_FORM_MESSAGE: &str = "Invalid form body.";
/// Message reported under `body` when the body exceeds the size limit.
pub const BODY_TOO_LARGE_MESSAGE: &str = "Request body too large.";

/// Error returned when request arguments cannot be parsed.
///
/// Every variant carries what the server needs to abort the request: a
/// status code, a message map for the response body and, for validation
/// failures, extra response headers.
///
/// # Example
///
/// ```rust
/// use argus_extract::ParseError;
/// use http::StatusCode;
///
/// let err = ParseError::BodyTooLarge { limit: 10, actual: 20 };
/// assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
/// assert_eq!(err.messages().get("body").unwrap(), ["Request body too large."]);
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// One or more fields were missing or invalid.
    #[error("request arguments failed validation ({source})")]
    Validation {
        /// Status for the error response (422 unless overridden).
        status: StatusCode,
        /// Headers to add to the error response.
        headers: HeaderMap,
        /// The per-field failures.
        #[source]
        source: ValidationError,
    },

    /// The body was declared as JSON, was not empty, and did not parse.
    #[error("invalid JSON body: {source}")]
    InvalidJson {
        /// The decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// The multipart body was malformed.
    #[error("invalid form body: {source}")]
    InvalidForm {
        /// The decoder error.
        #[source]
        source: multer::Error,
    },

    /// The body was larger than the configured limit.
    #[error("request body of {actual} bytes exceeds the limit of {limit} bytes")]
    BodyTooLarge {
        /// Configured maximum in bytes.
        limit: usize,
        /// Actual body size in bytes.
        actual: usize,
    },
}

impl ParseError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { status, .. } => *status,
            Self::InvalidJson { .. } | Self::InvalidForm { .. } => StatusCode::BAD_REQUEST,
            Self::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Returns the message map rendered into the response body.
    #[must_use]
    pub fn messages(&self) -> ErrorMessages {
        match self {
            Self::Validation { source, .. } => source.messages().clone(),
            Self::InvalidJson { .. } => [("json", INVALID_JSON_MESSAGE)].into_iter().collect(),
            Self::InvalidForm { .. } => [("form", INVALID_FORM_MESSAGE)].into_iter().collect(),
            Self::BodyTooLarge { .. } => [("body", BODY_TOO_LARGE_MESSAGE)].into_iter().collect(),
        }
    }

    /// Returns extra headers for the error response, if any.
    #[must_use]
    pub fn headers(&self) -> Option<&HeaderMap> {
        match self {
            Self::Validation { headers, .. } if !headers.is_empty() => Some(headers),
            _ => None,
        }
    }

    /// Returns true for field validation failures.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns the validation error, if this is one.
    #[must_use]
    pub fn validation_error(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation { source, .. } => Some(source),
            _ => None,
        }
    }
}

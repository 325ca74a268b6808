//! Response types and handler return conversions.
//!
//! | Return type | Status | Content type |
//! |-------------|--------|--------------|
//! | `String`, `&'static str` | 200 | `text/html; charset=utf-8` |
//! | [`TextResponse`] | configurable | `text/plain; charset=utf-8` |
//! | [`JsonResponse<T>`] | configurable | `application/json` |
//! | `(StatusCode, String)` | given | `text/html; charset=utf-8` |
//! | [`HttpResponse`] | as built | as built |

use bytes::Bytes;
use http::{header, HeaderValue, Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;

/// Type alias for HTTP response body.
pub type ResponseBody = Full<Bytes>;

/// Type alias for the HTTP response.
pub type HttpResponse = Response<ResponseBody>;

const HTML: &str = "text/html; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";
const JSON: &str = "application/json";

/// Conversion from a handler's return value into an HTTP response.
pub trait IntoResponse {
    /// Builds the response.
    fn into_response(self) -> HttpResponse;
}

/// Builds a response with a body and content type.
pub fn build_response(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> HttpResponse {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

/// Builds a JSON response from an already serialized value.
pub fn json_response(status: StatusCode, value: &serde_json::Value) -> HttpResponse {
    build_response(status, JSON, value.to_string())
}

/// Builds the JSON body used for errors raised by the server itself
/// (unknown route, timeouts).
pub fn error_response(status: StatusCode, message: &str) -> HttpResponse {
    json_response(
        status,
        &serde_json::json!({
            "code": status.as_u16(),
            "status": status.canonical_reason().unwrap_or("Error"),
            "message": message,
        }),
    )
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> HttpResponse {
        self
    }
}

impl IntoResponse for String {
    fn into_response(self) -> HttpResponse {
        build_response(StatusCode::OK, HTML, self)
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> HttpResponse {
        build_response(StatusCode::OK, HTML, self)
    }
}

impl IntoResponse for (StatusCode, String) {
    fn into_response(self) -> HttpResponse {
        build_response(self.0, HTML, self.1)
    }
}

impl IntoResponse for (StatusCode, &'static str) {
    fn into_response(self) -> HttpResponse {
        build_response(self.0, HTML, self.1)
    }
}

impl<T: IntoResponse, E: IntoResponse> IntoResponse for Result<T, E> {
    fn into_response(self) -> HttpResponse {
        match self {
            Ok(value) => value.into_response(),
            Err(err) => err.into_response(),
        }
    }
}

/// JSON response builder.
///
/// # Example
///
/// ```rust
/// use argus_server::JsonResponse;
/// use serde_json::json;
///
/// let response = JsonResponse::new(json!({"id": 42}));
/// assert_eq!(response.status(), http::StatusCode::OK);
/// ```
#[derive(Debug)]
pub struct JsonResponse<T> {
    data: T,
    status: StatusCode,
}

impl<T: Serialize> JsonResponse<T> {
    /// Creates a new JSON response with status 200 OK.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            data,
            status: StatusCode::OK,
        }
    }

    /// Creates a JSON response with status 201 Created.
    #[must_use]
    pub fn created(data: T) -> Self {
        Self {
            data,
            status: StatusCode::CREATED,
        }
    }

    /// Sets a custom status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns a reference to the data.
    #[must_use]
    pub fn data(&self) -> &T {
        &self.data
    }
}

impl<T: Serialize> IntoResponse for JsonResponse<T> {
    fn into_response(self) -> HttpResponse {
        match serde_json::to_vec(&self.data) {
            Ok(body) => build_response(self.status, JSON, body),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize JSON response");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "response serialization failed")
            }
        }
    }
}

/// Plain text response builder.
///
/// ```rust
/// use argus_server::TextResponse;
///
/// let response = TextResponse::new("pong");
/// assert_eq!(response.status(), http::StatusCode::OK);
/// ```
#[derive(Debug, Clone)]
pub struct TextResponse {
    body: String,
    status: StatusCode,
}

impl TextResponse {
    /// Creates a new text response with status 200 OK.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            status: StatusCode::OK,
        }
    }

    /// Sets a custom status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the body content.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl IntoResponse for TextResponse {
    fn into_response(self) -> HttpResponse {
        build_response(self.status, TEXT, self.body)
    }
}

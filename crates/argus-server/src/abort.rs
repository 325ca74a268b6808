//! Renders parse failures as HTTP error responses.

use argus_extract::{ParseError, BODY_TOO_LARGE_MESSAGE};
use argus_schema::ErrorMessages;
use http::{HeaderMap, StatusCode};
use serde_json::json;

use crate::response::{json_response, HttpResponse};

/// Builds the error response for a failed parse.
///
/// The body is `{"code": <status>, "status": <reason>, "messages": {...}}`
/// and any headers attached to the error are copied onto the response.
///
/// ```rust
/// use argus_extract::ParseError;
/// use argus_server::abort;
///
/// let response = abort(&ParseError::BodyTooLarge { limit: 1, actual: 2 });
/// assert_eq!(response.status(), http::StatusCode::PAYLOAD_TOO_LARGE);
/// ```
#[must_use]
pub fn abort(err: &ParseError) -> HttpResponse {
    render(err.status_code(), &err.messages(), err.headers())
}

/// The 413 sent when the body is cut off while it is being read.
pub(crate) fn body_too_large() -> HttpResponse {
    let messages: ErrorMessages = [("body", BODY_TOO_LARGE_MESSAGE)].into_iter().collect();
    render(StatusCode::PAYLOAD_TOO_LARGE, &messages, None)
}

fn render(status: StatusCode, messages: &ErrorMessages, headers: Option<&HeaderMap>) -> HttpResponse {
    let body = json!({
        "code": status.as_u16(),
        "status": reason(status),
        "messages": messages,
    });

    let mut response = json_response(status, &body);
    if let Some(headers) = headers {
        for (name, value) in headers {
            response.headers_mut().append(name.clone(), value.clone());
        }
    }
    response
}

fn reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Error")
}

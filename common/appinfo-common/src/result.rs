//! Plain-text HTTP response helpers
//!
//! Every response the listener produces is line-oriented UTF-8 text,
//! so the helpers here fix the status and content type in one place.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// Content type of every body the listener writes
pub const TEXT_PLAIN_UTF_8: &str = "text/plain; charset=UTF-8";

/// Create a `200 OK` plain text response
///
/// # Example
///
/// ```rust,ignore
/// use appinfo_common::text_success;
///
/// async fn handler() -> Response {
///     text_success("os.name: Linux")
/// }
/// ```
pub fn text_success(text: impl Into<String>) -> Response {
    text_response(StatusCode::OK, text)
}

/// Create a plain text response with an explicit status
pub fn text_response(status: StatusCode, text: impl Into<String>) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, TEXT_PLAIN_UTF_8)],
        text.into(),
    )
        .into_response()
}

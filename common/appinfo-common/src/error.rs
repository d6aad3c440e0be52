//! Error description utilities
//!
//! Transports never fail a connection because producing the body failed;
//! they answer with a readable description of what went wrong instead.

use std::any::Any;
use std::error::Error;

/// Render an error and its whole `source()` chain, one cause per line
///
/// # Example
///
/// ```rust,ignore
/// use appinfo_common::describe_error;
///
/// let text = describe_error(&err);
/// assert!(text.starts_with(&err.to_string()));
/// ```
pub fn describe_error(err: &(dyn Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut cause = err.source();
    while let Some(source) = cause {
        text.push_str("\nCaused by: ");
        text.push_str(&source.to_string());
        cause = source.source();
    }
    text
}

/// Render a panic payload captured from a worker thread or task
pub fn describe_panic(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {}", message)
    } else {
        "panicked with a non-string payload".to_string()
    }
}

/// Extension trait turning a fallible body into a body that always exists
///
/// # Example
///
/// ```rust,ignore
/// use appinfo_common::ResultExt;
///
/// let body = collector.pretty_print().or_describe();
/// ```
pub trait ResultExt {
    /// Return the value, or the error's description in its place
    fn or_describe(self) -> String;
}

impl<E> ResultExt for Result<String, E>
where
    E: Error + 'static,
{
    fn or_describe(self) -> String {
        self.unwrap_or_else(|e| describe_error(&e))
    }
}

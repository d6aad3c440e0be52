//! appinfo Common - Shared utilities for appinfo binaries and transports
//!
//! This crate provides functionality used by every front end of the
//! diagnostics collector:
//!
//! - **Initialization**: [`init_tracing`] for standardized logging to stderr
//! - **Errors**: [`describe_error`] / [`ResultExt`] for turning failures into readable text
//! - **Results**: [`text_success`] for `text/plain; charset=UTF-8` responses
//!
//! # Example
//!
//! ```rust,ignore
//! use appinfo_common::{init_tracing, text_success, ResultExt};
//!
//! init_tracing("appinfo", 1)?;
//!
//! async fn handler(collector: Arc<Collector>) -> Response {
//!     text_success(collector.pretty_print().or_describe())
//! }
//! ```

pub mod error;
pub mod init;
pub mod result;

// Re-export commonly used items at crate root
pub use error::{describe_error, describe_panic, ResultExt};
pub use init::{default_directive, init_tracing};
pub use result::{text_response, text_success, TEXT_PLAIN_UTF_8};

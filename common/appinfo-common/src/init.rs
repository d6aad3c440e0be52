//! Tracing initialization
//!
//! Provides the standardized tracing setup shared by the appinfo binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map a `-v` count to the default level directive for `crate_name`.
///
/// `0` is warn, `1` info, `2` debug, anything above is trace.
pub fn default_directive(crate_name: &str, verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("{}={}", crate_name, level)
}

/// Initialize tracing/logging
///
/// Sets up logging to stderr (stdout carries the rendered snapshot) with:
/// - Formatted output without ANSI colors (for clean logs)
/// - Environment-based filtering via RUST_LOG
/// - A default directive for `crate_name` derived from `verbosity`
///
/// Set `LOG_FORMAT=json` for structured JSON output (useful for production/log aggregation).
/// Default is human-readable text output.
///
/// # Example
///
/// ```rust,ignore
/// appinfo_common::init_tracing("appinfo", 1)?;
/// ```
pub fn init_tracing(crate_name: &str, verbosity: u8) -> anyhow::Result<()> {
    let directive = default_directive(crate_name, verbosity);
    let filter = EnvFilter::from_default_env().add_directive(directive.parse()?);

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_levels() {
        assert_eq!(default_directive("appinfo", 0), "appinfo=warn");
        assert_eq!(default_directive("appinfo", 1), "appinfo=info");
        assert_eq!(default_directive("appinfo", 2), "appinfo=debug");
        assert_eq!(default_directive("appinfo", 7), "appinfo=trace");
    }

    #[test]
    fn test_default_directive_parses() {
        let directive = default_directive("appinfo", 1);
        assert!(directive.parse::<tracing_subscriber::filter::Directive>().is_ok());
    }
}

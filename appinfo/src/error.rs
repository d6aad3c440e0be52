use thiserror::Error;

use crate::component::InfoSource;

/// Why a single info source could not finish
///
/// Never escapes [`crate::Collector::collect`]; the collector logs it and
/// moves on to the next source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Failed to read a file from disk.
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Encountered a parsing error while extracting a value.
    #[error("failed to parse {location}: {reason}")]
    Parse { location: String, reason: String },

    /// A required field was not present in some platform data.
    #[error("missing field {field} in {location}")]
    MissingField { field: String, location: String },

    /// The platform does not offer this kind of introspection.
    #[error("unsupported on this platform: {0}")]
    Unsupported(String),

    /// The platform offers it, but refused or returned nothing usable.
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl SourceError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        SourceError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(location: impl Into<String>, reason: impl Into<String>) -> Self {
        SourceError::Parse {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub fn missing(field: impl Into<String>, location: impl Into<String>) -> Self {
        SourceError::MissingField {
            field: field.into(),
            location: location.into(),
        }
    }
}

/// Result type of a gathering routine
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Failure of a whole collection
///
/// Only raised for key-namespace bugs; ordinary platform trouble is
/// absorbed per source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectError {
    #[error("duplicate key '{key}' written by the {info_source} source")]
    DuplicateKey {
        key: String,
        info_source: InfoSource,
    },
}

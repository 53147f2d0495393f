//! Test error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the in-memory [`TestClient`](crate::TestClient) and the
/// response wrapper.
#[derive(Debug, Error)]
pub enum TestError {
    /// Request building failed.
    #[error("Request build error: {0}")]
    RequestBuild(String),

    /// Response body reading failed.
    #[error("Body read error: {0}")]
    BodyRead(String),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A query parameter leaf that cannot be sent on the wire.
///
/// Only strings, integers and floats have a query-string representation.
/// Booleans in particular must be spelled out by the test author (e.g.
/// `"true"` or `"1"`) so that the test states what the server receives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Test query parameter at {path} is not a string, integer or float.")]
pub struct InvalidQueryLeaf {
    /// Bracketed key path of the offending value, e.g. `filter[archived]`.
    pub path: String,
}

/// Errors that can occur while loading a [`TestConfig`](crate::TestConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Invalid configuration value.
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// The field with the invalid value.
        field: String,
        /// Explanation of why the value is invalid.
        reason: String,
    },
}

impl ConfigError {
    /// Create a new read error.
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Create a new invalid value error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TestError::RequestBuild("Invalid URI: empty string".to_string());
        assert_eq!(err.to_string(), "Request build error: Invalid URI: empty string");
    }

    #[test]
    fn test_json_error_has_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = TestError::from(json_err);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_invalid_leaf_names_path() {
        let err = InvalidQueryLeaf {
            path: "filter[archived]".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Test query parameter at filter[archived] is not a string, integer or float."
        );
    }

    #[test]
    fn test_invalid_value_error() {
        let err = ConfigError::invalid_value("boundary_length", "must be at least 8");
        assert!(err.to_string().contains("boundary_length"));
        assert!(err.to_string().contains("at least 8"));
    }
}

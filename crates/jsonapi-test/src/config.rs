//! Builder configuration.
//!
//! Projects whose API negotiates a non-default media type (profiles,
//! extensions) can keep the defaults in a TOML file next to their tests
//! instead of repeating `.accept(..)` on every request:
//!
//! ```toml
//! accept = "application/vnd.api+json; ext=\"https://jsonapi.org/ext/atomic\""
//! content_type = "application/vnd.api+json"
//! boundary_prefix = "----TestBoundary"
//! boundary_length = 24
//! ```

use crate::boundary::{DEFAULT_BOUNDARY_LENGTH, DEFAULT_BOUNDARY_PREFIX};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The JSON:API media type.
pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Minimum accepted boundary token length.
const MIN_BOUNDARY_LENGTH: usize = 8;

/// Defaults applied to every [`TestBuilder`](crate::TestBuilder).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TestConfig {
    /// Default `Accept` header. An empty string omits the header.
    #[serde(default = "default_media_type")]
    pub accept: String,

    /// Default `Content-Type` header. An empty string omits the header.
    #[serde(default = "default_media_type")]
    pub content_type: String,

    /// Prefix of generated multipart boundaries.
    #[serde(default = "default_boundary_prefix")]
    pub boundary_prefix: String,

    /// Length of the random token appended to the boundary prefix.
    #[serde(default = "default_boundary_length")]
    pub boundary_length: usize,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            accept: default_media_type(),
            content_type: default_media_type(),
            boundary_prefix: default_boundary_prefix(),
            boundary_length: default_boundary_length(),
        }
    }
}

fn default_media_type() -> String {
    JSON_API_MEDIA_TYPE.to_string()
}

fn default_boundary_prefix() -> String {
    DEFAULT_BOUNDARY_PREFIX.to_string()
}

fn default_boundary_length() -> usize {
    DEFAULT_BOUNDARY_LENGTH
}

impl TestConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        tracing::debug!(path = %path.display(), "loaded JSON:API test configuration");
        Self::from_toml_str(&content)
    }

    /// Checks value constraints that the TOML schema cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.boundary_length < MIN_BOUNDARY_LENGTH {
            return Err(ConfigError::invalid_value(
                "boundary_length",
                format!("must be at least {MIN_BOUNDARY_LENGTH}"),
            ));
        }

        if self.boundary_prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::invalid_value(
                "boundary_prefix",
                "must not contain whitespace",
            ));
        }

        Ok(())
    }

    /// The `Accept` header value, `None` when it should be omitted.
    #[must_use]
    pub fn accept_header(&self) -> Option<String> {
        non_empty(&self.accept)
    }

    /// The `Content-Type` header value, `None` when it should be omitted.
    #[must_use]
    pub fn content_type_header(&self) -> Option<String> {
        non_empty(&self.content_type)
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

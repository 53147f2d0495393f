//! Multipart boundary tokens.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Default prefix of generated multipart boundaries.
pub const DEFAULT_BOUNDARY_PREFIX: &str = "----WebKitFormBoundary";

/// Default length of the random part of a boundary.
pub const DEFAULT_BOUNDARY_LENGTH: usize = 15;

/// Source of the random token appended to multipart boundaries.
pub trait BoundarySource: Send {
    /// Returns a fresh token.
    fn token(&mut self) -> String;
}

/// Alphanumeric tokens drawn from the thread-local RNG.
#[derive(Debug, Clone, Copy)]
pub struct RandomBoundary {
    length: usize,
}

impl RandomBoundary {
    /// Creates a source producing tokens of `length` characters.
    #[must_use]
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomBoundary {
    fn default() -> Self {
        Self::new(DEFAULT_BOUNDARY_LENGTH)
    }
}

impl BoundarySource for RandomBoundary {
    fn token(&mut self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}

/// Deterministic tokens: the configured stem followed by a counter.
///
/// Useful when a test needs to assert the exact `Content-Type` header.
#[derive(Debug, Clone)]
pub struct FixedBoundary {
    stem: String,
    counter: u64,
}

impl FixedBoundary {
    /// Creates a source whose first token is `<stem>1`.
    pub fn new(stem: impl Into<String>) -> Self {
        Self {
            stem: stem.into(),
            counter: 0,
        }
    }
}

impl BoundarySource for FixedBoundary {
    fn token(&mut self) -> String {
        self.counter += 1;
        format!("{}{}", self.stem, self.counter)
    }
}

/// Formats a multipart content type for the given boundary.
pub fn multipart_content_type(prefix: &str, token: &str) -> String {
    format!("multipart/form-data; boundary={prefix}{token}")
}

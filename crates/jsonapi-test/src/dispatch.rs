//! The dispatcher contract.
//!
//! A [`Dispatcher`] is whatever actually delivers a request to the
//! application under test: the in-memory [`TestClient`](crate::TestClient),
//! a wrapper around a router's `oneshot`, or a recording mock. The builder
//! only ever calls these two methods.

use bytes::Bytes;
use http::{HeaderMap, Method};
use serde_json::Value;

/// A response as returned by a dispatcher.
pub type RawResponse = http::Response<Bytes>;

/// Sends a fully-built request and returns the application's response.
pub trait Dispatcher {
    /// Failure raised by the dispatcher itself (malformed URI, harness
    /// errors). Returned to the caller of the builder unchanged.
    type Error;

    /// Sends `body` as a JSON document.
    fn send_json(
        &self,
        method: Method,
        uri: &str,
        body: &Value,
        headers: &HeaderMap,
    ) -> Result<RawResponse, Self::Error>;

    /// Sends `payload` as a raw (non-JSON) body, e.g. a form submission.
    ///
    /// `headers` always carries a `Content-Length`.
    fn send_raw(
        &self,
        method: Method,
        uri: &str,
        payload: &Value,
        headers: &HeaderMap,
    ) -> Result<RawResponse, Self::Error>;
}

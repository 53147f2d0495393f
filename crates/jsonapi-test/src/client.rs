//! In-memory dispatcher.

use crate::dispatch::{Dispatcher, RawResponse};
use crate::error::TestError;
use crate::query;
use crate::request::TestRequest;
use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Handler function type for test client.
pub type TestHandler = Arc<dyn Fn(TestRequest) -> RawResponse + Send + Sync>;

/// A [`Dispatcher`] that hands requests straight to a handler function.
///
/// No server is started and no port is bound; the handler plays the part
/// of the application.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use jsonapi_test::{MakesJsonApiRequests, TestClient};
///
/// let client = TestClient::new(|_req| {
///     http::Response::builder()
///         .status(200)
///         .header("content-type", "application/vnd.api+json")
///         .body(Bytes::from(r#"{"data":{"type":"posts","id":"1"}}"#))
///         .unwrap()
/// });
///
/// let response = client.json_api_expecting("posts").get("/api/v1/posts/1").unwrap();
/// assert_eq!(response.id().as_deref(), Some("1"));
/// ```
#[must_use]
#[derive(Clone)]
pub struct TestClient {
    /// The handler function to process requests.
    handler: TestHandler,
    /// Default headers to add to all requests.
    default_headers: HeaderMap,
}

impl TestClient {
    /// Creates a new test client with a handler function.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(TestRequest) -> RawResponse + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            default_headers: HeaderMap::new(),
        }
    }

    /// Creates a test client that reflects each request back as JSON.
    ///
    /// The response body has the members `method`, `uri`, `headers`
    /// (lower-cased names) and `body` (the raw request body as text).
    pub fn echo() -> Self {
        Self::new(|req| {
            let headers: Map<String, Value> = req
                .headers
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        Value::String(value.to_str().unwrap_or_default().to_string()),
                    )
                })
                .collect();

            let body = json!({
                "method": req.method.as_str(),
                "uri": req.uri.to_string(),
                "headers": headers,
                "body": String::from_utf8_lossy(&req.body),
            });

            http::Response::builder()
                .status(StatusCode::OK)
                .header(CONTENT_TYPE, "application/json")
                .body(Bytes::from(body.to_string()))
                .unwrap_or_default()
        })
    }

    /// Creates a test client that always returns a fixed response.
    pub fn fixed_response(status: StatusCode, body: impl Into<String>) -> Self {
        let body = Bytes::from(body.into());
        Self::new(move |_req| {
            let mut response = http::Response::new(body.clone());
            *response.status_mut() = status;
            response
        })
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// Headers supplied with a request take precedence.
    ///
    /// # Panics
    ///
    /// Panics if the name or value is not a valid header.
    pub fn with_default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = HeaderName::try_from(name.as_ref()).expect("valid header name");
        let value = HeaderValue::try_from(value.as_ref()).expect("valid header value");
        self.default_headers.insert(name, value);
        self
    }

    fn send(
        &self,
        method: Method,
        uri: &str,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<RawResponse, TestError> {
        let uri: Uri = uri
            .parse()
            .map_err(|e| TestError::RequestBuild(format!("Invalid URI: {e}")))?;

        let mut merged = self.default_headers.clone();
        for (name, value) in headers {
            merged.insert(name.clone(), value.clone());
        }

        if !merged.contains_key(CONTENT_LENGTH) {
            merged.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
        }

        let request = TestRequest {
            method,
            uri,
            headers: merged,
            body,
        };

        Ok((self.handler)(request))
    }
}

impl Dispatcher for TestClient {
    type Error = TestError;

    fn send_json(
        &self,
        method: Method,
        uri: &str,
        body: &Value,
        headers: &HeaderMap,
    ) -> Result<RawResponse, TestError> {
        let bytes = serde_json::to_vec(body)?;
        self.send(method, uri, headers, Bytes::from(bytes))
    }

    fn send_raw(
        &self,
        method: Method,
        uri: &str,
        payload: &Value,
        headers: &HeaderMap,
    ) -> Result<RawResponse, TestError> {
        let encoded = query::encode_form(payload);
        self.send(method, uri, headers, Bytes::from(encoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::TestResponse;

    fn echo_json(client: &TestClient, method: Method, body: &Value) -> Value {
        let raw = client
            .send_json(method, "/test/path?a=1", body, &HeaderMap::new())
            .unwrap();
        TestResponse::from_raw(raw).json_value().unwrap()
    }

    #[test]
    fn test_echo_client() {
        let client = TestClient::echo();
        let json = echo_json(&client, Method::GET, &json!({}));

        assert_eq!(json["method"], "GET");
        assert_eq!(json["uri"], "/test/path?a=1");
        assert_eq!(json["body"], "{}");
        assert_eq!(json["headers"]["content-length"], "2");
    }

    #[test]
    fn test_fixed_response() {
        let client = TestClient::fixed_response(StatusCode::CREATED, "created");
        let raw = client
            .send_json(Method::POST, "/items", &json!({}), &HeaderMap::new())
            .unwrap();

        assert_eq!(raw.status(), StatusCode::CREATED);
        assert_eq!(raw.body().as_ref(), b"created");
    }

    #[test]
    fn test_send_raw_form_encodes() {
        let client = TestClient::echo();
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from(15_usize));

        let raw = client
            .send_raw(
                Method::POST,
                "/forms",
                &json!({ "foo": "bar", "baz": "bat" }),
                &headers,
            )
            .unwrap();
        let json = TestResponse::from_raw(raw).json_value().unwrap();

        assert_eq!(json["body"], "foo=bar&baz=bat");
        assert_eq!(json["headers"]["content-length"], "15");
    }

    #[test]
    fn test_default_headers() {
        let client = TestClient::echo()
            .with_default_header("X-Custom", "default-value")
            .with_default_header("X-Other", "other");

        let mut headers = HeaderMap::new();
        headers.insert("x-other", HeaderValue::from_static("override"));

        let raw = client
            .send_json(Method::GET, "/test", &json!({}), &headers)
            .unwrap();
        let json = TestResponse::from_raw(raw).json_value().unwrap();

        assert_eq!(json["headers"]["x-custom"], "default-value");
        assert_eq!(json["headers"]["x-other"], "override");
    }

    #[test]
    fn test_invalid_uri() {
        let client = TestClient::echo();
        let err = client
            .send_json(Method::GET, "/posts/has space", &json!({}), &HeaderMap::new())
            .unwrap_err();

        assert!(matches!(err, TestError::RequestBuild(_)));
    }

    #[test]
    fn test_custom_handler() {
        let client = TestClient::new(|req| {
            let body = if req.method == Method::GET {
                "GET response"
            } else {
                "Other response"
            };
            http::Response::new(Bytes::from(body))
        });

        let get = client
            .send_json(Method::GET, "/test", &json!({}), &HeaderMap::new())
            .unwrap();
        assert_eq!(get.body().as_ref(), b"GET response");

        let delete = client
            .send_json(Method::DELETE, "/test", &json!({}), &HeaderMap::new())
            .unwrap();
        assert_eq!(delete.body().as_ref(), b"Other response");
    }
}

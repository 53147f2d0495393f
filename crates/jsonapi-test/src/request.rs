//! The request as seen by a test handler.

use crate::error::TestError;
use bytes::Bytes;
use http::{HeaderMap, Method, Uri};

/// A request delivered to a [`TestClient`](crate::TestClient) handler.
#[derive(Debug, Clone)]
pub struct TestRequest {
    /// HTTP method
    pub method: Method,
    /// Request URI
    pub uri: Uri,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Bytes,
}

impl TestRequest {
    /// Gets a header value as a string.
    #[must_use]
    pub fn header_str(&self, name: impl AsRef<str>) -> Option<&str> {
        self.headers
            .get(name.as_ref())
            .and_then(|v| v.to_str().ok())
    }

    /// Returns the body as a string.
    pub fn text(&self) -> Result<String, TestError> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| TestError::BodyRead(format!("Invalid UTF-8: {e}")))
    }

    /// Deserializes the body as a JSON value. An empty body reads as `null`.
    pub fn json_value(&self) -> Result<serde_json::Value, TestError> {
        if self.body.is_empty() {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_slice(&self.body).map_err(TestError::Json)
    }

    /// Converts this request to an HTTP request.
    pub fn into_http_request(self) -> http::Request<Bytes> {
        let mut request = http::Request::new(self.body);
        *request.method_mut() = self.method;
        *request.uri_mut() = self.uri;
        *request.headers_mut() = self.headers;
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn request(body: &'static str) -> TestRequest {
        let mut headers = HeaderMap::new();
        headers.insert("x-test", HeaderValue::from_static("value"));
        TestRequest {
            method: Method::POST,
            uri: Uri::from_static("/api/v1/posts?include=author"),
            headers,
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[test]
    fn test_header_str() {
        assert_eq!(request("").header_str("X-Test"), Some("value"));
        assert_eq!(request("").header_str("X-Missing"), None);
    }

    #[test]
    fn test_json_value() {
        let value = request(r#"{"data":null}"#).json_value().unwrap();
        assert_eq!(value, serde_json::json!({ "data": null }));
        assert_eq!(request("").json_value().unwrap(), serde_json::Value::Null);
    }

    #[test]
    fn test_into_http_request() {
        let http_request = request("x").into_http_request();
        assert_eq!(http_request.method(), Method::POST);
        assert_eq!(http_request.uri().path(), "/api/v1/posts");
        assert_eq!(http_request.uri().query(), Some("include=author"));
        assert_eq!(http_request.headers().get("X-Test").unwrap(), "value");
        assert_eq!(http_request.body().as_ref(), b"x");
    }
}

//! JSON:API test response wrapper.

use crate::dispatch::RawResponse;
use crate::error::TestError;
use crate::identifier::RouteKey;
use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// Identifies an expected resource in the primary data.
///
/// Built from an id alone (the response's expected type is used), a
/// `(type, id)` pair, or an entity via [`ResourceId::route`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId {
    resource_type: Option<String>,
    id: String,
}

impl ResourceId {
    /// An identifier with an explicit resource type.
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: Some(resource_type.into()),
            id: id.into(),
        }
    }

    /// The identifier of an entity, typed by the response's expected type.
    pub fn route(entity: &impl RouteKey) -> Self {
        Self {
            resource_type: None,
            id: entity.route_key(),
        }
    }

    fn resolve(&self, expected_type: Option<&str>) -> (String, String) {
        let resource_type = self
            .resource_type
            .as_deref()
            .or(expected_type)
            .unwrap_or_else(|| {
                panic!(
                    "No resource type for id '{}': call expects() on the builder or pass (type, id)",
                    self.id
                )
            });

        (resource_type.to_string(), self.id.clone())
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self {
            resource_type: None,
            id: id.to_string(),
        }
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self {
            resource_type: None,
            id,
        }
    }
}

impl From<(&str, &str)> for ResourceId {
    fn from((resource_type, id): (&str, &str)) -> Self {
        Self::new(resource_type, id)
    }
}

/// A response with JSON:API-aware accessors and assertions.
///
/// Assertion methods panic on failure and return `&Self` so they can be
/// chained.
pub struct TestResponse {
    /// HTTP status code
    status: StatusCode,
    /// Response headers
    headers: HeaderMap,
    /// Response body bytes
    body: Bytes,
    /// Parsed body, `None` when it is empty or not JSON
    document: Option<Value>,
    /// Resource type the primary data must declare
    expected_type: Option<String>,
}

impl TestResponse {
    /// Wraps a dispatcher response.
    pub fn from_raw(response: RawResponse) -> Self {
        let (parts, body) = response.into_parts();
        Self::new(parts.status, parts.headers, body)
    }

    /// Creates a test response from raw parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        let document = serde_json::from_slice(&body).ok();

        Self {
            status,
            headers,
            body,
            document,
            expected_type: None,
        }
    }

    /// Wraps a dispatcher response and primes it with an expected type.
    ///
    /// # Panics
    ///
    /// Panics if the primary data declares a different type.
    pub fn with_expected_type(mut self, resource_type: impl Into<String>) -> Self {
        self.will_see_type(resource_type);
        self
    }

    /// Records the resource type the primary data must declare.
    ///
    /// When the document carries resource objects as primary data their
    /// `type` members are checked immediately. Error documents and empty
    /// responses are only primed, so later assertions know which type to
    /// match ids against.
    ///
    /// # Panics
    ///
    /// Panics if a resource object in the primary data has another type.
    pub fn will_see_type(&mut self, resource_type: impl Into<String>) -> &mut Self {
        let resource_type = resource_type.into();

        match self.json_api("/data") {
            Some(Value::Object(resource)) => assert_type(resource.get("type"), &resource_type),
            Some(Value::Array(resources)) => {
                for resource in resources {
                    assert_type(resource.get("type"), &resource_type);
                }
            }
            _ => {}
        }

        self.expected_type = Some(resource_type);
        self
    }

    /// Returns the expected resource type, if one was recorded.
    #[must_use]
    pub fn expected_type(&self) -> Option<&str> {
        self.expected_type.as_deref()
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the status code as a u16.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns true if the status is successful (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns a reference to the headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Gets a header value by name.
    #[must_use]
    pub fn header(&self, name: impl AsRef<str>) -> Option<&HeaderValue> {
        self.headers.get(name.as_ref())
    }

    /// Gets a header value as a string.
    #[must_use]
    pub fn header_str(&self, name: impl AsRef<str>) -> Option<&str> {
        self.header(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header_str(header::CONTENT_TYPE.as_str())
    }

    /// Returns the Content-Location header value.
    #[must_use]
    pub fn content_location(&self) -> Option<&str> {
        self.header_str(header::CONTENT_LOCATION.as_str())
    }

    /// Returns the Location header value.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header_str(header::LOCATION.as_str())
    }

    /// Returns the raw body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as a string.
    pub fn text(&self) -> Result<String, TestError> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| TestError::BodyRead(format!("Invalid UTF-8: {e}")))
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        serde_json::from_slice(&self.body).map_err(TestError::Json)
    }

    /// Deserializes the body as a JSON Value.
    pub fn json_value(&self) -> Result<Value, TestError> {
        self.json()
    }

    /// Returns the parsed JSON:API document, if the body is JSON.
    #[must_use]
    pub fn document(&self) -> Option<&Value> {
        self.document.as_ref()
    }

    /// Looks up a member of the document by JSON pointer, e.g. `/data/id`.
    #[must_use]
    pub fn json_api(&self, pointer: &str) -> Option<&Value> {
        self.document.as_ref()?.pointer(pointer)
    }

    /// Returns the resource id from the `/data/id` member.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        match self.json_api("/data/id")? {
            Value::String(id) => Some(id.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Asserts that the status code equals the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}: {}",
            expected,
            self.status,
            self.body_excerpt()
        );
        self
    }

    /// Asserts that the status code equals the expected u16 value.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match.
    pub fn assert_status_code(&self, expected: u16) -> &Self {
        assert_eq!(
            self.status.as_u16(),
            expected,
            "Expected status {}, got {}: {}",
            expected,
            self.status.as_u16(),
            self.body_excerpt()
        );
        self
    }

    /// Asserts that the response is successful (2xx).
    ///
    /// # Panics
    ///
    /// Panics if the status is not 2xx.
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.is_success(),
            "Expected success status, got {}: {}",
            self.status,
            self.body_excerpt()
        );
        self
    }

    /// Asserts that a header exists with the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the header doesn't exist or doesn't match.
    pub fn assert_header(&self, name: impl AsRef<str>, expected: impl AsRef<str>) -> &Self {
        let name = name.as_ref();
        let expected = expected.as_ref();
        let actual = self
            .header_str(name)
            .unwrap_or_else(|| panic!("Header '{}' not found", name));
        assert_eq!(
            actual, expected,
            "Header '{}': expected '{}', got '{}'",
            name, expected, actual
        );
        self
    }

    /// Asserts that the Content-Type header starts with `expected`.
    ///
    /// # Panics
    ///
    /// Panics if Content-Type doesn't match.
    pub fn assert_content_type(&self, expected: impl AsRef<str>) -> &Self {
        let expected = expected.as_ref();
        let actual = self
            .content_type()
            .unwrap_or_else(|| panic!("Content-Type header not found"));
        assert!(
            actual.starts_with(expected),
            "Content-Type: expected '{}', got '{}'",
            expected,
            actual
        );
        self
    }

    /// Asserts that the member at `pointer` equals `expected`.
    ///
    /// # Panics
    ///
    /// Panics if the member doesn't exist or doesn't match.
    pub fn assert_json_field(&self, pointer: &str, expected: &Value) -> &Self {
        let actual = self.json_api(pointer).unwrap_or_else(|| {
            panic!("JSON pointer '{}' not found in: {}", pointer, self.body_excerpt())
        });
        assert_eq!(
            actual, expected,
            "JSON field '{}': expected {}, got {}",
            pointer, expected, actual
        );
        self
    }

    /// Asserts a `200 OK` with a single resource as primary data.
    ///
    /// # Panics
    ///
    /// Panics if the status is not 200 or the resource doesn't match.
    pub fn assert_fetched_one(&self, expected: impl Into<ResourceId>) -> &Self {
        self.assert_status(StatusCode::OK);
        let expected = expected.into().resolve(self.expected_type());
        let data = self.primary_data();
        assert!(
            data.is_object(),
            "Expected a single resource as primary data, got {}",
            data
        );
        assert_eq!(identify(data), expected, "Fetched resource does not match");
        self
    }

    /// Asserts a `200 OK` whose primary data holds exactly the expected
    /// resources, in any order.
    ///
    /// # Panics
    ///
    /// Panics if the status is not 200 or the resources don't match.
    pub fn assert_fetched_many<I>(&self, expected: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Into<ResourceId>,
    {
        self.assert_status(StatusCode::OK);
        let mut expected = self.resolve_all(expected);
        let mut actual = self.primary_identifiers();
        expected.sort();
        actual.sort();
        assert_eq!(actual, expected, "Fetched resources do not match");
        self
    }

    /// Asserts a `200 OK` whose primary data holds exactly the expected
    /// resources, in the given order.
    ///
    /// # Panics
    ///
    /// Panics if the status is not 200 or the resources don't match.
    pub fn assert_fetched_many_in_order<I>(&self, expected: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Into<ResourceId>,
    {
        self.assert_status(StatusCode::OK);
        let expected = self.resolve_all(expected);
        assert_eq!(
            self.primary_identifiers(),
            expected,
            "Fetched resources are not in the expected order"
        );
        self
    }

    /// Asserts a `200 OK` with an empty array as primary data.
    ///
    /// # Panics
    ///
    /// Panics if the status is not 200 or resources were returned.
    pub fn assert_fetched_none(&self) -> &Self {
        self.assert_status(StatusCode::OK);
        assert_eq!(
            self.primary_data(),
            &Value::Array(Vec::new()),
            "Expected no resources"
        );
        self
    }

    /// Asserts a `200 OK` with `null` primary data.
    ///
    /// # Panics
    ///
    /// Panics if the status is not 200 or the primary data is not null.
    pub fn assert_fetched_null(&self) -> &Self {
        self.assert_status(StatusCode::OK);
        assert_eq!(self.primary_data(), &Value::Null, "Expected null primary data");
        self
    }

    /// Asserts the top-level `links` member.
    ///
    /// Strict comparison requires equality; otherwise `expected` must be a
    /// subset of the actual links.
    ///
    /// # Panics
    ///
    /// Panics if the links don't match.
    pub fn assert_links(&self, expected: &Value, strict: bool) -> &Self {
        self.assert_member("/links", expected, strict)
    }

    /// Asserts the top-level `meta` member.
    ///
    /// Strict comparison requires equality; otherwise `expected` must be a
    /// subset of the actual meta.
    ///
    /// # Panics
    ///
    /// Panics if the meta doesn't match.
    pub fn assert_meta(&self, expected: &Value, strict: bool) -> &Self {
        self.assert_member("/meta", expected, strict)
    }

    /// Asserts an error response with the given status and a non-empty
    /// `errors` member.
    ///
    /// # Panics
    ///
    /// Panics if the status differs or no errors were returned.
    pub fn assert_errors(&self, expected: StatusCode) -> &Self {
        self.assert_status(expected);
        let has_errors = self
            .json_api("/errors")
            .and_then(Value::as_array)
            .is_some_and(|errors| !errors.is_empty());
        assert!(
            has_errors,
            "Expected a JSON:API errors document, got: {}",
            self.body_excerpt()
        );
        self
    }

    /// Asserts an error response containing an error object that matches
    /// `expected` (subset comparison).
    ///
    /// # Panics
    ///
    /// Panics if the status differs or no error matches.
    pub fn assert_has_error(&self, status: StatusCode, expected: &Value) -> &Self {
        self.assert_errors(status);
        let errors = self
            .json_api("/errors")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        assert!(
            errors.iter().any(|error| is_subset(expected, error)),
            "No error matching {} in {:?}",
            expected,
            errors
        );
        self
    }

    /// Asserts the response is a page of the expected resources.
    ///
    /// # Panics
    ///
    /// Panics immediately if neither links nor meta are given, and
    /// otherwise if any part of the page doesn't match.
    #[deprecated(note = "use assert_fetched_many(..).assert_meta(..).assert_links(..)")]
    pub fn assert_fetched_page<I>(
        &self,
        expected: I,
        links: Option<&Value>,
        meta: Option<&Value>,
        meta_key: Option<&str>,
        strict: bool,
    ) -> &Self
    where
        I: IntoIterator,
        I::Item: Into<ResourceId>,
    {
        self.assert_page(expected, links, meta, meta_key, strict, false)
    }

    /// Asserts the response is a page of the expected resources, in order.
    ///
    /// # Panics
    ///
    /// Panics immediately if neither links nor meta are given, and
    /// otherwise if any part of the page doesn't match.
    #[deprecated(note = "use assert_fetched_many_in_order(..).assert_meta(..).assert_links(..)")]
    pub fn assert_fetched_page_in_order<I>(
        &self,
        expected: I,
        links: Option<&Value>,
        meta: Option<&Value>,
        meta_key: Option<&str>,
        strict: bool,
    ) -> &Self
    where
        I: IntoIterator,
        I::Item: Into<ResourceId>,
    {
        self.assert_page(expected, links, meta, meta_key, strict, true)
    }

    /// Asserts the response is an empty page.
    ///
    /// # Panics
    ///
    /// Panics immediately if neither links nor meta are given, and
    /// otherwise if any part of the page doesn't match.
    #[deprecated(note = "use assert_fetched_none().assert_meta(..).assert_links(..)")]
    pub fn assert_fetched_empty_page(
        &self,
        links: Option<&Value>,
        meta: Option<&Value>,
        meta_key: Option<&str>,
        strict: bool,
    ) -> &Self {
        self.assert_page(Vec::<ResourceId>::new(), links, meta, meta_key, strict, false)
    }

    fn assert_page<I>(
        &self,
        expected: I,
        links: Option<&Value>,
        meta: Option<&Value>,
        meta_key: Option<&str>,
        strict: bool,
        ordered: bool,
    ) -> &Self
    where
        I: IntoIterator,
        I::Item: Into<ResourceId>,
    {
        let links = links.filter(|v| !is_empty(v));
        let meta = meta.filter(|v| !is_empty(v));

        assert!(
            links.is_some() || meta.is_some(),
            "Expecting links or meta to ensure response is a page."
        );

        if ordered {
            self.assert_fetched_many_in_order(expected);
        } else {
            self.assert_fetched_many(expected);
        }

        if let Some(links) = links {
            self.assert_links(links, strict);
        }

        if let Some(meta) = meta {
            match meta_key {
                Some(key) => {
                    let mut nested = serde_json::Map::new();
                    nested.insert(key.to_string(), meta.clone());
                    self.assert_meta(&Value::Object(nested), strict);
                }
                None => {
                    self.assert_meta(meta, strict);
                }
            }
        }

        self
    }

    fn assert_member(&self, pointer: &str, expected: &Value, strict: bool) -> &Self {
        let actual = self.json_api(pointer).unwrap_or_else(|| {
            panic!("Member '{}' not found in: {}", pointer, self.body_excerpt())
        });

        if strict {
            assert_eq!(actual, expected, "Member '{}' does not match", pointer);
        } else {
            assert!(
                is_subset(expected, actual),
                "Member '{}': expected {} to be contained in {}",
                pointer,
                expected,
                actual
            );
        }

        self
    }

    fn primary_data(&self) -> &Value {
        self.json_api("/data").unwrap_or_else(|| {
            panic!("Document has no primary data: {}", self.body_excerpt())
        })
    }

    fn primary_identifiers(&self) -> Vec<(String, String)> {
        let data = self.primary_data();
        let resources = data
            .as_array()
            .unwrap_or_else(|| panic!("Expected an array as primary data, got {}", data));
        resources.iter().map(identify).collect()
    }

    fn resolve_all<I>(&self, expected: I) -> Vec<(String, String)>
    where
        I: IntoIterator,
        I::Item: Into<ResourceId>,
    {
        expected
            .into_iter()
            .map(|id| id.into().resolve(self.expected_type()))
            .collect()
    }

    fn body_excerpt(&self) -> String {
        const MAX: usize = 500;
        let text = String::from_utf8_lossy(&self.body);
        match text.char_indices().nth(MAX) {
            Some((idx, _)) => format!("{}...", &text[..idx]),
            None => text.into_owned(),
        }
    }
}

impl fmt::Debug for TestResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .field("expected_type", &self.expected_type)
            .finish()
    }
}

fn assert_type(actual: Option<&Value>, expected: &str) {
    let actual = actual.and_then(Value::as_str);
    assert_eq!(
        actual,
        Some(expected),
        "Expected primary data of type '{}'",
        expected
    );
}

/// Extracts `(type, id)` from a resource object.
fn identify(resource: &Value) -> (String, String) {
    let field = |name: &str| match resource.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => panic!("Resource object has no '{}' member: {}", name, resource),
    };

    (field("type"), field("id"))
}

/// Whether `expected` is structurally contained in `actual`.
fn is_subset(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Object(expected), Value::Object(actual)) => expected
            .iter()
            .all(|(key, value)| actual.get(key).is_some_and(|a| is_subset(value, a))),
        (Value::Array(expected), Value::Array(actual)) => {
            expected.len() == actual.len()
                && expected.iter().zip(actual).all(|(e, a)| is_subset(e, a))
        }
        _ => expected == actual,
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_response(status: u16, body: &Value) -> TestResponse {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/vnd.api+json"),
        );
        TestResponse::new(
            StatusCode::from_u16(status).unwrap(),
            headers,
            Bytes::from(body.to_string()),
        )
    }

    fn posts_page() -> TestResponse {
        create_response(
            200,
            &json!({
                "data": [
                    { "type": "posts", "id": "1" },
                    { "type": "posts", "id": "2" }
                ],
                "links": { "first": "/posts?page[number]=1", "next": "/posts?page[number]=2" },
                "meta": { "page": { "currentPage": 1, "perPage": 2 } }
            }),
        )
        .with_expected_type("posts")
    }

    #[test]
    fn test_status() {
        let response = create_response(201, &json!({}));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.status_code(), 201);
        assert!(response.is_success());
    }

    #[test]
    fn test_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::LOCATION, HeaderValue::from_static("/posts/1"));
        headers.insert(header::CONTENT_LOCATION, HeaderValue::from_static("/posts/1"));
        let response = TestResponse::new(StatusCode::CREATED, headers, Bytes::new());

        assert_eq!(response.location(), Some("/posts/1"));
        assert_eq!(response.content_location(), Some("/posts/1"));
        assert_eq!(response.content_type(), None);
        assert!(response.document().is_none());
    }

    #[test]
    fn test_json_api_pointer() {
        let response = create_response(
            200,
            &json!({ "data": { "type": "posts", "id": "1", "attributes": { "title": "Hello" } } }),
        );
        assert_eq!(response.json_api("/data/attributes/title"), Some(&json!("Hello")));
        assert_eq!(response.json_api("/data/attributes/missing"), None);
        assert_eq!(response.id().as_deref(), Some("1"));
    }

    #[test]
    fn test_id_missing() {
        let response = create_response(200, &json!({ "data": null }));
        assert_eq!(response.id(), None);
    }

    #[test]
    fn test_will_see_type_matches() {
        let response = create_response(200, &json!({ "data": { "type": "posts", "id": "1" } }))
            .with_expected_type("posts");
        assert_eq!(response.expected_type(), Some("posts"));
    }

    #[test]
    #[should_panic(expected = "Expected primary data of type 'posts'")]
    fn test_will_see_type_mismatch() {
        let _ = create_response(200, &json!({ "data": { "type": "users", "id": "1" } }))
            .with_expected_type("posts");
    }

    #[test]
    #[should_panic(expected = "Expected primary data of type 'posts'")]
    fn test_will_see_type_mismatch_in_collection() {
        let _ = create_response(
            200,
            &json!({ "data": [{ "type": "posts", "id": "1" }, { "type": "tags", "id": "2" }] }),
        )
        .with_expected_type("posts");
    }

    #[test]
    fn test_will_see_type_on_error_document_only_records() {
        let response = create_response(422, &json!({ "errors": [{ "status": "422" }] }))
            .with_expected_type("posts");
        assert_eq!(response.expected_type(), Some("posts"));
        response.assert_errors(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_assert_fetched_one() {
        let response = create_response(200, &json!({ "data": { "type": "posts", "id": "1" } }))
            .with_expected_type("posts");
        response.assert_fetched_one("1");
        response.assert_fetched_one(("posts", "1"));
    }

    #[test]
    #[should_panic(expected = "No resource type for id '1'")]
    fn test_assert_fetched_one_needs_type() {
        let response = create_response(200, &json!({ "data": { "type": "posts", "id": "1" } }));
        response.assert_fetched_one("1");
    }

    #[test]
    fn test_assert_fetched_many_any_order() {
        posts_page().assert_fetched_many(["2", "1"]);
    }

    #[test]
    fn test_assert_fetched_many_in_order() {
        posts_page().assert_fetched_many_in_order(["1", "2"]);
    }

    #[test]
    #[should_panic(expected = "not in the expected order")]
    fn test_assert_fetched_many_wrong_order() {
        posts_page().assert_fetched_many_in_order(["2", "1"]);
    }

    #[test]
    fn test_assert_fetched_none_and_null() {
        create_response(200, &json!({ "data": [] })).assert_fetched_none();
        create_response(200, &json!({ "data": null })).assert_fetched_null();
    }

    #[test]
    fn test_assert_links_and_meta() {
        let response = posts_page();
        response
            .assert_links(&json!({ "first": "/posts?page[number]=1" }), false)
            .assert_meta(&json!({ "page": { "currentPage": 1, "perPage": 2 } }), true);
    }

    #[test]
    #[should_panic(expected = "Member '/links' does not match")]
    fn test_assert_links_strict() {
        posts_page().assert_links(&json!({ "first": "/posts?page[number]=1" }), true);
    }

    #[test]
    fn test_assert_has_error() {
        let response = create_response(
            422,
            &json!({ "errors": [{ "status": "422", "source": { "pointer": "/data/attributes/title" } }] }),
        );
        response.assert_has_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            &json!({ "source": { "pointer": "/data/attributes/title" } }),
        );
    }

    #[test]
    fn test_assert_json_field() {
        let response = create_response(200, &json!({ "meta": { "count": 3 } }));
        response.assert_json_field("/meta/count", &json!(3));
    }

    #[test]
    #[allow(deprecated)]
    fn test_assert_fetched_page() {
        let links = json!({ "next": "/posts?page[number]=2" });
        let meta = json!({ "currentPage": 1 });
        posts_page().assert_fetched_page(["1", "2"], Some(&links), Some(&meta), Some("page"), false);
        posts_page().assert_fetched_page_in_order(["1", "2"], Some(&links), None, None, false);
    }

    #[test]
    #[allow(deprecated)]
    fn test_assert_fetched_empty_page() {
        let response = create_response(200, &json!({ "data": [], "meta": { "page": { "total": 0 } } }));
        response.assert_fetched_empty_page(None, Some(&json!({ "total": 0 })), Some("page"), true);
    }

    #[test]
    #[allow(deprecated)]
    #[should_panic(expected = "Expecting links or meta to ensure response is a page.")]
    fn test_assert_fetched_page_requires_links_or_meta() {
        posts_page().assert_fetched_page(["1", "2"], Some(&json!({})), None, Some("page"), true);
    }

    #[test]
    fn test_is_subset() {
        assert!(is_subset(&json!({ "a": 1 }), &json!({ "a": 1, "b": 2 })));
        assert!(!is_subset(&json!({ "a": 1, "c": 3 }), &json!({ "a": 1 })));
        assert!(!is_subset(&json!([1]), &json!([1, 2])));
    }

    #[test]
    fn test_body_excerpt_truncates() {
        let body = "x".repeat(600);
        let response = TestResponse::new(StatusCode::OK, HeaderMap::new(), Bytes::from(body));
        assert_eq!(response.body_excerpt().len(), 503);
    }
}

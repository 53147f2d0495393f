//! The JSON:API request builder.

use crate::boundary::{multipart_content_type, BoundarySource, RandomBoundary};
use crate::config::TestConfig;
use crate::dispatch::Dispatcher;
use crate::identifier::normalize;
use crate::query::{self, QueryParams, QueryValue};
use crate::response::TestResponse;
use http::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use serde_json::{json, Value};

const FORM_URL_ENCODED: &str = "application/x-www-form-urlencoded";

/// Query keys whose values may contain entity references.
const ID_KEYS: [&str; 2] = ["filter", "page"];

/// Request body, at most one kind at a time.
#[derive(Debug, Clone, Default)]
enum Body {
    #[default]
    Empty,
    Json(Value),
    Payload(Value),
}

/// Builds and sends one JSON:API request.
///
/// Every configuration method consumes the builder and returns it, so a
/// request reads as a single chain ending in a verb:
///
/// ```
/// use jsonapi_test::{params, MakesJsonApiRequests, TestClient};
///
/// let client = TestClient::echo();
/// let response = client
///     .json_api()
///     .include_paths(["author", "tags"])
///     .filter(params! { "published" => "true" })
///     .get("/api/v1/posts")
///     .unwrap();
///
/// assert_eq!(
///     response.json_api("/uri").unwrap(),
///     "/api/v1/posts?include=author,tags&filter[published]=true"
/// );
/// ```
#[must_use]
pub struct TestBuilder<'a, D: ?Sized> {
    dispatcher: &'a D,
    accept: Option<String>,
    content_type: Option<String>,
    expected_type: Option<String>,
    query: QueryParams,
    headers: HeaderMap,
    body: Body,
    boundary_prefix: String,
    boundary: Box<dyn BoundarySource>,
}

impl<'a, D> TestBuilder<'a, D>
where
    D: Dispatcher + ?Sized,
{
    /// Creates a builder with the default JSON:API media types.
    pub fn new(dispatcher: &'a D) -> Self {
        Self::from_config(dispatcher, &TestConfig::default())
    }

    /// Creates a builder with defaults taken from `config`.
    pub fn from_config(dispatcher: &'a D, config: &TestConfig) -> Self {
        Self {
            dispatcher,
            accept: config.accept_header(),
            content_type: config.content_type_header(),
            expected_type: None,
            query: QueryParams::new(),
            headers: HeaderMap::new(),
            body: Body::Empty,
            boundary_prefix: config.boundary_prefix.clone(),
            boundary: Box::new(RandomBoundary::new(config.boundary_length)),
        }
    }

    /// Replaces the source of multipart boundary tokens.
    pub fn with_boundary_source(mut self, source: impl BoundarySource + 'static) -> Self {
        self.boundary = Box::new(source);
        self
    }

    /// Sets the resource type that is expected in the response body.
    pub fn expects(mut self, resource_type: impl Into<String>) -> Self {
        self.expected_type = Some(resource_type.into());
        self
    }

    /// Sets the `Accept` media type. `None` omits the header.
    pub fn accept(mut self, media_type: Option<&str>) -> Self {
        self.accept = media_type.map(str::to_string);
        self
    }

    /// Sets the `Content-Type` media type. `None` omits the header.
    pub fn content_type(mut self, media_type: Option<&str>) -> Self {
        self.content_type = media_type.map(str::to_string);
        self
    }

    /// Sets the content type to `application/x-www-form-urlencoded`.
    pub fn as_form_url_encoded(self) -> Self {
        self.content_type(Some(FORM_URL_ENCODED))
    }

    /// Sets the content type to multipart form data with a fresh boundary.
    pub fn as_multipart_form_data(mut self) -> Self {
        let token = self.boundary.token();
        self.content_type = Some(multipart_content_type(&self.boundary_prefix, &token));
        self
    }

    /// Merges query parameters into the request.
    ///
    /// Top-level keys replace earlier values for the same key; nested maps
    /// are not merged. Entity references under `filter` and `page` are
    /// resolved to their route keys.
    pub fn query<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<QueryValue>,
    {
        for (key, value) in params {
            let key = key.into();
            let mut value = value.into();

            if ID_KEYS.contains(&key.as_str()) {
                value = normalize(value);
            }

            self.query.insert(key, value);
        }

        self
    }

    /// Sets the include paths, replacing any earlier ones.
    pub fn include_paths<I>(mut self, paths: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.query.insert("include".to_string(), join(paths).into());
        self
    }

    /// Sets the sparse fieldset for one resource type.
    ///
    /// Fieldsets for other resource types are kept.
    pub fn sparse_fields<I>(mut self, resource_type: impl Into<String>, field_names: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let fields = join(field_names);
        self.nested_map("fields")
            .insert(resource_type.into(), fields.into());
        self
    }

    /// Sets the filter parameters, replacing any earlier filter.
    ///
    /// Entity references are resolved to their route keys.
    pub fn filter<I, K, V>(mut self, filter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<QueryValue>,
    {
        self.query
            .insert("filter".to_string(), normalize(collect_map(filter)));
        self
    }

    /// Sets a single filter, keeping the other filter keys.
    pub fn filter_id(mut self, key: impl Into<String>, id: impl Into<QueryValue>) -> Self {
        let id = normalize(id.into());
        self.nested_map("filter").insert(key.into(), id);
        self
    }

    /// Sets a single list-valued filter, keeping the other filter keys.
    pub fn filter_ids<I>(mut self, key: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<QueryValue>,
    {
        let ids = normalize(QueryValue::List(ids.into_iter().map(Into::into).collect()));
        self.nested_map("filter").insert(key.into(), ids);
        self
    }

    /// Sets the sort fields, replacing any earlier ones.
    pub fn sort<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.query.insert("sort".to_string(), join(fields).into());
        self
    }

    /// Sets the pagination parameters, replacing any earlier ones.
    ///
    /// Entity references (e.g. a cursor resource) are resolved to their
    /// route keys.
    pub fn page<I, K, V>(mut self, page: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<QueryValue>,
    {
        self.query
            .insert("page".to_string(), normalize(collect_map(page)));
        self
    }

    /// Sets the request document to `{"data": data}`.
    ///
    /// `None` (or any value serializing to `null`) sends `{"data": null}`.
    ///
    /// # Panics
    ///
    /// Panics if `data` cannot be serialized to JSON.
    pub fn with_data(self, data: impl Serialize) -> Self {
        let data = serde_json::to_value(data).expect("JSON serialization should succeed");
        self.with_json(json!({ "data": data }))
    }

    /// Sets the JSON request document, replacing any earlier body.
    ///
    /// # Panics
    ///
    /// Panics if `document` cannot be serialized to JSON.
    pub fn with_json(mut self, document: impl Serialize) -> Self {
        let document = serde_json::to_value(document).expect("JSON serialization should succeed");
        self.body = Body::Json(document);
        self
    }

    /// Sets a raw payload for a non-JSON:API request, replacing any
    /// earlier body.
    ///
    /// # Panics
    ///
    /// Panics if `payload` cannot be serialized.
    pub fn with_payload(mut self, payload: impl Serialize) -> Self {
        let payload = serde_json::to_value(payload).expect("payload serialization should succeed");
        self.body = Body::Payload(payload);
        self
    }

    /// Merges headers into the request.
    ///
    /// # Panics
    ///
    /// Panics if a name or value is not a valid header.
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in headers {
            let (name, value) = parse_header(name.as_ref(), value.as_ref());
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets a single header.
    ///
    /// # Panics
    ///
    /// Panics if the name or value is not a valid header.
    pub fn with_header(self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.with_headers([(name, value)])
    }

    /// Returns the accumulated query parameters.
    #[must_use]
    pub fn query_params(&self) -> &QueryParams {
        &self.query
    }

    /// Returns the headers set with [`with_header`](Self::with_header) and
    /// [`with_headers`](Self::with_headers).
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the expected resource type, if any.
    #[must_use]
    pub fn expected_type(&self) -> Option<&str> {
        self.expected_type.as_deref()
    }

    /// Sends a GET request.
    pub fn get(self, uri: &str) -> Result<TestResponse, D::Error> {
        self.call(Method::GET, uri, &[])
    }

    /// Sends a POST request.
    pub fn post(self, uri: &str) -> Result<TestResponse, D::Error> {
        self.call(Method::POST, uri, &[])
    }

    /// Sends a PATCH request.
    pub fn patch(self, uri: &str) -> Result<TestResponse, D::Error> {
        self.call(Method::PATCH, uri, &[])
    }

    /// Sends a PUT request.
    pub fn put(self, uri: &str) -> Result<TestResponse, D::Error> {
        self.call(Method::PUT, uri, &[])
    }

    /// Sends a DELETE request.
    pub fn delete(self, uri: &str) -> Result<TestResponse, D::Error> {
        self.call(Method::DELETE, uri, &[])
    }

    /// Sends the request.
    ///
    /// `headers` take precedence over every other header source.
    /// Dispatcher errors are returned as they are.
    ///
    /// # Panics
    ///
    /// Panics before dispatching if a query parameter is not a string,
    /// integer or float, or if a header is invalid. Panics after
    /// dispatching if the response's primary data is not of the expected
    /// resource type.
    pub fn call(
        self,
        method: Method,
        uri: &str,
        headers: &[(&str, &str)],
    ) -> Result<TestResponse, D::Error> {
        let uri = self.build_uri(uri);
        let headers = self.build_headers(headers);

        let raw = match &self.body {
            Body::Payload(payload) => {
                let mut headers = headers;
                if !headers.contains_key(CONTENT_LENGTH) {
                    let length = query::encode_form(payload).len();
                    headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
                }

                tracing::debug!(%method, %uri, mode = "raw", "dispatching JSON:API test request");
                self.dispatcher.send_raw(method, &uri, payload, &headers)?
            }
            Body::Json(document) => {
                tracing::debug!(%method, %uri, mode = "json", "dispatching JSON:API test request");
                self.dispatcher.send_json(method, &uri, document, &headers)?
            }
            Body::Empty => {
                tracing::debug!(%method, %uri, mode = "json", "dispatching JSON:API test request");
                self.dispatcher
                    .send_json(method, &uri, &Value::Object(serde_json::Map::new()), &headers)?
            }
        };

        let response = TestResponse::from_raw(raw);

        Ok(match self.expected_type {
            Some(resource_type) => response.with_expected_type(resource_type),
            None => response,
        })
    }

    fn build_uri(&self, uri: &str) -> String {
        if self.query.is_empty() {
            return uri.to_string();
        }

        let encoded = query::encode(&self.query).unwrap_or_else(|err| panic!("{err}"));
        let separator = if uri.contains('?') { '&' } else { '?' };

        format!("{uri}{separator}{encoded}")
    }

    fn build_headers(&self, extra: &[(&str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Some(accept) = &self.accept {
            headers.insert(ACCEPT, parse_header(ACCEPT.as_str(), accept).1);
        }

        if let Some(content_type) = &self.content_type {
            headers.insert(CONTENT_TYPE, parse_header(CONTENT_TYPE.as_str(), content_type).1);
        }

        for (name, value) in &self.headers {
            headers.insert(name.clone(), value.clone());
        }

        for (name, value) in extra {
            let (name, value) = parse_header(name, value);
            headers.insert(name, value);
        }

        headers
    }

    /// Returns the nested map stored under `key`, creating it if the key
    /// is missing or holds something else.
    fn nested_map(&mut self, key: &str) -> &mut QueryParams {
        let entry = self
            .query
            .entry(key.to_string())
            .or_insert_with(|| QueryValue::Map(QueryParams::new()));

        if !matches!(entry, QueryValue::Map(_)) {
            *entry = QueryValue::Map(QueryParams::new());
        }

        match entry {
            QueryValue::Map(map) => map,
            _ => unreachable!("entry was just replaced by a map"),
        }
    }
}

fn join<I>(values: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    values
        .into_iter()
        .map(|value| value.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn collect_map<I, K, V>(params: I) -> QueryValue
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<QueryValue>,
{
    QueryValue::Map(
        params
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect(),
    )
}

fn parse_header(name: &str, value: &str) -> (HeaderName, HeaderValue) {
    let name = HeaderName::try_from(name).expect("valid header name");
    let value = HeaderValue::try_from(value).expect("valid header value");
    (name, value)
}

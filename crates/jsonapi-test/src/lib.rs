//! # JSON:API Test
//!
//! Test utilities for HTTP APIs that follow the [JSON:API] specification.
//!
//! A [`TestBuilder`] accumulates the parts of a JSON:API request (media
//! types, include paths, sparse fieldsets, filters, sorting, pagination,
//! a document or raw payload) and sends it through a [`Dispatcher`]. The
//! response comes back as a [`TestResponse`] with JSON:API-aware accessors
//! and assertions.
//!
//! ## Key Features
//!
//! - **Fluent Builder**: one chain per request, ending in an HTTP verb
//! - **Canonical Query Encoding**: `include=author,tags`, `filter[author]=1`,
//!   `fields[posts]=title,slug`
//! - **Entity References**: anything implementing [`RouteKey`] can be used
//!   directly in filters and pagination
//! - **Fail Fast**: booleans and other unencodable query values fail the
//!   test before anything is sent
//! - **In-Memory Client**: [`TestClient`] runs a handler function without a
//!   server or port
//!
//! ## Example
//!
//! ```
//! use jsonapi_test::{params, MakesJsonApiRequests, TestClient};
//!
//! let client = TestClient::echo();
//!
//! let response = client
//!     .json_api()
//!     .include_paths(["author"])
//!     .sparse_fields("posts", ["title", "slug"])
//!     .page(params! { "number" => 1, "size" => 10 })
//!     .get("/api/v1/posts")
//!     .unwrap();
//!
//! response.assert_status_code(200);
//! assert_eq!(
//!     response.json_api("/uri").unwrap(),
//!     "/api/v1/posts?include=author&fields[posts]=title,slug&page[number]=1&page[size]=10"
//! );
//! ```
//!
//! [JSON:API]: https://jsonapi.org

#![doc(html_root_url = "https://docs.rs/jsonapi-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod boundary;
mod builder;
mod client;
mod config;
mod dispatch;
mod error;
mod identifier;
pub mod logging;
pub mod query;
mod request;
mod requests;
mod response;

pub use boundary::{BoundarySource, FixedBoundary, RandomBoundary};
pub use builder::TestBuilder;
pub use client::{TestClient, TestHandler};
pub use config::{TestConfig, JSON_API_MEDIA_TYPE};
pub use dispatch::{Dispatcher, RawResponse};
pub use error::{ConfigError, InvalidQueryLeaf, TestError};
pub use identifier::{normalize, RouteKey, RouteRef};
pub use query::{QueryParams, QueryValue};
pub use request::TestRequest;
pub use requests::MakesJsonApiRequests;
pub use response::{ResourceId, TestResponse};

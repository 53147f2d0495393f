//! Builder entry points on dispatchers.

use crate::builder::TestBuilder;
use crate::dispatch::Dispatcher;

/// Starts JSON:API requests from any [`Dispatcher`].
///
/// Implemented for every dispatcher, so bringing the trait into scope is
/// enough:
///
/// ```
/// use jsonapi_test::{MakesJsonApiRequests, TestClient};
///
/// let client = TestClient::echo();
/// let response = client.json_api().get("/api/v1/posts").unwrap();
/// response.assert_status_code(200);
/// ```
pub trait MakesJsonApiRequests: Dispatcher {
    /// Creates a fresh builder bound to this dispatcher.
    fn json_api(&self) -> TestBuilder<'_, Self> {
        TestBuilder::new(self)
    }

    /// Creates a fresh builder expecting `resource_type` in the response.
    fn json_api_expecting(&self, resource_type: &str) -> TestBuilder<'_, Self> {
        self.json_api().expects(resource_type)
    }
}

impl<D: Dispatcher + ?Sized> MakesJsonApiRequests for D {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TestClient;

    #[test]
    fn test_json_api_is_fresh() {
        let client = TestClient::echo();
        let builder = client.json_api();
        assert!(builder.query_params().is_empty());
        assert!(builder.headers().is_empty());
        assert_eq!(builder.expected_type(), None);
    }

    #[test]
    fn test_json_api_expecting() {
        let client = TestClient::echo();
        assert_eq!(client.json_api_expecting("posts").expected_type(), Some("posts"));
    }
}

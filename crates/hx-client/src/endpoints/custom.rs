//! Raw requests against arbitrary API paths
//!
//! Escape hatch for endpoints without a dedicated wrapper; requests still
//! flow through the shared rate limiter and response handler.

use super::{impl_endpoint_base, EndpointBase};
use crate::limit::RateLimiter;
use crate::transport::Transport;
use hx_core::Result;
use serde_json::Value;
use std::sync::Arc;

/// Raw access to one API path prefix
pub struct CustomEndpoints {
    transport: Arc<Transport>,
    limiter: Arc<RateLimiter>,
    endpoint: String,
}

impl CustomEndpoints {
    /// Create a custom endpoint rooted at `endpoint` (relative to the API
    /// root, e.g. `monitor/`)
    pub fn new(transport: Arc<Transport>, limiter: Arc<RateLimiter>, endpoint: &str) -> Self {
        Self { transport, limiter, endpoint: endpoint.trim_start_matches('/').to_string() }
    }

    fn join(&self, url_params: &str) -> String {
        format!("{}{}", self.endpoint, url_params)
    }

    /// Send a GET request with extra path segments and query parameters
    pub async fn get(&self, url_params: &str, params: &[(&str, String)]) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport.get(&self.join(url_params), params).await
    }

    /// Send a POST request with query parameters and a JSON body
    pub async fn post(
        &self,
        url_params: &str,
        params: &[(&str, String)],
        data: &Value,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport.post(&self.join(url_params), params, data).await
    }

    /// Send a DELETE request with extra path segments and query parameters
    pub async fn delete(&self, url_params: &str, params: &[(&str, String)]) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport.delete(&self.join(url_params), params).await
    }
}

impl_endpoint_base!(CustomEndpoints);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::test_support::harness;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_joins_endpoint_and_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/widget/info/all"))
            .and(query_param("flavor", "blue"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"widgets": 3})))
            .expect(1)
            .mount(&server)
            .await;

        let (transport, limiter) = harness(&server.uri());
        let custom = CustomEndpoints::new(transport, limiter, "widget/");
        let response =
            custom.get("info/all", &[("flavor", "blue".to_string())]).await.unwrap();
        assert_eq!(response["widgets"], 3);
    }
}

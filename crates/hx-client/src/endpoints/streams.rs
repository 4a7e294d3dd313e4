//! Realtime stream endpoints

use super::{impl_endpoint_base, EndpointBase};
use crate::limit::RateLimiter;
use crate::transport::Transport;
use hx_core::Result;
use hx_models::responses::{StreamList, StreamPostsResponse};
use std::sync::Arc;

/// Maximum posts returned by a single stream poll
pub const MAX_STREAM_COUNT: u32 = 100;

/// Realtime stream endpoints
pub struct StreamEndpoints {
    transport: Arc<Transport>,
    limiter: Arc<RateLimiter>,
}

impl StreamEndpoints {
    /// Create a new stream endpoints instance
    pub fn new(transport: Arc<Transport>, limiter: Arc<RateLimiter>) -> Self {
        Self { transport, limiter }
    }

    /// Drain up to `count` posts from a stream.
    ///
    /// Counts above the platform maximum of 100 are clamped.
    pub async fn posts(&self, stream_id: i64, count: u32) -> Result<StreamPostsResponse> {
        self.wait_for_slot().await;
        let count = count.min(MAX_STREAM_COUNT);
        self.transport
            .get(&format!("stream/{stream_id}/posts"), &[("count", count.to_string())])
            .await
    }

    /// List the realtime streams available to a team
    pub async fn stream_list(&self, team_id: i64) -> Result<StreamList> {
        self.wait_for_slot().await;
        self.transport.get("stream/list/", &[("teamid", team_id.to_string())]).await
    }
}

impl_endpoint_base!(StreamEndpoints);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::test_support::harness;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_posts_clamps_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stream/5/posts"))
            .and(query_param("count", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "posts": [],
                "totalPostsAvailable": 0
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (transport, limiter) = harness(&server.uri());
        let streams = StreamEndpoints::new(transport, limiter);
        let response = streams.posts(5, 500).await.unwrap();
        assert_eq!(response.total_posts_available, 0);
    }

    #[tokio::test]
    async fn test_stream_list_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stream/list/"))
            .and(query_param("teamid", "9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "streams": [{"id": 31, "name": "breaking"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (transport, limiter) = harness(&server.uri());
        let streams = StreamEndpoints::new(transport, limiter);
        let list = streams.stream_list(9).await.unwrap();
        assert_eq!(list.streams[0].id, 31);
    }
}

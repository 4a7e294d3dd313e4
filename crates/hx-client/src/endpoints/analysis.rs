//! Ad-hoc analysis endpoints
//!
//! Submits query tasks against 24 hours of social data and polls for their
//! completion.

use super::{impl_endpoint_base, EndpointBase};
use crate::limit::RateLimiter;
use crate::transport::Transport;
use hx_core::{Error, Result};
use hx_models::analysis::AnalysisRequest;
use hx_models::responses::AnalysisStatus;
use serde_json::Value;
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::debug;

/// Default delay between completion polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default hard cap on completion polls
pub const DEFAULT_MAX_POLLS: u32 = 120;

/// Ad-hoc analysis endpoints
pub struct AnalysisEndpoints {
    transport: Arc<Transport>,
    limiter: Arc<RateLimiter>,
}

impl AnalysisEndpoints {
    /// Create a new analysis endpoints instance
    pub fn new(transport: Arc<Transport>, limiter: Arc<RateLimiter>) -> Self {
        Self { transport, limiter }
    }

    /// Submit a query task against 24 hours of social data
    pub async fn submit(&self, request: &AnalysisRequest) -> Result<AnalysisStatus> {
        self.wait_for_slot().await;
        self.transport.post("results", &[], request).await
    }

    /// Retrieve the status of an analysis task and, once complete, its
    /// results
    pub async fn results(&self, request_id: i64) -> Result<AnalysisStatus> {
        self.wait_for_slot().await;
        self.transport.get(&format!("results/{request_id}"), &[]).await
    }

    /// Poll an analysis task at a fixed interval until it leaves the
    /// pending state.
    ///
    /// There is no backoff; the loop stops with an error once `max_polls`
    /// requests have been made without the task completing.
    pub async fn wait_for_completion(
        &self,
        request_id: i64,
        poll_interval: Duration,
        max_polls: u32,
    ) -> Result<AnalysisStatus> {
        for poll in 0..max_polls.max(1) {
            let status = self.results(request_id).await?;
            if !status.is_pending() {
                return Ok(status);
            }
            debug!("analysis {request_id} still pending (poll {poll})");
            sleep(poll_interval).await;
        }
        Err(Error::Api(format!(
            "analysis {request_id} still pending after {max_polls} polls"
        )))
    }

    /// Get object, scene, and activity predictions for an image at a
    /// public url
    pub async fn image_analysis(&self, url: &str) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport.get("imageanalysis", &[("url", url.to_string())]).await
    }
}

impl_endpoint_base!(AnalysisEndpoints);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::test_support::harness;
    use hx_models::analysis::{AnalysisRequestInput, AnalysisType, DocumentSource};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> AnalysisRequest {
        AnalysisRequest::new(AnalysisRequestInput {
            analysis: vec![AnalysisType::Volume],
            keywords: "iPhone".to_string(),
            sources: vec![DocumentSource::Twitter],
            start_date: "2016-09-20T00:00:00".to_string(),
            end_date: "2016-09-20T12:00:00".to_string(),
            timezone: "America/New_York".to_string(),
            request_usage: true,
            gender: None,
            languages: None,
            locations: None,
        })
        .expect("valid request")
    }

    #[tokio::test]
    async fn test_submit_posts_request_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/results"))
            .and(body_partial_json(json!({"keywords": "iPhone", "analysis": ["volume"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "WAITING",
                "resultId": 77
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (transport, limiter) = harness(&server.uri());
        let analysis = AnalysisEndpoints::new(transport, limiter);
        let status = analysis.submit(&request()).await.unwrap();
        assert!(status.is_pending());
        assert_eq!(status.result_id, Some(77));
    }

    #[tokio::test]
    async fn test_wait_for_completion_stops_at_poll_cap() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/results/77"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "WAITING"})))
            .expect(3)
            .mount(&server)
            .await;

        let (transport, limiter) = harness(&server.uri());
        let analysis = AnalysisEndpoints::new(transport, limiter);
        let err =
            analysis.wait_for_completion(77, Duration::from_millis(1), 3).await.unwrap_err();
        assert!(err.to_string().contains("after 3 polls"));
    }

    #[tokio::test]
    async fn test_wait_for_completion_returns_terminal_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/results/78"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "COMPLETED",
                "results": {"volume": []}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (transport, limiter) = harness(&server.uri());
        let analysis = AnalysisEndpoints::new(transport, limiter);
        let status =
            analysis.wait_for_completion(78, Duration::from_millis(1), 10).await.unwrap();
        assert_eq!(status.status.as_deref(), Some("COMPLETED"));
        assert!(status.results.is_some());
    }
}

//! Custom content upload endpoints
//!
//! Uploads validated document collections for analysis in the ForSight
//! platform, and manages custom content sources and previously uploaded
//! batches.

use super::{impl_endpoint_base, EndpointBase};
use crate::limit::RateLimiter;
use crate::transport::Transport;
use hx_core::{Result, UPLOAD_BATCH_SIZE};
use hx_models::responses::{BatchResponses, UploadResponse};
use hx_models::upload::{ContentDeleteItem, UploadCollection, UploadItem};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// Custom content upload endpoints
pub struct ContentEndpoints {
    transport: Arc<Transport>,
    limiter: Arc<RateLimiter>,
}

impl ContentEndpoints {
    /// Create a new content endpoints instance
    pub fn new(transport: Arc<Transport>, limiter: Arc<RateLimiter>) -> Self {
        Self { transport, limiter }
    }

    /// Upload a collection of custom content.
    ///
    /// Collections larger than the platform's 1000-document limit are split
    /// into consecutive batches submitted sequentially; responses are keyed
    /// by batch index. The first failing batch aborts the remainder, and
    /// batches already applied remotely stay applied.
    ///
    /// # Arguments
    ///
    /// * `document_type` - id of the document type the uploads belong to
    /// * `items` - validated collection of documents
    pub async fn upload(
        &self,
        document_type: i64,
        items: &UploadCollection,
    ) -> Result<BatchResponses<UploadResponse>> {
        if items.len() > UPLOAD_BATCH_SIZE {
            info!(
                "More than {UPLOAD_BATCH_SIZE} items found. Uploading in batches of {UPLOAD_BATCH_SIZE}"
            );
        }

        let mut responses = BatchResponses::new();
        for (batch_num, batch) in items.chunks(UPLOAD_BATCH_SIZE).enumerate() {
            let response = self.upload_batch(document_type, batch).await?;
            debug!("uploaded batch {batch_num}");
            responses.insert(batch_num, response);
        }
        Ok(responses)
    }

    async fn upload_batch(
        &self,
        document_type: i64,
        items: &[UploadItem],
    ) -> Result<UploadResponse> {
        self.wait_for_slot().await;
        let body = json!({ "items": items });
        self.transport
            .post("content/upload", &[("documentType", document_type.to_string())], &body)
            .await
    }

    /// Delete a single batch of previously uploaded custom content.
    ///
    /// # Arguments
    ///
    /// * `document_type` - id of the document type to delete documents from
    /// * `batch` - id of the document batch to delete
    pub async fn delete_batch(&self, document_type: i64, batch: &str) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport
            .post_params(
                "content/delete",
                &[("documentType", document_type.to_string()), ("batch", batch.to_string())],
            )
            .await
    }

    /// Delete individual custom content documents by guid or url
    pub async fn delete_items(
        &self,
        document_type: i64,
        items: &[ContentDeleteItem],
    ) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport
            .post("content/delete", &[("documentType", document_type.to_string())], items)
            .await
    }

    /// Create a custom content source for a team.
    ///
    /// # Arguments
    ///
    /// * `team_id` - id of the owning team
    /// * `name` - name of the new content source
    /// * `description` - optional human-readable description
    pub async fn create_source(
        &self,
        team_id: i64,
        name: &str,
        description: Option<&str>,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        let mut body = json!({ "teamid": team_id, "name": name });
        if let Some(description) = description {
            body["description"] = json!(description);
        }
        self.transport.post("content/sources", &[], &body).await
    }

    /// Delete a custom content source.
    ///
    /// # Arguments
    ///
    /// * `remove_results` - also remove the results associated with the type
    pub async fn delete_source(&self, document_type: i64, remove_results: bool) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport
            .delete(
                "content/sources",
                &[
                    ("documentType", document_type.to_string()),
                    ("removeResults", remove_results.to_string()),
                ],
            )
            .await
    }

    /// List the custom content sources belonging to a team
    pub async fn list_sources(&self, team_id: i64) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport.get("content/sources/list", &[("team", team_id.to_string())]).await
    }
}

impl_endpoint_base!(ContentEndpoints);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::test_support::harness;
    use hx_models::upload::UploadItemInput;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn collection(count: usize) -> UploadCollection {
        let inputs: Vec<UploadItemInput> = (0..count)
            .map(|i| UploadItemInput {
                title: Some(format!("Title {i}")),
                author: Some("me".to_string()),
                language: Some("en".to_string()),
                date: Some("2010-01-26T16:14:00".to_string()),
                contents: Some("Example content".to_string()),
                guid: Some(format!("guid-{i}")),
                ..Default::default()
            })
            .collect();
        UploadCollection::from_inputs(inputs).expect("valid collection")
    }

    #[tokio::test]
    async fn test_small_collection_uploads_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/content/upload"))
            .and(query_param("documentType", "123"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "success", "uploadCount": 2})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (transport, limiter) = harness(&server.uri());
        let content = ContentEndpoints::new(transport, limiter);
        let responses = content.upload(123, &collection(2)).await.unwrap();

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[&0].upload_count, Some(2));
    }

    #[tokio::test]
    async fn test_large_collection_uploads_in_batches_of_1000() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/content/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
            .expect(3)
            .mount(&server)
            .await;

        let (transport, limiter) = harness(&server.uri());
        let content = ContentEndpoints::new(transport, limiter);
        let responses = content.upload(123, &collection(2500)).await.unwrap();

        // ceil(2500 / 1000) batches, keyed by index
        assert_eq!(responses.len(), 3);
        assert!(responses.contains_key(&0));
        assert!(responses.contains_key(&2));
    }

    #[tokio::test]
    async fn test_failed_batch_aborts_remainder() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/content/upload"))
            .respond_with(ResponseTemplate::new(500).set_body_string("storage offline"))
            .expect(1)
            .mount(&server)
            .await;

        let (transport, limiter) = harness(&server.uri());
        let content = ContentEndpoints::new(transport, limiter);
        let err = content.upload(123, &collection(2500)).await.unwrap_err();
        assert!(err.to_string().contains("storage offline"));
    }

    #[tokio::test]
    async fn test_delete_items_posts_keys() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/content/delete"))
            .and(body_partial_json(json!([{"guid": "This is my guid"}])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
            .expect(1)
            .mount(&server)
            .await;

        let (transport, limiter) = harness(&server.uri());
        let content = ContentEndpoints::new(transport, limiter);
        let items =
            vec![ContentDeleteItem { guid: Some("This is my guid".to_string()), url: None }];
        let response = content.delete_items(123, &items).await.unwrap();
        assert_eq!(response["status"], "success");
    }
}

//! Typed response models for the ForSight API
//!
//! Endpoints whose payloads this workspace interprets get concrete structs.
//! Aggregate metric payloads (word clouds, demographics, geography, social
//! metrics, realtime metrics) vary by monitor configuration and are passed
//! through as raw `serde_json::Value`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bearer token issued by the authenticate endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthToken {
    pub auth: String,

    /// Epoch millis at which the token expires; absent for no-expiration tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,
}

/// A team the requesting user belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
}

/// Response of the team list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamList {
    #[serde(default)]
    pub teams: Vec<Team>,
}

/// One monitor as returned by the monitor list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSummary {
    pub id: i64,
    pub name: String,

    #[serde(rename = "type", default)]
    pub monitor_type: Option<String>,

    #[serde(default)]
    pub enabled: Option<bool>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub results_start: Option<String>,

    #[serde(default)]
    pub results_end: Option<String>,
}

/// Response of the monitor list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorList {
    #[serde(default)]
    pub monitors: Vec<MonitorSummary>,
}

/// An opinion category or emotion defined on a monitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,

    #[serde(default)]
    pub status: Option<String>,
}

/// Detailed monitor metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorDetail {
    pub id: i64,
    pub name: String,

    #[serde(rename = "type")]
    pub monitor_type: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub enabled: Option<bool>,

    pub results_start: String,
    pub results_end: String,

    #[serde(default)]
    pub keywords: Option<String>,

    #[serde(default)]
    pub timezone: Option<String>,

    #[serde(default)]
    pub team_name: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub sources: Vec<String>,

    #[serde(default)]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub emotions: Vec<Category>,
}

impl MonitorDetail {
    /// Whether documents can be used to train this monitor
    pub fn is_opinion(&self) -> bool {
        self.monitor_type == "OPINION"
    }
}

/// Post-level results for a monitor.
///
/// Post payloads are heterogeneous across document sources; they are kept as
/// raw JSON and flattened only at the CLI export boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsResponse {
    #[serde(default)]
    pub posts: Vec<Value>,

    #[serde(default)]
    pub total_posts_available: Option<u64>,
}

/// Training documents attached to an opinion monitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPostsResponse {
    #[serde(default)]
    pub training_posts: Vec<Value>,
}

/// Acknowledgement of a content upload call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub upload_count: Option<u64>,

    /// Batch id assigned by the platform, usable for later deletion
    #[serde(default)]
    pub batch: Option<String>,
}

/// Acknowledgement of a train call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainResponse {
    #[serde(default)]
    pub status: Option<String>,
}

/// Responses of a batched submission, keyed by zero-based batch index
pub type BatchResponses<T> = BTreeMap<usize, T>;

/// One realtime stream available to a team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSummary {
    pub id: i64,

    #[serde(default)]
    pub name: Option<String>,
}

/// Response of the stream list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamList {
    #[serde(default)]
    pub streams: Vec<StreamSummary>,
}

/// Posts drained from a realtime stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamPostsResponse {
    #[serde(default)]
    pub posts: Vec<Value>,

    #[serde(default)]
    pub total_posts_available: u64,
}

/// Status of a submitted analysis task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStatus {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub result_id: Option<i64>,

    #[serde(default)]
    pub message: Option<String>,

    /// Analysis results, present once the task has completed
    #[serde(default)]
    pub results: Option<Value>,
}

impl AnalysisStatus {
    /// Whether the task is still queued or running
    pub fn is_pending(&self) -> bool {
        matches!(self.status.as_deref(), Some("WAITING") | Some("RUNNING") | None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_detail_parses() {
        let detail: MonitorDetail = serde_json::from_str(
            r#"{
                "id": 12345,
                "name": "Example Monitor",
                "type": "OPINION",
                "enabled": true,
                "resultsStart": "2017-01-01T00:00:00",
                "resultsEnd": "2017-02-01T00:00:00",
                "teamName": "Example Team",
                "categories": [
                    {"id": 1, "name": "Positive"},
                    {"id": 2, "name": "Negative", "status": "red"}
                ]
            }"#,
        )
        .unwrap();
        assert!(detail.is_opinion());
        assert_eq!(detail.categories.len(), 2);
        assert_eq!(detail.categories[1].status.as_deref(), Some("red"));
        assert!(detail.tags.is_empty());
    }

    #[test]
    fn test_posts_response_defaults() {
        let response: PostsResponse = serde_json::from_str(r#"{"posts": []}"#).unwrap();
        assert!(response.posts.is_empty());
        assert_eq!(response.total_posts_available, None);
    }

    #[test]
    fn test_auth_token_round_trip() {
        let token: AuthToken = serde_json::from_str(r#"{"auth": "abc123"}"#).unwrap();
        assert_eq!(token.auth, "abc123");
        let json = serde_json::to_value(&token).unwrap();
        assert!(json.get("expires").is_none());
    }

    #[test]
    fn test_analysis_status_pending() {
        let waiting: AnalysisStatus =
            serde_json::from_str(r#"{"status": "WAITING", "resultId": 42}"#).unwrap();
        assert!(waiting.is_pending());

        let done: AnalysisStatus = serde_json::from_str(r#"{"status": "COMPLETED"}"#).unwrap();
        assert!(!done.is_pending());
    }
}

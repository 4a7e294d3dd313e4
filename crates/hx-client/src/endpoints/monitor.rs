//! Monitor results endpoints
//!
//! Covers monitor metadata, aggregate metrics, post-level results,
//! demographics, geography, the per-network social metrics, and
//! programmatic training of opinion monitors.

use super::{impl_endpoint_base, EndpointBase};
use crate::limit::RateLimiter;
use crate::transport::Transport;
use hx_core::{Error, Result, UPLOAD_BATCH_SIZE};
use hx_models::responses::{
    BatchResponses, MonitorDetail, PostsResponse, TrainResponse, TrainingPostsResponse,
};
use hx_models::train::{TrainCollection, TrainItem};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Metrics that can be fetched through [`MonitorEndpoints::aggregate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateMetric {
    Volume,
    WordCloud,
    TopSources,
    InterestAffinities,
    SentimentAndCategories,
}

impl AggregateMetric {
    /// All metrics, in the order results are reported
    pub fn all() -> &'static [AggregateMetric] {
        &[
            AggregateMetric::Volume,
            AggregateMetric::WordCloud,
            AggregateMetric::TopSources,
            AggregateMetric::InterestAffinities,
            AggregateMetric::SentimentAndCategories,
        ]
    }

    /// Name used in CLI arguments and aggregate result keys
    pub fn name(&self) -> &'static str {
        match self {
            AggregateMetric::Volume => "volume",
            AggregateMetric::WordCloud => "word_cloud",
            AggregateMetric::TopSources => "top_sources",
            AggregateMetric::InterestAffinities => "interest_affinities",
            AggregateMetric::SentimentAndCategories => "sentiment_and_categories",
        }
    }

    /// Parse a metric name as accepted on the command line
    pub fn parse(value: &str) -> Option<Self> {
        AggregateMetric::all().iter().copied().find(|metric| metric.name() == value)
    }
}

/// Aggregated metric results for one date range
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedDateRange {
    pub results_start: String,
    pub results_end: String,
    pub results: BTreeMap<String, Value>,
}

/// Aggregated metric results for one monitor
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedMonitor {
    pub monitor_id: i64,
    pub results: Vec<AggregatedDateRange>,
}

/// Monitor results endpoints
pub struct MonitorEndpoints {
    transport: Arc<Transport>,
    limiter: Arc<RateLimiter>,
}

impl MonitorEndpoints {
    /// Create a new monitor endpoints instance
    pub fn new(transport: Arc<Transport>, limiter: Arc<RateLimiter>) -> Self {
        Self { transport, limiter }
    }

    fn date_params(monitor_id: i64, start: &str, end: &str) -> Vec<(&'static str, String)> {
        vec![
            ("id", monitor_id.to_string()),
            ("start", start.to_string()),
            ("end", end.to_string()),
        ]
    }

    /// Return detailed metadata about the selected monitor, including
    /// category metadata
    pub async fn detail(&self, monitor_id: i64) -> Result<MonitorDetail> {
        self.wait_for_slot().await;
        self.transport.get("monitor/detail", &[("id", monitor_id.to_string())]).await
    }

    /// Return audit information about the selected monitor, sorted from
    /// most to least recent
    pub async fn audit(&self, monitor_id: i64) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport.get("monitor/audit", &[("id", monitor_id.to_string())]).await
    }

    /// Return an alphabetized list of the top words in a monitor.
    ///
    /// # Arguments
    ///
    /// * `start` - inclusive start date in YYYY-MM-DD
    /// * `end` - exclusive end date in YYYY-MM-DD
    /// * `filter` - optional pipe-separated list of field:value pairs
    pub async fn word_cloud(
        &self,
        monitor_id: i64,
        start: &str,
        end: &str,
        filter: Option<&str>,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        let mut params = Self::date_params(monitor_id, start, end);
        if let Some(filter) = filter {
            params.push(("filter", filter.to_string()));
        }
        self.transport.get("monitor/wordcloud", &params).await
    }

    /// Return the training posts for an opinion monitor, optionally
    /// limited to one category
    pub async fn training_posts(
        &self,
        monitor_id: i64,
        category: Option<i64>,
    ) -> Result<TrainingPostsResponse> {
        self.wait_for_slot().await;
        let mut params = vec![("id", monitor_id.to_string())];
        if let Some(category) = category {
            params.push(("category", category.to_string()));
        }
        self.transport.get("monitor/trainingposts", &params).await
    }

    /// Upload training documents to an opinion monitor.
    ///
    /// Collections larger than the platform's 1000-document limit are split
    /// into consecutive batches submitted sequentially; responses are keyed
    /// by batch index. The first failing batch aborts the remainder, and
    /// batches already applied remotely stay applied.
    pub async fn train(
        &self,
        monitor_id: i64,
        items: &TrainCollection,
    ) -> Result<BatchResponses<TrainResponse>> {
        let category_id =
            items.category_id().ok_or_else(|| Error::MissingField("categoryid".to_string()))?;

        if items.len() > UPLOAD_BATCH_SIZE {
            info!(
                "More than {UPLOAD_BATCH_SIZE} training items found. Uploading in batches of {UPLOAD_BATCH_SIZE}"
            );
        }

        let mut responses = BatchResponses::new();
        for (batch_num, batch) in items.chunks(UPLOAD_BATCH_SIZE).enumerate() {
            let response = self.train_batch(monitor_id, category_id, batch).await?;
            debug!("uploaded training batch {batch_num}");
            responses.insert(batch_num, response);
        }
        Ok(responses)
    }

    async fn train_batch(
        &self,
        monitor_id: i64,
        category_id: i64,
        documents: &[TrainItem],
    ) -> Result<TrainResponse> {
        self.wait_for_slot().await;
        let body = json!({
            "monitorid": monitor_id,
            "categoryid": category_id,
            "documents": documents,
        });
        self.transport.post("monitor/train", &[("id", monitor_id.to_string())], &body).await
    }

    /// Return author affinity information for a monitor.
    ///
    /// # Arguments
    ///
    /// * `daily` - trend results daily instead of aggregating the range
    /// * `document_source` - `TWITTER` or `TUMBLR`
    pub async fn interest_affinities(
        &self,
        monitor_id: i64,
        start: &str,
        end: &str,
        daily: bool,
        document_source: Option<&str>,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        let mut params = Self::date_params(monitor_id, start, end);
        params.push(("daily", daily.to_string()));
        if let Some(source) = document_source {
            params.push(("documentSource", source.to_string()));
        }
        self.transport.get("monitor/interestaffinities", &params).await
    }

    /// Return clustering topic data for a monitor
    pub async fn topics(
        &self,
        monitor_id: i64,
        start: &str,
        end: &str,
        filter: Option<&str>,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        let mut params = Self::date_params(monitor_id, start, end);
        if let Some(filter) = filter {
            params.push(("filter", filter.to_string()));
        }
        self.transport.get("monitor/topics", &params).await
    }

    /// Return the topic waves information for a monitor
    pub async fn topic_waves(&self, monitor_id: i64, start: &str, end: &str) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport.get("monitor/topicwaves", &Self::date_params(monitor_id, start, end)).await
    }

    /// Return volume information for the sites and content sources in a
    /// monitor
    pub async fn top_sources(&self, monitor_id: i64, start: &str, end: &str) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport.get("monitor/sources", &Self::date_params(monitor_id, start, end)).await
    }

    /// Return a breakdown of the top image classes within a monitor.
    ///
    /// # Arguments
    ///
    /// * `object_type` - one of `object`, `scene`, `action`, `logo`
    /// * `top` - number of classes to return
    pub async fn image_results(
        &self,
        monitor_id: i64,
        start: &str,
        end: &str,
        object_type: Option<&str>,
        top: Option<u32>,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        let mut params = Self::date_params(monitor_id, start, end);
        if let Some(object_type) = object_type {
            params.push(("type", object_type.to_string()));
        }
        if let Some(top) = top {
            params.push(("top", top.to_string()));
        }
        self.transport.get("monitor/imageresults", &params).await
    }

    /// Return volume of total posts in a monitor.
    ///
    /// # Arguments
    ///
    /// * `group_by` - one of `HOURLY`, `DAILY`, `WEEKLY`, `MONTHLY`
    pub async fn volume(
        &self,
        monitor_id: i64,
        start: &str,
        end: &str,
        group_by: &str,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        let mut params = Self::date_params(monitor_id, start, end);
        params.push(("groupBy", group_by.to_string()));
        self.transport.get("monitor/volume", &params).await
    }

    /// Return volume aggregated by time of day or day of week
    pub async fn day_and_time(
        &self,
        monitor_id: i64,
        start: &str,
        end: &str,
        aggregate_by_day: bool,
        use_local_time: bool,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        let mut params = Self::date_params(monitor_id, start, end);
        params.push(("aggregatebyday", aggregate_by_day.to_string()));
        params.push(("uselocaltime", use_local_time.to_string()));
        self.transport.get("monitor/dayandtime", &params).await
    }

    /// Return aggregate volume, sentiment, emotion and opinion category
    /// analysis for a monitor
    pub async fn sentiment_and_categories(
        &self,
        monitor_id: i64,
        start: &str,
        end: &str,
        hide_excluded: bool,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        let mut params = Self::date_params(monitor_id, start, end);
        params.push(("hideExcluded", hide_excluded.to_string()));
        self.transport.get("monitor/results", &params).await
    }

    /// Return post-level information and associated analysis for a monitor.
    ///
    /// # Arguments
    ///
    /// * `filter` - optional pipe-separated list of field:value pairs
    /// * `extend_limit` - raise the per-call post limit from 500 to 10000
    /// * `full_contents` - return complete contents instead of excerpts
    /// * `geotagged` - only return geotagged documents
    pub async fn posts(
        &self,
        monitor_id: i64,
        start: &str,
        end: &str,
        filter: Option<&str>,
        extend_limit: bool,
        full_contents: bool,
        geotagged: bool,
    ) -> Result<PostsResponse> {
        self.wait_for_slot().await;
        let mut params = Self::date_params(monitor_id, start, end);
        if let Some(filter) = filter {
            params.push(("filter", filter.to_string()));
        }
        params.push(("extendLimit", extend_limit.to_string()));
        params.push(("fullContents", full_contents.to_string()));
        params.push(("geotagged", geotagged.to_string()));
        self.transport.get("monitor/posts", &params).await
    }

    /// Return volume metrics split by age bracket
    pub async fn age(&self, monitor_id: i64, start: &str, end: &str) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport
            .get("monitor/demographics/age", &Self::date_params(monitor_id, start, end))
            .await
    }

    /// Return volume metrics split by ethnicity
    pub async fn ethnicity(&self, monitor_id: i64, start: &str, end: &str) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport
            .get("monitor/demographics/ethnicity", &Self::date_params(monitor_id, start, end))
            .await
    }

    /// Return volume metrics split by gender
    pub async fn gender(&self, monitor_id: i64, start: &str, end: &str) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport
            .get("monitor/demographics/gender", &Self::date_params(monitor_id, start, end))
            .await
    }

    /// Return volume metrics split by city within a country
    pub async fn cities(
        &self,
        monitor_id: i64,
        start: &str,
        end: &str,
        country: &str,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        let mut params = Self::date_params(monitor_id, start, end);
        params.push(("country", country.to_string()));
        self.transport.get("monitor/geography/cities", &params).await
    }

    /// Return volume metrics split by state within a country
    pub async fn states(
        &self,
        monitor_id: i64,
        start: &str,
        end: &str,
        country: &str,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        let mut params = Self::date_params(monitor_id, start, end);
        params.push(("country", country.to_string()));
        self.transport.get("monitor/geography/states", &params).await
    }

    /// Return volume metrics split by country
    pub async fn countries(&self, monitor_id: i64, start: &str, end: &str) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport
            .get("monitor/geography/countries", &Self::date_params(monitor_id, start, end))
            .await
    }

    /// Return information about the Twitter authors posting in a monitor
    pub async fn twitter_authors(&self, monitor_id: i64, start: &str, end: &str) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport.get("monitor/authors", &Self::date_params(monitor_id, start, end)).await
    }

    /// Return the top hashtags, mentions, and retweets in a monitor
    pub async fn twitter_metrics(&self, monitor_id: i64, start: &str, end: &str) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport
            .get("monitor/twittermetrics", &Self::date_params(monitor_id, start, end))
            .await
    }

    /// Return the cumulative daily follower count for a targeted Twitter
    /// account
    pub async fn twitter_followers(
        &self,
        monitor_id: i64,
        start: &str,
        end: &str,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport
            .get("monitor/twittersocial/followers", &Self::date_params(monitor_id, start, end))
            .await
    }

    /// Return posts sent by the owner of a targeted Twitter account
    pub async fn twitter_sent_posts(
        &self,
        monitor_id: i64,
        start: &str,
        end: &str,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport
            .get("monitor/twittersocial/sentposts", &Self::date_params(monitor_id, start, end))
            .await
    }

    /// Return retweet, reply, and mention totals for a Twitter social
    /// account monitor
    pub async fn twitter_engagement(
        &self,
        monitor_id: i64,
        start: &str,
        end: &str,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport
            .get("monitor/twittersocial/totalengagement", &Self::date_params(monitor_id, start, end))
            .await
    }

    /// Return posts made by the administrators of a targeted Facebook page
    pub async fn facebook_admin_posts(
        &self,
        monitor_id: i64,
        start: &str,
        end: &str,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport
            .get("monitor/facebook/adminposts", &Self::date_params(monitor_id, start, end))
            .await
    }

    /// Return the cumulative daily like count for a targeted Facebook page
    pub async fn facebook_likes(&self, monitor_id: i64, start: &str, end: &str) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport
            .get("monitor/facebook/pagelikes", &Self::date_params(monitor_id, start, end))
            .await
    }

    /// Return like, comment, and share actions for a targeted Facebook page
    pub async fn facebook_activity(
        &self,
        monitor_id: i64,
        start: &str,
        end: &str,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport
            .get("monitor/facebook/totalactivity", &Self::date_params(monitor_id, start, end))
            .await
    }

    /// Return the top hashtags in an Instagram monitor
    pub async fn instagram_top_hashtags(
        &self,
        monitor_id: i64,
        start: &str,
        end: &str,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport
            .get("monitor/instagram/hashtags", &Self::date_params(monitor_id, start, end))
            .await
    }

    /// Return the cumulative daily follower count for a targeted Instagram
    /// account
    pub async fn instagram_followers(
        &self,
        monitor_id: i64,
        start: &str,
        end: &str,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport
            .get("monitor/instagram/followers", &Self::date_params(monitor_id, start, end))
            .await
    }

    /// Return media sent by admins of a targeted Instagram account
    pub async fn instagram_sent_media(
        &self,
        monitor_id: i64,
        start: &str,
        end: &str,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport
            .get("monitor/instagram/sentmedia", &Self::date_params(monitor_id, start, end))
            .await
    }

    /// Return like and comment actions for a targeted Instagram account
    pub async fn instagram_activity(
        &self,
        monitor_id: i64,
        start: &str,
        end: &str,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport
            .get("monitor/instagram/totalactivity", &Self::date_params(monitor_id, start, end))
            .await
    }

    /// Return aggregated results for one or more monitors, over one or more
    /// date ranges, for one or more metrics.
    ///
    /// # Arguments
    ///
    /// * `monitor_ids` - ids of the monitors being requested
    /// * `date_ranges` - pairs of `YYYY-MM-DD` start/end date strings
    /// * `metrics` - metrics to aggregate upon
    pub async fn aggregate(
        &self,
        monitor_ids: &[i64],
        date_ranges: &[(String, String)],
        metrics: &[AggregateMetric],
    ) -> Result<Vec<AggregatedMonitor>> {
        let mut aggregated = Vec::with_capacity(monitor_ids.len());
        for &monitor_id in monitor_ids {
            let mut ranges = Vec::with_capacity(date_ranges.len());
            for (start, end) in date_ranges {
                let mut results = BTreeMap::new();
                for metric in metrics {
                    let data = self.fetch_metric(*metric, monitor_id, start, end).await?;
                    results.insert(metric.name().to_string(), data);
                }
                ranges.push(AggregatedDateRange {
                    results_start: start.clone(),
                    results_end: end.clone(),
                    results,
                });
            }
            aggregated.push(AggregatedMonitor { monitor_id, results: ranges });
        }
        Ok(aggregated)
    }

    async fn fetch_metric(
        &self,
        metric: AggregateMetric,
        monitor_id: i64,
        start: &str,
        end: &str,
    ) -> Result<Value> {
        match metric {
            AggregateMetric::Volume => self.volume(monitor_id, start, end, "DAILY").await,
            AggregateMetric::WordCloud => self.word_cloud(monitor_id, start, end, None).await,
            AggregateMetric::TopSources => self.top_sources(monitor_id, start, end).await,
            AggregateMetric::InterestAffinities => {
                self.interest_affinities(monitor_id, start, end, false, None).await
            }
            AggregateMetric::SentimentAndCategories => {
                self.sentiment_and_categories(monitor_id, start, end, false).await
            }
        }
    }
}

impl_endpoint_base!(MonitorEndpoints);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::test_support::harness;
    use hx_models::train::TrainItemInput;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_aggregate_metric_parse() {
        assert_eq!(AggregateMetric::parse("volume"), Some(AggregateMetric::Volume));
        assert_eq!(AggregateMetric::parse("word_cloud"), Some(AggregateMetric::WordCloud));
        assert_eq!(AggregateMetric::parse("bogus"), None);
    }

    #[tokio::test]
    async fn test_detail_decodes_monitor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/monitor/detail"))
            .and(query_param("id", "42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 42,
                "name": "Example",
                "type": "OPINION",
                "resultsStart": "2017-01-01T00:00:00",
                "resultsEnd": "2017-02-01T00:00:00",
                "categories": [{"id": 1, "name": "Positive"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (transport, limiter) = harness(&server.uri());
        let monitors = MonitorEndpoints::new(transport, limiter);
        let detail = monitors.detail(42).await.unwrap();
        assert!(detail.is_opinion());
        assert_eq!(detail.categories[0].name, "Positive");
    }

    #[tokio::test]
    async fn test_train_splits_large_collections() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/monitor/train"))
            .and(query_param("id", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
            .expect(3)
            .mount(&server)
            .await;

        let items: Vec<TrainItemInput> = (0..2500)
            .map(|i| TrainItemInput {
                category_id: Some(11),
                title: Some(format!("post {i}")),
                url: Some(format!("http://www.crimsonhexagon.com/post{i}")),
                author: Some("me".to_string()),
                language: Some("en".to_string()),
                date: Some("2010-01-26T16:14:00".to_string()),
                contents: Some("Example content".to_string()),
            })
            .collect();
        let collection = TrainCollection::from_inputs(items).unwrap();

        let (transport, limiter) = harness(&server.uri());
        let monitors = MonitorEndpoints::new(transport, limiter);
        let responses = monitors.train(7, &collection).await.unwrap();

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[&0].status.as_deref(), Some("success"));
        assert_eq!(responses[&2].status.as_deref(), Some("success"));
    }

    #[tokio::test]
    async fn test_aggregate_collects_metric_per_range() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/monitor/volume"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"volumes": []})))
            .expect(2)
            .mount(&server)
            .await;

        let (transport, limiter) = harness(&server.uri());
        let monitors = MonitorEndpoints::new(transport, limiter);
        let ranges = vec![
            ("2017-01-01".to_string(), "2017-01-02".to_string()),
            ("2017-01-02".to_string(), "2017-01-03".to_string()),
        ];
        let aggregated =
            monitors.aggregate(&[42], &ranges, &[AggregateMetric::Volume]).await.unwrap();

        assert_eq!(aggregated.len(), 1);
        assert_eq!(aggregated[0].results.len(), 2);
        assert!(aggregated[0].results[0].results.contains_key("volume"));
    }
}

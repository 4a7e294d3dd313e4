//! Realtime monitor results endpoints

use super::{impl_endpoint_base, EndpointBase};
use crate::limit::RateLimiter;
use crate::transport::Transport;
use hx_core::Result;
use serde_json::Value;
use std::sync::Arc;

/// Realtime monitor results endpoints
pub struct RealtimeEndpoints {
    transport: Arc<Transport>,
    limiter: Arc<RateLimiter>,
}

impl RealtimeEndpoints {
    /// Create a new realtime endpoints instance
    pub fn new(transport: Arc<Transport>, limiter: Arc<RateLimiter>) -> Self {
        Self { transport, limiter }
    }

    /// List the monitors enabled for realtime results
    pub async fn list(&self, team_id: Option<i64>) -> Result<Value> {
        self.wait_for_slot().await;
        let mut params = Vec::new();
        if let Some(team_id) = team_id {
            params.push(("team_id", team_id.to_string()));
        }
        self.transport.get("realtime/monitor/list", &params).await
    }

    /// Get the realtime evaluator details for a monitor
    pub async fn detail(&self, monitor_id: i64) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport.get("realtime/monitor/details", &[("id", monitor_id.to_string())]).await
    }

    /// Configure the realtime evaluators for a monitor
    pub async fn configure(&self, monitor_id: i64) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport.get("realtime/monitor/configure", &[("id", monitor_id.to_string())]).await
    }

    /// Enable realtime data for a monitor
    pub async fn enable(&self, monitor_id: i64) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport.get("realtime/monitor/enable", &[("id", monitor_id.to_string())]).await
    }

    /// Disable realtime data for a monitor
    pub async fn disable(&self, monitor_id: i64) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport.get("realtime/monitor/disable", &[("id", monitor_id.to_string())]).await
    }

    /// Get cashtags associated with a monitor.
    ///
    /// # Arguments
    ///
    /// * `start` - inclusive start date in epoch seconds
    /// * `top` - the top N cashtags to retrieve
    pub async fn cashtags(
        &self,
        monitor_id: i64,
        start: Option<i64>,
        top: Option<u32>,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        let params = Self::tag_params(monitor_id, start, top);
        self.transport.get("realtime/monitor/cashtags", &params).await
    }

    /// Get hashtags associated with a monitor
    pub async fn hashtags(
        &self,
        monitor_id: i64,
        start: Option<i64>,
        top: Option<u32>,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        let params = Self::tag_params(monitor_id, start, top);
        self.transport.get("realtime/monitor/hashtags", &params).await
    }

    fn tag_params(
        monitor_id: i64,
        start: Option<i64>,
        top: Option<u32>,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![("id", monitor_id.to_string())];
        if let Some(start) = start {
            params.push(("start", start.to_string()));
        }
        if let Some(top) = top {
            params.push(("top", top.to_string()));
        }
        params
    }

    /// Get the realtime retweets for a monitor
    pub async fn retweets(&self, monitor_id: i64) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport.get("realtime/monitor/retweets", &[("id", monitor_id.to_string())]).await
    }

    /// Get the realtime social guids for a monitor.
    ///
    /// # Arguments
    ///
    /// * `doc_type` - document type to filter on
    /// * `start` - inclusive start date in epoch seconds
    /// * `received_after` - only return guids received after this instant
    pub async fn social_guids(
        &self,
        monitor_id: i64,
        doc_type: &str,
        start: Option<i64>,
        received_after: Option<i64>,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        let mut params = vec![("id", monitor_id.to_string()), ("type", doc_type.to_string())];
        if let Some(start) = start {
            params.push(("start", start.to_string()));
        }
        if let Some(received_after) = received_after {
            params.push(("receivedAfter", received_after.to_string()));
        }
        self.transport.get("realtime/monitor/socialguids", &params).await
    }

    /// Get the realtime tweets for a monitor
    pub async fn tweets(&self, monitor_id: i64, start: Option<i64>) -> Result<Value> {
        self.wait_for_slot().await;
        let mut params = vec![("id", monitor_id.to_string())];
        if let Some(start) = start {
            params.push(("start", start.to_string()));
        }
        self.transport.get("realtime/monitor/tweets", &params).await
    }

    /// Get the realtime volume for a monitor
    pub async fn volume(
        &self,
        monitor_id: i64,
        start: Option<i64>,
        doc_type: Option<&str>,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        let mut params = vec![("id", monitor_id.to_string())];
        if let Some(start) = start {
            params.push(("start", start.to_string()));
        }
        if let Some(doc_type) = doc_type {
            params.push(("type", doc_type.to_string()));
        }
        self.transport.get("realtime/monitor/volume", &params).await
    }

    /// Get the realtime volume by sentiment for a monitor
    pub async fn volume_by_sentiment(
        &self,
        monitor_id: i64,
        start: i64,
        doc_type: &str,
    ) -> Result<Value> {
        self.wait_for_slot().await;
        let params = [
            ("id", monitor_id.to_string()),
            ("start", start.to_string()),
            ("type", doc_type.to_string()),
        ];
        self.transport.get("realtime/monitor/volumebysentiment", &params).await
    }
}

impl_endpoint_base!(RealtimeEndpoints);

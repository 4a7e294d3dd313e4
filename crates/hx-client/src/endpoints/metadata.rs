//! Account and platform metadata endpoints

use super::{impl_endpoint_base, EndpointBase};
use crate::limit::RateLimiter;
use crate::transport::Transport;
use hx_core::Result;
use hx_models::responses::{MonitorList, TeamList};
use serde_json::Value;
use std::sync::Arc;

/// Account, geography, and documentation metadata endpoints
pub struct MetadataEndpoints {
    transport: Arc<Transport>,
    limiter: Arc<RateLimiter>,
}

impl MetadataEndpoints {
    /// Create a new metadata endpoints instance
    pub fn new(transport: Arc<Transport>, limiter: Arc<RateLimiter>) -> Self {
        Self { transport, limiter }
    }

    /// Return the teams accessible to the requesting user
    pub async fn team_list(&self) -> Result<TeamList> {
        self.wait_for_slot().await;
        self.transport.get("team/list", &[]).await
    }

    /// Return the monitors accessible to the requesting user along with
    /// their metadata
    pub async fn monitor_list(&self, team_id: Option<i64>) -> Result<MonitorList> {
        self.wait_for_slot().await;
        let mut params = Vec::new();
        if let Some(team_id) = team_id {
            params.push(("team", team_id.to_string()));
        }
        self.transport.get("monitor/list", &params).await
    }

    /// Return every geographical location usable for filtering monitor
    /// results and geotagging uploads
    pub async fn geography(&self) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport.get("geography/info/all", &[]).await
    }

    /// Return the states defined for a country
    pub async fn states(&self, country: &str) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport.get("geography/info/states", &[("country", country.to_string())]).await
    }

    /// Return the cities or urban areas defined for a country
    pub async fn cities(&self, country: &str) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport.get("geography/info/cities", &[("country", country.to_string())]).await
    }

    /// Return all countries usable for filtering and geotagging
    pub async fn countries(&self) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport.get("geography/info/countries", &[]).await
    }

    /// Return the image class ids and names
    pub async fn image_classes(&self) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport.get("imageanalysis/resources/classes", &[]).await
    }

    /// Return the latest JSON version of the API endpoint documentation
    pub async fn api_documentation(&self) -> Result<Value> {
        self.wait_for_slot().await;
        self.transport.get("documentation", &[]).await
    }
}

impl_endpoint_base!(MetadataEndpoints);

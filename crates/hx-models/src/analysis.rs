//! Validation models for 24-hour analysis requests

use serde::{Deserialize, Serialize};

use crate::datetime::{normalize_datetime, to_naive_utc};
use crate::upload::Gender;
use crate::validation::ValidationErrors;

/// Analysis dimensions that can be requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Volume,
    Sentiment,
    Emotion,
    Affinity,
    Gender,
    Age,
    Location,
    Source,
    Reach,
}

/// Document sources an analysis can draw from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentSource {
    Twitter,
    Tumblr,
    Instagram,
    Blogs,
    Reviews,
    GooglePlus,
    News,
    Youtube,
    Forums,
}

/// Include/exclude switch for demographic and language filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncludeExclude {
    Include,
    Exclude,
}

/// Gender filter logic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderFilter {
    #[serde(rename = "type")]
    pub logic: IncludeExclude,
    pub values: Vec<Gender>,
}

/// Language or location filter logic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuesFilter {
    #[serde(rename = "type")]
    pub logic: IncludeExclude,
    pub values: Vec<String>,
}

/// Raw analysis request prior to validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequestInput {
    pub analysis: Vec<AnalysisType>,
    pub keywords: String,
    pub sources: Vec<DocumentSource>,
    pub start_date: String,
    pub end_date: String,
    pub timezone: String,
    #[serde(default = "default_request_usage")]
    pub request_usage: bool,
    #[serde(default)]
    pub gender: Option<GenderFilter>,
    #[serde(default)]
    pub languages: Option<ValuesFilter>,
    #[serde(default)]
    pub locations: Option<ValuesFilter>,
}

fn default_request_usage() -> bool {
    true
}

/// A validated query task against 24 hours of social data.
///
/// Constructed only through [`AnalysisRequest::new`]; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    analysis: Vec<AnalysisType>,
    keywords: String,
    sources: Vec<DocumentSource>,
    start_date: String,
    end_date: String,
    timezone: String,
    request_usage: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    gender: Option<GenderFilter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    languages: Option<ValuesFilter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    locations: Option<ValuesFilter>,
}

impl AnalysisRequest {
    /// Validate a raw request: at least one analysis type and one source,
    /// parseable dates, and a window of at most 24 hours
    pub fn new(input: AnalysisRequestInput) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if input.analysis.is_empty() {
            errors.push("analysis", "at least one analysis type is required");
        }
        if input.sources.is_empty() {
            errors.push("sources", "at least one document source is required");
        }

        let start_date = match normalize_datetime(&input.start_date) {
            Ok(iso) => Some(iso),
            Err(msg) => {
                errors.push("startDate", msg);
                None
            }
        };
        let end_date = match normalize_datetime(&input.end_date) {
            Ok(iso) => Some(iso),
            Err(msg) => {
                errors.push("endDate", msg);
                None
            }
        };

        if let (Some(start), Some(end)) = (&start_date, &end_date) {
            match (to_naive_utc(start), to_naive_utc(end)) {
                (Some(start), Some(end)) if end < start => {
                    errors.push("endDate", "end date precedes start date");
                }
                (Some(start), Some(end)) if end - start > chrono::Duration::hours(24) => {
                    errors.push("endDate", "period must not exceed 24 hours");
                }
                _ => {}
            }
        }

        match (start_date, end_date) {
            (Some(start_date), Some(end_date)) if errors.is_empty() => Ok(Self {
                analysis: input.analysis,
                keywords: input.keywords,
                sources: input.sources,
                start_date,
                end_date,
                timezone: input.timezone,
                request_usage: input.request_usage,
                gender: input.gender,
                languages: input.languages,
                locations: input.locations,
            }),
            _ => Err(errors),
        }
    }

    pub fn start_date(&self) -> &str {
        &self.start_date
    }

    pub fn end_date(&self) -> &str {
        &self.end_date
    }
}

//! Validation models for custom content upload
//!
//! Raw records come in as [`UploadItemInput`] (from JSON or a spreadsheet
//! row), are checked field by field into immutable [`UploadItem`]s, and are
//! grouped into an [`UploadCollection`] that enforces guid uniqueness and
//! knows how to slice itself into upload batches.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::datetime::normalize_datetime;
use crate::validation::ValidationErrors;

/// Maximum length of the `contents` field accepted by the platform
pub const MAX_CONTENTS_LEN: usize = 16_384;

/// Maximum number of custom fields per document
pub const MAX_CUSTOM_FIELDS: usize = 10;

const MAX_CUSTOM_KEY_LEN: usize = 100;
const MAX_CUSTOM_VALUE_LEN: usize = 10_000;

/// Author gender accepted by the upload endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
}

impl Gender {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "M" => Some(Gender::M),
            "F" => Some(Gender::F),
            _ => None,
        }
    }
}

/// Engagement relation between an uploaded document and its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngagementType {
    Reply,
    Retweet,
    Comment,
}

impl EngagementType {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "REPLY" => Some(EngagementType::Reply),
            "RETWEET" => Some(EngagementType::Retweet),
            "COMMENT" => Some(EngagementType::Comment),
            _ => None,
        }
    }
}

/// Geolocation attached to an uploaded document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geolocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
}

/// Raw upload record as read from JSON or a spreadsheet row, prior to validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadItemInput {
    pub title: Option<String>,
    pub author: Option<String>,
    pub language: Option<String>,
    pub date: Option<String>,
    pub contents: Option<String>,
    pub url: Option<String>,
    pub guid: Option<String>,
    pub geolocation: Option<Geolocation>,
    pub custom: Option<BTreeMap<String, String>>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub page_id: Option<String>,
    pub parent_guid: Option<String>,
    pub author_profile_id: Option<String>,
    pub engagement_type: Option<String>,
}

/// A validated document ready for upload.
///
/// Constructed only through [`UploadItem::new`]; immutable afterwards.
/// Unset optional fields are omitted when serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadItem {
    title: String,
    author: String,
    language: String,
    date: String,
    contents: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,

    guid: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    geolocation: Option<Geolocation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    custom: Option<BTreeMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    age: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    gender: Option<Gender>,

    #[serde(skip_serializing_if = "Option::is_none")]
    page_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    parent_guid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    author_profile_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    engagement_type: Option<EngagementType>,
}

/// Check a url string without altering it; the original text is what gets uploaded
fn check_http_url(value: &str) -> Result<(), String> {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
        Ok(url) => Err(format!("'{}' is not an http(s) url", url.scheme())),
        Err(e) => Err(format!("invalid url: {e}")),
    }
}

fn require(errors: &mut ValidationErrors, path: &str, value: Option<String>) -> Option<String> {
    if value.is_none() {
        errors.push(path, "field required");
    }
    value
}

fn validate_custom(errors: &mut ValidationErrors, custom: &BTreeMap<String, String>) {
    if custom.len() > MAX_CUSTOM_FIELDS {
        errors.push(
            "custom",
            format!("{} custom fields found. Must not exceed {MAX_CUSTOM_FIELDS}", custom.len()),
        );
    }
    for (key, value) in custom {
        if key.chars().count() >= MAX_CUSTOM_KEY_LEN {
            errors.push("custom", format!("key '{key}' exceeds {MAX_CUSTOM_KEY_LEN} characters"));
        }
        if value.chars().count() >= MAX_CUSTOM_VALUE_LEN {
            errors
                .push("custom", format!("value for '{key}' exceeds {MAX_CUSTOM_VALUE_LEN} characters"));
        }
    }
}

impl UploadItem {
    /// Validate a raw record, collecting every field failure before reporting
    pub fn new(input: UploadItemInput) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = require(&mut errors, "title", input.title);
        let author = require(&mut errors, "author", input.author);

        let language = match input.language {
            Some(lang) if lang.len() == 2 && lang.chars().all(|c| c.is_ascii_alphabetic()) => {
                Some(lang)
            }
            Some(lang) => {
                errors.push("language", format!("'{lang}' is not a 2-letter language code"));
                None
            }
            None => {
                errors.push("language", "field required");
                None
            }
        };

        let date = match input.date {
            Some(raw) => match normalize_datetime(&raw) {
                Ok(iso) => Some(iso),
                Err(msg) => {
                    errors.push("date", msg);
                    None
                }
            },
            None => {
                errors.push("date", "field required");
                None
            }
        };

        let contents = match input.contents {
            Some(text) if text.chars().count() <= MAX_CONTENTS_LEN => Some(text),
            Some(text) => {
                errors.push(
                    "contents",
                    format!("length {} exceeds maximum of {MAX_CONTENTS_LEN}", text.chars().count()),
                );
                None
            }
            None => {
                errors.push("contents", "field required");
                None
            }
        };

        let url = match input.url.filter(|u| !u.is_empty()) {
            Some(u) => match check_http_url(&u) {
                Ok(()) => Some(u),
                Err(msg) => {
                    errors.push("url", msg);
                    None
                }
            },
            None => None,
        };

        // The guid identifies the document; a valid url doubles as one.
        let guid = match input.guid.filter(|g| !g.is_empty()) {
            Some(g) => Some(g),
            None => match &url {
                Some(u) => Some(u.clone()),
                None => {
                    errors.push("guid", "must specify either a guid or a url");
                    None
                }
            },
        };

        let custom = match input.custom.filter(|map| !map.is_empty()) {
            Some(map) => {
                validate_custom(&mut errors, &map);
                Some(map)
            }
            None => None,
        };

        let gender = match input.gender.filter(|g| !g.is_empty()) {
            Some(raw) => match Gender::parse(&raw) {
                Some(g) => Some(g),
                None => {
                    errors.push("gender", format!("'{raw}' is not a valid gender. Must be M or F"));
                    None
                }
            },
            None => None,
        };

        let engagement_type = match input.engagement_type.filter(|e| !e.is_empty()) {
            Some(raw) => match EngagementType::parse(&raw) {
                Some(e) => Some(e),
                None => {
                    errors.push(
                        "engagementType",
                        format!("'{raw}' is not a valid engagement type. Must be REPLY, RETWEET or COMMENT"),
                    );
                    None
                }
            },
            None => None,
        };

        match (title, author, language, date, contents, guid) {
            (Some(title), Some(author), Some(language), Some(date), Some(contents), Some(guid))
                if errors.is_empty() =>
            {
                Ok(Self {
                    title,
                    author,
                    language,
                    date,
                    contents,
                    url,
                    guid,
                    geolocation: input.geolocation,
                    custom,
                    age: input.age,
                    gender,
                    page_id: input.page_id,
                    parent_guid: input.parent_guid,
                    author_profile_id: input.author_profile_id,
                    engagement_type,
                })
            }
            _ => Err(errors),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Normalized ISO-8601 publication date
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Identifying key; falls back to the url when no guid was given
    pub fn guid(&self) -> &str {
        &self.guid
    }

    pub fn custom(&self) -> Option<&BTreeMap<String, String>> {
        self.custom.as_ref()
    }
}

/// Reference to an uploaded document targeted for deletion, by guid or url
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentDeleteItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// An ordered collection of validated documents with unique guids
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UploadCollection {
    items: Vec<UploadItem>,
}

impl UploadCollection {
    /// Build a collection, rejecting empty input and duplicate guids.
    ///
    /// The duplicate error names every offending guid.
    pub fn new(items: Vec<UploadItem>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if items.is_empty() {
            errors.push("items", "at least one item is required");
        }

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for item in &items {
            *counts.entry(item.guid.as_str()).or_insert(0) += 1;
        }
        let dups: Vec<&str> =
            counts.iter().filter(|(_, count)| **count > 1).map(|(guid, _)| *guid).collect();
        if !dups.is_empty() {
            errors.push("items", format!("duplicate item guids detected: {dups:?}"));
        }

        errors.into_result(Self { items })
    }

    /// Validate a batch of raw records, aggregating per-record failures
    /// under `items[index].field` paths
    pub fn from_inputs(inputs: Vec<UploadItemInput>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut items = Vec::with_capacity(inputs.len());
        for (index, input) in inputs.into_iter().enumerate() {
            match UploadItem::new(input) {
                Ok(item) => items.push(item),
                Err(item_errors) => errors.extend_prefixed(&format!("items[{index}]"), item_errors),
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Self::new(items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[UploadItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UploadItem> {
        self.items.iter()
    }

    /// Consecutive sub-batches of at most `size` items, in order
    pub fn chunks(&self, size: usize) -> std::slice::Chunks<'_, UploadItem> {
        self.items.chunks(size)
    }
}

impl<'a> IntoIterator for &'a UploadCollection {
    type Item = &'a UploadItem;
    type IntoIter = std::slice::Iter<'a, UploadItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

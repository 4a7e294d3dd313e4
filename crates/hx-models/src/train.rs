//! Validation models for monitor training documents

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::datetime::normalize_datetime;
use crate::validation::ValidationErrors;

/// Raw training record as read from JSON or a spreadsheet row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainItemInput {
    #[serde(rename = "categoryid")]
    pub category_id: Option<i64>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub author: Option<String>,
    pub language: Option<String>,
    pub date: Option<String>,
    pub contents: Option<String>,
}

/// A validated training document for a single opinion-monitor category.
///
/// Constructed only through [`TrainItem::new`]; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainItem {
    #[serde(rename = "categoryid")]
    category_id: i64,
    title: String,
    url: String,
    author: String,
    language: String,
    date: String,
    contents: String,
}

fn require(errors: &mut ValidationErrors, path: &str, value: Option<String>) -> Option<String> {
    if value.is_none() {
        errors.push(path, "field required");
    }
    value
}

impl TrainItem {
    /// Validate a raw record, collecting every field failure before reporting
    pub fn new(input: TrainItemInput) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let category_id = match input.category_id {
            Some(id) => Some(id),
            None => {
                errors.push("categoryid", "field required");
                None
            }
        };

        let title = require(&mut errors, "title", input.title);
        let author = require(&mut errors, "author", input.author);
        let contents = require(&mut errors, "contents", input.contents);

        let url = match input.url {
            Some(raw) => match Url::parse(&raw) {
                Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Some(raw),
                Ok(parsed) => {
                    errors.push("url", format!("'{}' is not an http(s) url", parsed.scheme()));
                    None
                }
                Err(e) => {
                    errors.push("url", format!("invalid url: {e}"));
                    None
                }
            },
            None => {
                errors.push("url", "field required");
                None
            }
        };

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

        match (category_id, title, url, author, language, date, contents) {
            (
                Some(category_id),
                Some(title),
                Some(url),
                Some(author),
                Some(language),
                Some(date),
                Some(contents),
            ) if errors.is_empty() => {
                Ok(Self { category_id, title, url, author, language, date, contents })
            }
            _ => Err(errors),
        }
    }

    /// Category every item in a [`TrainCollection`] must share
    pub fn category_id(&self) -> i64 {
        self.category_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Identifying key for training documents
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Normalized ISO-8601 publication date
    pub fn date(&self) -> &str {
        &self.date
    }
}

/// Training documents for one category, unique by url
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TrainCollection {
    items: Vec<TrainItem>,
}

impl TrainCollection {
    /// Build a collection, rejecting empty input, duplicate urls, and
    /// mixed category ids
    pub fn new(items: Vec<TrainItem>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if items.is_empty() {
            errors.push("items", "at least one item is required");
        }

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for item in &items {
            *counts.entry(item.url.as_str()).or_insert(0) += 1;
        }
        let dups: Vec<&str> =
            counts.iter().filter(|(_, count)| **count > 1).map(|(url, _)| *url).collect();
        if !dups.is_empty() {
            errors.push("items", format!("duplicate item urls detected: {dups:?}"));
        }

        let category_ids: BTreeSet<i64> = items.iter().map(|item| item.category_id).collect();
        if category_ids.len() > 1 {
            errors.push("items", format!("multiple categoryid values detected: {category_ids:?}"));
        }

        errors.into_result(Self { items })
    }

    /// Validate a batch of raw records, aggregating per-record failures
    /// under `items[index].field` paths
    pub fn from_inputs(inputs: Vec<TrainItemInput>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut items = Vec::with_capacity(inputs.len());
        for (index, input) in inputs.into_iter().enumerate() {
            match TrainItem::new(input) {
                Ok(item) => items.push(item),
                Err(item_errors) => errors.extend_prefixed(&format!("items[{index}]"), item_errors),
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Self::new(items)
    }

    /// The category id shared by every item
    pub fn category_id(&self) -> Option<i64> {
        self.items.first().map(|item| item.category_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[TrainItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrainItem> {
        self.items.iter()
    }

    /// Consecutive sub-batches of at most `size` items, in order
    pub fn chunks(&self, size: usize) -> std::slice::Chunks<'_, TrainItem> {
        self.items.chunks(size)
    }
}

impl<'a> IntoIterator for &'a TrainCollection {
    type Item = &'a TrainItem;
    type IntoIter = std::slice::Iter<'a, TrainItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

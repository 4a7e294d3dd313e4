//! Flattening of post JSON into tabular records for CSV export
//!
//! Category and emotion score arrays are reduced to the name of the
//! highest-scoring class (or `Uncategorized` when nothing was assigned),
//! nested objects become dotted columns, and newlines are stripped from
//! text fields so each post fits one CSV row.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

fn capitalize(value: &str) -> String {
  let mut chars = value.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    None => String::new(),
  }
}

fn scalar_to_string(value: &Value) -> Option<String> {
  match value {
    Value::String(text) => Some(text.clone()),
    Value::Number(number) => Some(number.to_string()),
    Value::Bool(flag) => Some(flag.to_string()),
    _ => None,
  }
}

/// Reduce a `<name>Scores` array to the winning class name.
///
/// Returns `Uncategorized` when the document's `assigned<Name>Id` is 0.
fn winning_class(doc: &Value, name: &str, scores: &[Value]) -> Option<String> {
  let assigned_key = format!("assigned{}Id", capitalize(name));
  if doc.get(&assigned_key).and_then(Value::as_i64) == Some(0) {
    return Some("Uncategorized".to_string());
  }

  let mut best: Option<(f64, &Value)> = None;
  for entry in scores {
    let score = entry.get("score").and_then(Value::as_f64).unwrap_or(f64::MIN);
    if best.map(|(top, _)| score > top).unwrap_or(true) {
      best = Some((score, entry));
    }
  }
  let name_key = format!("{name}Name");
  best
    .and_then(|(_, entry)| entry.get(name_key.as_str()))
    .and_then(Value::as_str)
    .map(str::to_string)
}

fn flatten_post(doc: &Value) -> BTreeMap<String, String> {
  let mut record = BTreeMap::new();
  let Some(object) = doc.as_object() else {
    return record;
  };

  for (key, value) in object {
    match value {
      Value::String(text) => {
        let cell = if key == "contents" || key == "title" {
          text.replace(['\n', '\r'], " ")
        } else {
          text.clone()
        };
        record.insert(key.clone(), cell);
      }
      Value::Array(entries) if key.ends_with("Scores") && !entries.is_empty() => {
        let name = key.trim_end_matches("Scores");
        if let Some(class) = winning_class(doc, name, entries) {
          record.insert(name.to_string(), class);
        }
      }
      Value::Object(nested) => {
        for (subkey, subvalue) in nested {
          if let Some(cell) = scalar_to_string(subvalue) {
            record.insert(format!("{key}.{subkey}"), cell);
          }
        }
      }
      Value::Number(number) => {
        record.insert(key.clone(), number.to_string());
      }
      Value::Bool(flag) => {
        record.insert(key.clone(), flag.to_string());
      }
      // Remaining arrays (image info and the like) have no tabular shape.
      _ => {}
    }
  }
  record
}

/// Flatten post documents into a header list and one row map per post
pub fn flatten_posts(docs: &[Value]) -> (Vec<String>, Vec<BTreeMap<String, String>>) {
  let rows: Vec<BTreeMap<String, String>> = docs.iter().map(flatten_post).collect();
  let headers: BTreeSet<String> =
    rows.iter().flat_map(|row| row.keys().cloned()).collect();
  (headers.into_iter().collect(), rows)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_category_scores_reduce_to_winner() {
    let doc = json!({
      "url": "http://example.com/1",
      "assignedCategoryId": 42,
      "categoryScores": [
        {"categoryId": 41, "categoryName": "Negative", "score": 0.2},
        {"categoryId": 42, "categoryName": "Positive", "score": 0.8}
      ]
    });
    let (headers, rows) = flatten_posts(&[doc]);
    assert!(headers.contains(&"category".to_string()));
    assert_eq!(rows[0]["category"], "Positive");
  }

  #[test]
  fn test_unassigned_scores_become_uncategorized() {
    let doc = json!({
      "assignedCategoryId": 0,
      "categoryScores": [
        {"categoryId": 41, "categoryName": "Negative", "score": 0.5}
      ]
    });
    let (_, rows) = flatten_posts(&[doc]);
    assert_eq!(rows[0]["category"], "Uncategorized");
  }

  #[test]
  fn test_nested_objects_get_dotted_columns() {
    let doc = json!({
      "author": {"name": "me", "followers": 12},
      "url": "http://example.com/2"
    });
    let (_, rows) = flatten_posts(&[doc]);
    assert_eq!(rows[0]["author.name"], "me");
    assert_eq!(rows[0]["author.followers"], "12");
  }

  #[test]
  fn test_newlines_stripped_from_text_fields() {
    let doc = json!({
      "title": "line one\nline two",
      "contents": "a\r\nb"
    });
    let (_, rows) = flatten_posts(&[doc]);
    assert_eq!(rows[0]["title"], "line one line two");
    assert_eq!(rows[0]["contents"], "a  b");
  }

  #[test]
  fn test_headers_are_union_of_rows() {
    let docs = vec![json!({"a": 1}), json!({"b": "x"})];
    let (headers, rows) = flatten_posts(&docs);
    assert_eq!(headers, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(rows.len(), 2);
  }
}

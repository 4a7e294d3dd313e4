//! CSV spreadsheet reading shared by the upload and train commands

use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Turn a separator argument into a single-byte CSV delimiter.
///
/// Accepts a one-character separator or the literal `\t` for tabs.
pub fn delimiter(separator: &str) -> Result<u8> {
  if separator == "\\t" {
    return Ok(b'\t');
  }
  let mut bytes = separator.bytes();
  match (bytes.next(), bytes.next()) {
    (Some(byte), None) => Ok(byte),
    _ => bail!("separator must be a single character, got '{separator}'"),
  }
}

/// Read a CSV file into one string map per row, dropping empty cells.
///
/// Only UTF-8 encoded `.csv` files are supported.
pub fn read_records(path: &Path, delimiter: u8) -> Result<Vec<BTreeMap<String, String>>> {
  match path.extension().and_then(|ext| ext.to_str()) {
    Some("csv") => {}
    _ => bail!(
      "Error reading spreadsheet file '{}'. File type must be UTF-8 encoded .csv",
      path.display()
    ),
  }

  let mut reader = csv::ReaderBuilder::new()
    .delimiter(delimiter)
    .from_path(path)
    .with_context(|| format!("Error reading spreadsheet file '{}'", path.display()))?;

  let headers = reader
    .headers()
    .with_context(|| format!("Error reading spreadsheet headers from '{}'", path.display()))?
    .clone();

  let mut records = Vec::new();
  for (row, result) in reader.records().enumerate() {
    let record = result.with_context(|| format!("Error reading spreadsheet row {}", row + 2))?;
    let mut fields = BTreeMap::new();
    for (header, value) in headers.iter().zip(record.iter()) {
      if !value.is_empty() {
        fields.insert(header.to_string(), value.to_string());
      }
    }
    records.push(fields);
  }

  if records.is_empty() {
    bail!("spreadsheet '{}' contains no data rows", path.display());
  }

  Ok(records)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  fn write_csv(content: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let mut file = std::fs::File::create(dir.path().join("data.csv")).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    dir
  }

  #[test]
  fn test_delimiter_parsing() {
    assert_eq!(delimiter(",").unwrap(), b',');
    assert_eq!(delimiter("\\t").unwrap(), b'\t');
    assert!(delimiter("||").is_err());
  }

  #[test]
  fn test_read_records_drops_empty_cells() {
    let dir = write_csv("title,author,guid\nHello,me,g1\nWorld,,g2\n");
    let records = read_records(&dir.path().join("data.csv"), b',').unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["title"], "Hello");
    assert!(!records[1].contains_key("author"));
  }

  #[test]
  fn test_read_records_rejects_other_extensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.xlsx");
    std::fs::write(&path, b"not a spreadsheet").unwrap();
    let err = read_records(&path, b',').unwrap_err();
    assert!(err.to_string().contains(".csv"));
  }

  #[test]
  fn test_read_records_rejects_empty_sheet() {
    let dir = write_csv("title,author\n");
    assert!(read_records(&dir.path().join("data.csv"), b',').is_err());
  }
}

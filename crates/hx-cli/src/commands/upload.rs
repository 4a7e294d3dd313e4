use crate::commands::client_from;
use crate::config::Config;
use crate::spreadsheet;
use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use hx_models::upload::{UploadCollection, UploadItemInput};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub struct UploadCommand {
  /// CSV file of documents to upload (UTF-8 encoded .csv)
  pub filename: PathBuf,

  /// Custom document type id
  #[arg(short, long)]
  pub document_type: i64,

  /// CSV column separator
  #[arg(short, long, default_value = ",")]
  pub separator: String,
}

/// Map one spreadsheet row onto an upload input record.
///
/// Dotted `geolocation.*` and `custom.*` columns become the corresponding
/// nested objects; everything else is a flat field.
pub fn row_to_input(row_num: usize, fields: &BTreeMap<String, String>) -> Result<UploadItemInput> {
  let mut flat = Map::new();
  let mut geolocation = Map::new();
  let mut custom = Map::new();

  for (header, value) in fields {
    if let Some(subfield) = header.strip_prefix("geolocation.") {
      if subfield == "latitude" || subfield == "longitude" {
        let number: f64 = value.parse().map_err(|_| {
          anyhow!("row {row_num}: '{value}' is not a valid {subfield}")
        })?;
        geolocation.insert(subfield.to_string(), Value::from(number));
      } else {
        geolocation.insert(subfield.to_string(), Value::String(value.clone()));
      }
    } else if let Some(subfield) = header.strip_prefix("custom.") {
      custom.insert(subfield.to_string(), Value::String(value.clone()));
    } else if header == "age" {
      let age: i64 = value
        .parse()
        .map_err(|_| anyhow!("row {row_num}: age '{value}' is not an integer"))?;
      flat.insert(header.clone(), Value::from(age));
    } else {
      flat.insert(header.clone(), Value::String(value.clone()));
    }
  }

  if !geolocation.is_empty() {
    flat.insert("geolocation".to_string(), Value::Object(geolocation));
  }
  if !custom.is_empty() {
    flat.insert("custom".to_string(), Value::Object(custom));
  }

  serde_json::from_value(Value::Object(flat))
    .with_context(|| format!("row {row_num}: could not interpret record"))
}

pub async fn execute(cmd: UploadCommand, config: Config) -> Result<()> {
  let delimiter = spreadsheet::delimiter(&cmd.separator)?;
  let rows = spreadsheet::read_records(&cmd.filename, delimiter)?;

  let mut inputs: Vec<UploadItemInput> = Vec::with_capacity(rows.len());
  for (index, fields) in rows.iter().enumerate() {
    inputs.push(row_to_input(index + 2, fields)?);
  }

  let collection = match UploadCollection::from_inputs(inputs) {
    Ok(collection) => collection,
    Err(errors) => bail!("The file contained the following problems:\n{errors}"),
  };
  info!("uploading {} documents as document type {}", collection.len(), cmd.document_type);

  let client = client_from(&config).await?;
  let responses = client.content().upload(cmd.document_type, &collection).await?;
  println!("{}", serde_json::to_string_pretty(&responses)?);
  Ok(())
}

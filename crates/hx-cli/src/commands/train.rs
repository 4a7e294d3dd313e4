use crate::commands::client_from;
use crate::config::Config;
use crate::spreadsheet;
use anyhow::{anyhow, bail, Result};
use clap::Args;
use hx_models::train::{TrainCollection, TrainItemInput};
use indicatif::ProgressBar;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub struct TrainCommand {
  /// CSV file of training examples (UTF-8 encoded .csv)
  pub filename: PathBuf,

  /// Opinion monitor to train
  pub monitor_id: i64,

  /// CSV column separator
  #[arg(short, long, default_value = ",")]
  pub separator: String,
}

/// Map one spreadsheet row onto a training input record for `category_id`
fn row_to_input(fields: &BTreeMap<String, String>, category_id: i64) -> TrainItemInput {
  TrainItemInput {
    category_id: Some(category_id),
    title: fields.get("title").cloned(),
    url: fields.get("url").cloned(),
    author: fields.get("author").cloned(),
    language: fields.get("language").cloned(),
    date: fields.get("date").cloned(),
    contents: fields.get("contents").cloned(),
  }
}

/// Resolve each row to a category id using either the `categoryid` or the
/// `categoryname` column, validated against the monitor's categories
fn resolve_category(
  fields: &BTreeMap<String, String>,
  by_name: &BTreeMap<String, i64>,
  by_id: &BTreeMap<i64, String>,
) -> Result<i64> {
  if let Some(raw) = fields.get("categoryid") {
    let id: i64 =
      raw.parse().map_err(|_| anyhow!("'{raw}' is not a valid categoryId"))?;
    if !by_id.contains_key(&id) {
      bail!("'{id}' categoryId not in monitor categories: {by_name:?}");
    }
    return Ok(id);
  }
  if let Some(name) = fields.get("categoryname") {
    return by_name
      .get(name)
      .copied()
      .ok_or_else(|| anyhow!("'{name}' categoryName not in monitor categories: {by_name:?}"));
  }
  bail!("File must contain either a 'categoryName' string column or a 'categoryId' integer column")
}

pub async fn execute(cmd: TrainCommand, config: Config) -> Result<()> {
  let delimiter = spreadsheet::delimiter(&cmd.separator)?;
  let rows = spreadsheet::read_records(&cmd.filename, delimiter)?;

  // Column names are matched case-insensitively.
  let rows: Vec<BTreeMap<String, String>> = rows
    .into_iter()
    .map(|fields| {
      fields.into_iter().map(|(header, value)| (header.to_lowercase(), value)).collect()
    })
    .collect();

  let client = client_from(&config).await?;
  let monitors = client.monitors();

  let detail = monitors.detail(cmd.monitor_id).await?;
  if !detail.is_opinion() {
    bail!("Monitor must be an opinion monitor.");
  }

  let by_name: BTreeMap<String, i64> =
    detail.categories.iter().map(|category| (category.name.clone(), category.id)).collect();
  let by_id: BTreeMap<i64, String> =
    detail.categories.iter().map(|category| (category.id, category.name.clone())).collect();

  let mut groups: BTreeMap<i64, Vec<TrainItemInput>> = BTreeMap::new();
  for fields in &rows {
    let category_id = resolve_category(fields, &by_name, &by_id)?;
    groups.entry(category_id).or_default().push(row_to_input(fields, category_id));
  }

  // Validate every group before the first network call.
  let mut collections: Vec<(i64, TrainCollection)> = Vec::with_capacity(groups.len());
  for (category_id, inputs) in groups {
    let collection = match TrainCollection::from_inputs(inputs) {
      Ok(collection) => collection,
      Err(errors) => bail!("The file contained the following problems:\n{errors}"),
    };
    collections.push((category_id, collection));
  }

  let summary: Vec<String> = collections
    .iter()
    .map(|(category_id, collection)| {
      let name = by_id.get(category_id).map(String::as_str).unwrap_or("unknown");
      format!("* {} '{}' posts", collection.len(), name)
    })
    .collect();
  println!("Preparing to upload:\n{}", summary.join("\n"));

  let progress = ProgressBar::new(collections.len() as u64);
  for (category_id, collection) in &collections {
    monitors.train(cmd.monitor_id, collection).await?;
    let name = by_id.get(category_id).map(String::as_str).unwrap_or("unknown");
    info!("uploaded {} '{}' training documents", collection.len(), name);
    progress.inc(1);
    println!("Successfully uploaded {} {} docs!", collection.len(), name);
  }
  progress.finish_and_clear();

  Ok(())
}

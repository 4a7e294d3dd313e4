use crate::commands::client_from;
use crate::config::Config;
use crate::flatten::flatten_posts;
use crate::spreadsheet;
use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputType {
  Csv,
  Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostType {
  PostList,
  TrainingPosts,
}

#[derive(Args, Debug)]
pub struct ExportCommand {
  /// Monitor to export posts from
  pub monitor_id: i64,

  /// Start and end date of the export in YYYY-MM-DD format
  #[arg(short, long, num_args = 2, value_names = ["START", "END"])]
  pub dates: Option<Vec<String>>,

  /// File type of the export
  #[arg(short, long, value_enum, default_value_t = OutputType::Csv)]
  pub output_type: OutputType,

  /// Export monitor posts or training documents
  #[arg(short, long, value_enum, default_value_t = PostType::PostList)]
  pub post_type: PostType,

  /// Output filename; default is derived from the monitor name
  #[arg(short, long)]
  pub filename: Option<PathBuf>,

  /// CSV column separator
  #[arg(short, long, default_value = ",")]
  pub separator: String,

  /// Extend the per-call post limit from 500 to 10000
  #[arg(short = 'l', long)]
  pub extend_limit: bool,
}

pub async fn execute(cmd: ExportCommand, config: Config) -> Result<()> {
  let client = client_from(&config).await?;
  let monitors = client.monitors();
  let detail = monitors.detail(cmd.monitor_id).await?;

  let mut info = detail.name.clone();
  let docs: Vec<Value> = match cmd.post_type {
    PostType::PostList => {
      let (start, end) = match &cmd.dates {
        Some(range) if range.len() == 2 => (range[0].clone(), range[1].clone()),
        Some(_) => bail!("--dates takes exactly two dates"),
        None => (detail.results_start.clone(), detail.results_end.clone()),
      };
      monitors
        .posts(cmd.monitor_id, &start, &end, None, cmd.extend_limit, false, false)
        .await?
        .posts
    }
    PostType::TrainingPosts => {
      info.push_str("_Training");
      monitors.training_posts(cmd.monitor_id, None).await?.training_posts
    }
  };

  match cmd.output_type {
    OutputType::Json => {
      for post in &docs {
        println!("{}", serde_json::to_string(post)?);
      }
    }
    OutputType::Csv => {
      let delimiter = spreadsheet::delimiter(&cmd.separator)?;
      let path = cmd.filename.unwrap_or_else(|| {
        PathBuf::from(format!("{}_{}_Posts.csv", cmd.monitor_id, info.replace(' ', "_")))
      });
      write_csv(&path, delimiter, &docs)?;
      println!("Done!");
    }
  }
  Ok(())
}

fn write_csv(path: &PathBuf, delimiter: u8, docs: &[Value]) -> Result<()> {
  let (headers, rows) = flatten_posts(docs);
  let mut writer = csv::WriterBuilder::new()
    .delimiter(delimiter)
    .from_path(path)
    .with_context(|| format!("could not create '{}'", path.display()))?;

  writer.write_record(&headers)?;
  for row in &rows {
    let record: Vec<&str> =
      headers.iter().map(|header| row.get(header).map(String::as_str).unwrap_or("")).collect();
    writer.write_record(&record)?;
  }
  writer.flush()?;
  Ok(())
}

use crate::commands::client_from;
use crate::config::Config;
use crate::flatten::flatten_posts;
use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use tokio::time::{sleep, Duration};
use tracing::debug;

/// Hard cap on posts drained in one invocation
const MAX_STREAM_DOCS: u64 = 10_000;

/// Hard cap on poll requests in one invocation
const MAX_REQUESTS: u32 = 10_000;

/// Consecutive empty polls tolerated before giving up
const MAX_EMPTY_POLLS: u32 = 15;

/// Fixed pause between empty polls
const EMPTY_POLL_DELAY: Duration = Duration::from_millis(600);

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputType {
  Json,
  Csv,
}

#[derive(Args, Debug)]
pub struct StreamPostsCommand {
  /// Stream to drain, available via the stream_list metadata
  pub stream_id: i64,

  /// Stop streaming after this many posts (capped at 10000)
  #[arg(short, long, default_value_t = 100)]
  pub max_docs: u64,

  /// Type of data to output
  #[arg(short, long, value_enum, default_value_t = OutputType::Json)]
  pub output_type: OutputType,

  /// CSV column separator
  #[arg(short, long, default_value = ",")]
  pub separator: String,
}

pub async fn execute(cmd: StreamPostsCommand, config: Config) -> Result<()> {
  let delimiter = crate::spreadsheet::delimiter(&cmd.separator)?;
  let client = client_from(&config).await?;
  let streams = client.streams();

  let max_docs = cmd.max_docs.min(MAX_STREAM_DOCS);
  let mut so_far: u64 = 0;
  let mut requests: u32 = 0;
  let mut empty_polls: u32 = 0;
  let mut csv_headers: Option<Vec<String>> = None;

  while so_far < max_docs && requests < MAX_REQUESTS {
    requests += 1;
    let response = streams.posts(cmd.stream_id, 100).await?;

    if response.total_posts_available == 0 {
      if empty_polls > MAX_EMPTY_POLLS {
        bail!("Stream volume is zero.");
      }
      debug!("stream {} empty, polling again", cmd.stream_id);
      sleep(EMPTY_POLL_DELAY).await;
      empty_polls += 1;
      continue;
    }

    match cmd.output_type {
      OutputType::Json => {
        for post in &response.posts {
          println!("{}", serde_json::to_string(post)?);
        }
      }
      OutputType::Csv => {
        emit_csv(&response.posts, delimiter, &mut csv_headers)?;
      }
    }

    so_far += response.posts.len() as u64;
  }

  Ok(())
}

/// Write a batch of posts to stdout as CSV, emitting the header row once.
///
/// The first batch fixes the column set for the whole run.
fn emit_csv(
  posts: &[serde_json::Value],
  delimiter: u8,
  headers: &mut Option<Vec<String>>,
) -> Result<()> {
  let (batch_headers, rows) = flatten_posts(posts);

  let stdout = std::io::stdout();
  let mut writer =
    csv::WriterBuilder::new().delimiter(delimiter).from_writer(stdout.lock());

  if headers.is_none() {
    writer.write_record(&batch_headers)?;
    *headers = Some(batch_headers);
  }

  if let Some(headers) = headers.as_ref() {
    for row in &rows {
      let record: Vec<&str> =
        headers.iter().map(|header| row.get(header).map(String::as_str).unwrap_or("")).collect();
      writer.write_record(&record)?;
    }
  }
  writer.flush()?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_emit_csv_writes_headers_once() {
    let mut headers = None;
    let posts = vec![json!({"title": "a"})];
    emit_csv(&posts, b',', &mut headers).unwrap();
    assert_eq!(headers, Some(vec!["title".to_string()]));

    // A second batch keeps the first batch's columns.
    let posts = vec![json!({"title": "b", "extra": "x"})];
    emit_csv(&posts, b',', &mut headers).unwrap();
    assert_eq!(headers.unwrap(), vec!["title".to_string()]);
  }
}

use crate::commands::client_from;
use crate::config::Config;
use anyhow::{anyhow, bail, Result};
use clap::Args;
use hx_client::endpoints::monitor::AggregateMetric;

#[derive(Args, Debug)]
pub struct ResultsCommand {
  /// Monitor id to aggregate results for
  pub monitor_id: i64,

  /// Metrics to fetch: volume, word_cloud, top_sources,
  /// interest_affinities, sentiment_and_categories
  #[arg(required = true)]
  pub metrics: Vec<String>,

  /// Start and end date of the aggregation in YYYY-MM-DD format
  #[arg(short, long, num_args = 2, value_names = ["START", "END"])]
  pub date_range: Option<Vec<String>>,
}

pub async fn execute(cmd: ResultsCommand, config: Config) -> Result<()> {
  let metrics: Vec<AggregateMetric> = cmd
    .metrics
    .iter()
    .map(|name| {
      AggregateMetric::parse(name).ok_or_else(|| {
        let valid: Vec<&str> =
          AggregateMetric::all().iter().map(|metric| metric.name()).collect();
        anyhow!("invalid metric '{name}'; valid metrics are {valid:?}")
      })
    })
    .collect::<Result<_>>()?;

  let client = client_from(&config).await?;
  let monitors = client.monitors();

  let (start, end) = match &cmd.date_range {
    Some(range) if range.len() == 2 => (range[0].clone(), range[1].clone()),
    Some(_) => bail!("--date-range takes exactly two dates"),
    None => {
      let detail = monitors.detail(cmd.monitor_id).await?;
      (detail.results_start, detail.results_end)
    }
  };

  let aggregated =
    monitors.aggregate(&[cmd.monitor_id], &[(start, end)], &metrics).await?;

  if let Some(range) = aggregated.first().and_then(|monitor| monitor.results.first()) {
    println!("{}", serde_json::to_string(&range.results)?);
  }
  Ok(())
}

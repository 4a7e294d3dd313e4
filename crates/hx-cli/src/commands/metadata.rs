use crate::commands::client_from;
use crate::config::Config;
use anyhow::{bail, Result};
use clap::Args;

const CHOICES: [&str; 9] = [
  "team_list",
  "monitor_list",
  "geography",
  "states",
  "cities",
  "countries",
  "image_classes",
  "monitor_details",
  "stream_list",
];

#[derive(Args, Debug)]
pub struct MetadataCommand {
  /// Which listing to fetch
  #[arg(value_parser = CHOICES)]
  pub info: String,

  /// Team id for monitor_list and stream_list
  #[arg(short, long)]
  pub team_id: Option<i64>,

  /// Country code for city or state geography
  #[arg(short, long)]
  pub country: Option<String>,

  /// Monitor id for monitor_details
  #[arg(short, long)]
  pub monitor_id: Option<i64>,
}

pub async fn execute(cmd: MetadataCommand, config: Config) -> Result<()> {
  let client = client_from(&config).await?;
  let metadata = client.metadata();

  let rendered = match cmd.info.as_str() {
    "team_list" => serde_json::to_string(&metadata.team_list().await?)?,
    "monitor_list" => serde_json::to_string(&metadata.monitor_list(cmd.team_id).await?)?,
    "geography" => serde_json::to_string(&metadata.geography().await?)?,
    "states" => match &cmd.country {
      Some(country) => serde_json::to_string(&metadata.states(country).await?)?,
      None => bail!("states requires --country"),
    },
    "cities" => match &cmd.country {
      Some(country) => serde_json::to_string(&metadata.cities(country).await?)?,
      None => bail!("cities requires --country"),
    },
    "countries" => serde_json::to_string(&metadata.countries().await?)?,
    "image_classes" => serde_json::to_string(&metadata.image_classes().await?)?,
    "monitor_details" => match cmd.monitor_id {
      Some(monitor_id) => serde_json::to_string(&client.monitors().detail(monitor_id).await?)?,
      None => bail!("monitor_details requires --monitor-id"),
    },
    "stream_list" => match cmd.team_id {
      Some(team_id) => serde_json::to_string(&client.streams().stream_list(team_id).await?)?,
      None => bail!("stream_list requires --team-id"),
    },
    other => bail!("unknown metadata listing '{other}'"),
  };

  println!("{rendered}");
  Ok(())
}

use crate::commands::client_from;
use crate::config::Config;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct ApiDocsCommand {
  /// Pretty-print the documentation JSON
  #[arg(short, long)]
  pub pretty: bool,
}

pub async fn execute(cmd: ApiDocsCommand, config: Config) -> Result<()> {
  let client = client_from(&config).await?;
  let docs = client.metadata().api_documentation().await?;
  if cmd.pretty {
    println!("{}", serde_json::to_string_pretty(&docs)?);
  } else {
    println!("{}", serde_json::to_string(&docs)?);
  }
  Ok(())
}

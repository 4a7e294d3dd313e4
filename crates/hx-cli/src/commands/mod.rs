pub mod docs;
pub mod export;
pub mod login;
pub mod metadata;
pub mod results;
pub mod stream;
pub mod train;
pub mod upload;

use crate::config::Config;
use anyhow::Result;
use hx_client::CrimsonClient;

/// Build an authenticated client, logging in interactively if no cached
/// token exists
pub async fn client_from(config: &Config) -> Result<CrimsonClient> {
  let session = login::ensure_session(config).await?;
  let mut core = session.into_config();
  core.rate_limit = config.rate_limit;
  core.timeout_secs = config.timeout_secs;
  Ok(CrimsonClient::new(core)?)
}

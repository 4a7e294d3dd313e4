use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
  pub base_url: String,
  pub rate_limit: u32,
  pub timeout_secs: u64,
  pub token_file: Option<PathBuf>,
}

impl Config {
  pub fn from_env() -> Result<Self> {
    let base_url =
      env::var("HX_BASE_URL").unwrap_or_else(|_| hx_core::CRIMSON_BASE_URL.to_string());

    let rate_limit = env::var("HX_RATE_LIMIT")
      .ok()
      .and_then(|value| value.parse().ok())
      .unwrap_or(hx_core::DEFAULT_RATE_LIMIT);

    let timeout_secs =
      env::var("HX_TIMEOUT_SECS").ok().and_then(|value| value.parse().ok()).unwrap_or(30);

    let token_file = env::var("HX_TOKEN_FILE").ok().map(PathBuf::from);

    Ok(Self { base_url, rate_limit, timeout_secs, token_file })
  }
}

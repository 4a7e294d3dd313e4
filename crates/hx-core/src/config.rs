//! Configuration management for the Crimson Hexagon client

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use dotenvy::dotenv;

/// Main configuration struct for the Crimson Hexagon client
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
  /// API authentication token, passed as the `auth` query parameter
  pub auth_token: String,

  /// API rate limit (requests per minute)
  pub rate_limit: u32,

  /// Request timeout in seconds
  pub timeout_secs: u64,

  /// Base URL for the ForSight API
  pub base_url: String,
}

impl Config {
  /// Load configuration from environment variables
  pub fn from_env() -> Result<Self> {

    dotenv().ok();

    let auth_token = env::var("CRIMSON_API_TOKEN")
      .map_err(|_| Error::Auth("CRIMSON_API_TOKEN not set".to_string()))?;

    let rate_limit = env::var("HX_RATE_LIMIT")
      .unwrap_or_else(|_| crate::DEFAULT_RATE_LIMIT.to_string())
      .parse()
      .map_err(|_| Error::Config("Invalid HX_RATE_LIMIT".to_string()))?;

    let timeout_secs = env::var("HX_TIMEOUT_SECS")
      .unwrap_or_else(|_| "30".to_string())
      .parse()
      .map_err(|_| Error::Config("Invalid HX_TIMEOUT_SECS".to_string()))?;

    let base_url =
      env::var("HX_BASE_URL").unwrap_or_else(|_| crate::CRIMSON_BASE_URL.to_string());

    Ok(Config { auth_token, rate_limit, timeout_secs, base_url })
  }

  /// Create a config with default values from a bare token
  pub fn default_with_token(auth_token: String) -> Self {
    Config {
      auth_token,
      rate_limit: crate::DEFAULT_RATE_LIMIT,
      timeout_secs: 30,
      base_url: crate::CRIMSON_BASE_URL.to_string(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_config_default_with_token() {
    let config = Config::default_with_token("test_token".to_string());
    assert_eq!(config.auth_token, "test_token");
    assert_eq!(config.rate_limit, crate::DEFAULT_RATE_LIMIT);
    assert_eq!(config.base_url, crate::CRIMSON_BASE_URL);
  }

  #[test]
  fn test_config_from_env() {
    env::set_var("CRIMSON_API_TOKEN", "env_token");
    let config = Config::from_env().unwrap();
    assert_eq!(config.auth_token, "env_token");
    assert_eq!(config.rate_limit, 120);
  }
}

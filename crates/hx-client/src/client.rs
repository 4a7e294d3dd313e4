/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use crate::auth::Session;
use crate::endpoints::{
  analysis::AnalysisEndpoints, content_upload::ContentEndpoints, custom::CustomEndpoints,
  metadata::MetadataEndpoints, monitor::MonitorEndpoints, realtime::RealtimeEndpoints,
  streams::StreamEndpoints,
};
use crate::limit::RateLimiter;
use crate::transport::Transport;
use hx_core::{Config, Result};
use std::sync::Arc;

/// Main Crimson Hexagon ForSight API client
///
/// Provides access to all ForSight endpoints through organized endpoint
/// groups. One rate limiter and one transport are owned here and shared by
/// reference with every group, so a client instance observes a single
/// per-minute call quota no matter which endpoints are used.
///
/// # Examples
///
/// ```ignore
/// use hx_client::CrimsonClient;
/// use hx_core::Config;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::from_env()?;
///     let client = CrimsonClient::new(config)?;
///
///     let detail = client.monitors().detail(monitor_id).await?;
///     let posts = client
///         .monitors()
///         .posts(monitor_id, &detail.results_start, &detail.results_end, None, false, false, false)
///         .await?;
///
///     Ok(())
/// }
/// ```
pub struct CrimsonClient {
  limiter: Arc<RateLimiter>,
  transport: Arc<Transport>,
}

impl CrimsonClient {
  /// Create a new ForSight API client
  ///
  /// # Arguments
  ///
  /// * `config` - Configuration containing the auth token and rate limit
  ///
  /// # Errors
  ///
  /// Returns an error if the HTTP client cannot be created.
  pub fn new(config: Config) -> Result<Self> {
    // A zero rate limit would deadlock every call, fall back to the default
    let rate_limit =
      if config.rate_limit == 0 { hx_core::DEFAULT_RATE_LIMIT } else { config.rate_limit };
    let limiter = Arc::new(RateLimiter::per_minute(rate_limit));

    let transport = Arc::new(Transport::new(&config)?);

    Ok(Self { transport, limiter })
  }

  /// Create a client from an authenticated session
  pub fn from_session(session: Session) -> Result<Self> {
    Self::new(session.into_config())
  }

  /// Create a client with a custom rate limiter
  pub fn with_limiter(config: Config, limiter: Arc<RateLimiter>) -> Result<Self> {
    Ok(Self { transport: Arc::new(Transport::new(&config)?), limiter })
  }

  /// Get access to monitor results endpoints
  pub fn monitors(&self) -> MonitorEndpoints {
    MonitorEndpoints::new(self.transport.clone(), self.limiter.clone())
  }

  /// Get access to account and platform metadata endpoints
  pub fn metadata(&self) -> MetadataEndpoints {
    MetadataEndpoints::new(self.transport.clone(), self.limiter.clone())
  }

  /// Get access to custom content upload endpoints
  pub fn content(&self) -> ContentEndpoints {
    ContentEndpoints::new(self.transport.clone(), self.limiter.clone())
  }

  /// Get access to realtime stream endpoints
  pub fn streams(&self) -> StreamEndpoints {
    StreamEndpoints::new(self.transport.clone(), self.limiter.clone())
  }

  /// Get access to realtime monitor results endpoints
  pub fn realtime(&self) -> RealtimeEndpoints {
    RealtimeEndpoints::new(self.transport.clone(), self.limiter.clone())
  }

  /// Get access to ad-hoc analysis endpoints
  pub fn analysis(&self) -> AnalysisEndpoints {
    AnalysisEndpoints::new(self.transport.clone(), self.limiter.clone())
  }

  /// Get raw access to an arbitrary API path prefix
  ///
  /// # Examples
  ///
  /// ```ignore
  /// # let client = CrimsonClient::new(config)?;
  /// let raw = client.custom("monitor/");
  /// let audit = raw.get("audit", &[("id", monitor_id.to_string())]).await?;
  /// ```
  pub fn custom(&self, endpoint: &str) -> CustomEndpoints {
    CustomEndpoints::new(self.transport.clone(), self.limiter.clone(), endpoint)
  }

  /// The per-minute call quota this client enforces
  pub fn rate_limit(&self) -> usize {
    self.limiter.max_calls()
  }
}

impl std::fmt::Debug for CrimsonClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CrimsonClient")
      .field("transport", &self.transport)
      .field("limiter", &self.limiter)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_client_creation() {
    let config = Config::default_with_token("test_token".to_string());
    let client = CrimsonClient::new(config).expect("Failed to create client");
    assert_eq!(client.rate_limit(), hx_core::DEFAULT_RATE_LIMIT as usize);
  }

  #[test]
  fn test_zero_rate_limit_falls_back_to_default() {
    let mut config = Config::default_with_token("test_token".to_string());
    config.rate_limit = 0;
    let client = CrimsonClient::new(config).expect("Failed to create client");
    assert_eq!(client.rate_limit(), hx_core::DEFAULT_RATE_LIMIT as usize);
  }

  #[test]
  fn test_from_session() {
    let session =
      Session::from_token("https://mock.crimsonhexagon.com/api/", "tok".to_string());
    let client = CrimsonClient::from_session(session).expect("Failed to create client");
    assert_eq!(client.rate_limit(), hx_core::DEFAULT_RATE_LIMIT as usize);
  }
}

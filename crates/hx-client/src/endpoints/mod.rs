pub mod analysis;
pub mod content_upload;
pub mod custom;
pub mod metadata;
pub mod monitor;
pub mod realtime;
pub mod streams;

use crate::transport::Transport;
use std::sync::Arc;

/// Base trait for endpoint implementations
///
/// Provides the rate-limit gate and transport access shared by all
/// endpoint groups.
pub trait EndpointBase {
  /// Wait for a rate-limit slot before making a request
  async fn wait_for_slot(&self);

  /// Get a reference to the transport layer
  fn transport(&self) -> &Arc<Transport>;
}

/// Macro to implement the EndpointBase trait for endpoint structs
macro_rules! impl_endpoint_base {
  ($struct_name:ident) => {
    impl crate::endpoints::EndpointBase for $struct_name {
      async fn wait_for_slot(&self) {
        self.limiter.acquire().await;
      }

      fn transport(&self) -> &std::sync::Arc<crate::transport::Transport> {
        &self.transport
      }
    }
  };
}

pub(crate) use impl_endpoint_base;

#[cfg(test)]
pub(crate) mod test_support {
  use super::*;
  use crate::limit::RateLimiter;

  /// Transport + limiter pair pointed at a wiremock server
  pub fn harness(base_url: &str) -> (Arc<Transport>, Arc<RateLimiter>) {
    let transport = Arc::new(
      Transport::with_token(base_url, Some("test_token".to_string()), 30)
        .expect("mock transport"),
    );
    let limiter = Arc::new(RateLimiter::per_minute(hx_core::DEFAULT_RATE_LIMIT));
    (transport, limiter)
  }
}

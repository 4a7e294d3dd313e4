//! Sliding-window rate limiting shared by every endpoint group
//!
//! One limiter instance is owned by the client and handed to each endpoint
//! group by reference; every API method records a call here before touching
//! the network.

use std::collections::VecDeque;

use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};
use tracing::info;

/// Extra wait added on top of the computed window clearance
const SAFETY_MARGIN: Duration = Duration::from_millis(100);

/// Limits calls to `max_calls` per `period` by blocking the caller.
///
/// A queue of call timestamps is kept behind a single lock. When the queue
/// is full, the caller sleeps until the oldest timestamp falls outside the
/// window (plus a safety margin) and the queue is cleared, so a burst that
/// hit the cap starts a fresh window. Acquisition cannot fail, it can only
/// delay.
#[derive(Debug)]
pub struct RateLimiter {
  max_calls: usize,
  period: Duration,
  calls: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
  pub fn new(max_calls: u32, period: Duration) -> Self {
    Self {
      max_calls: max_calls.max(1) as usize,
      period,
      calls: Mutex::new(VecDeque::new()),
    }
  }

  /// Limiter over the API's one-minute quota window
  pub fn per_minute(max_calls: u32) -> Self {
    Self::new(max_calls, Duration::from_secs(hx_core::ONE_MINUTE))
  }

  /// Record one call, sleeping first if the window is exhausted.
  ///
  /// The lock is held for the whole acquisition, so concurrent callers
  /// sharing one client queue up behind the sleeping one.
  pub async fn acquire(&self) {
    let mut calls = self.calls.lock().await;
    if calls.len() >= self.max_calls {
      if let Some(&oldest) = calls.front() {
        let elapsed = Instant::now().duration_since(oldest);
        if elapsed < self.period {
          let wait = self.period - elapsed + SAFETY_MARGIN;
          info!("Rate limit reached. Sleeping for {:.1} seconds", wait.as_secs_f64());
          sleep(wait).await;
        }
      }
      calls.clear();
    }
    calls.push_back(Instant::now());

    // Drop timestamps that have slid out of the window.
    while let (Some(&oldest), Some(&newest)) = (calls.front(), calls.back()) {
      if newest.duration_since(oldest) >= self.period {
        calls.pop_front();
      } else {
        break;
      }
    }
  }

  pub fn max_calls(&self) -> usize {
    self.max_calls
  }

  pub fn period(&self) -> Duration {
    self.period
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test(start_paused = true)]
  async fn test_first_calls_never_sleep() {
    let limiter = RateLimiter::new(10, Duration::from_secs(1));
    let start = Instant::now();
    for _ in 0..10 {
      limiter.acquire().await;
    }
    assert_eq!(Instant::now(), start);
  }

  #[tokio::test(start_paused = true)]
  async fn test_call_over_limit_blocks_until_window_clears() {
    let limiter = RateLimiter::new(10, Duration::from_secs(1));
    for _ in 0..10 {
      limiter.acquire().await;
    }

    let start = Instant::now();
    limiter.acquire().await;
    let waited = Instant::now().duration_since(start);
    assert!(waited >= Duration::from_secs(1), "11th call returned after {waited:?}");
    assert!(waited < Duration::from_secs(2));

    // The 12th call rides the fresh window.
    let start = Instant::now();
    limiter.acquire().await;
    assert_eq!(Instant::now(), start);
  }

  #[tokio::test(start_paused = true)]
  async fn test_stale_queue_does_not_sleep() {
    let limiter = RateLimiter::new(2, Duration::from_secs(1));
    limiter.acquire().await;
    limiter.acquire().await;

    tokio::time::advance(Duration::from_secs(5)).await;

    let start = Instant::now();
    limiter.acquire().await;
    assert_eq!(Instant::now(), start);
  }

  #[tokio::test(start_paused = true)]
  async fn test_concurrent_callers_share_one_window() {
    use std::sync::Arc;

    let limiter = Arc::new(RateLimiter::new(2, Duration::from_secs(1)));
    let start = Instant::now();

    let mut handles = Vec::new();
    for _ in 0..3 {
      let limiter = limiter.clone();
      handles.push(tokio::spawn(async move {
        limiter.acquire().await;
      }));
    }
    for handle in handles {
      handle.await.expect("acquire task panicked");
    }

    // Two calls fit in the window, the third had to wait it out.
    assert!(Instant::now().duration_since(start) >= Duration::from_secs(1));
  }

  #[test]
  fn test_zero_max_calls_is_clamped() {
    let limiter = RateLimiter::new(0, Duration::from_secs(1));
    assert_eq!(limiter.max_calls(), 1);
  }
}

//! # hx-client
//!
//! A Crimson Hexagon ForSight API client for Rust.
//!
//! ## Features
//!
//! - **Async/Await**: Built on tokio and reqwest
//! - **Rate Limiting**: One sliding-window limiter per client, shared by
//!   every endpoint group
//! - **Uniform Errors**: Every response flows through one handler; failures
//!   carry the raw response body
//! - **Validated Uploads**: Bulk content and training uploads take
//!   pre-validated collections from hx-models and split into batches of
//!   1000 automatically
//! - **Token Management**: Login, token caching, and session loading
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hx_client::CrimsonClient;
//! use hx_core::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let client = CrimsonClient::new(config)?;
//!
//!     let teams = client.metadata().team_list().await?;
//!     println!("{} teams visible", teams.teams.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Rate Limiting
//!
//! The platform allows 120 calls per minute per token. The limiter keeps a
//! timestamp queue and blocks the calling task until the window clears,
//! logging the wait; it never fails a request.

#![warn(clippy::all)]

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod limit;
pub mod transport;

// Re-export the main client and common types
pub use auth::Session;
pub use client::CrimsonClient;
pub use hx_core::{Config, Error, Result};
pub use limit::RateLimiter;

// Re-export endpoint groups for direct access if needed
pub use endpoints::{
    analysis::AnalysisEndpoints,
    content_upload::ContentEndpoints,
    custom::CustomEndpoints,
    metadata::MetadataEndpoints,
    monitor::MonitorEndpoints,
    realtime::RealtimeEndpoints,
    streams::StreamEndpoints,
};

pub mod config;
pub mod error;

pub use config::Config;
pub use error::{Error, Result};

/// Base URL for the Crimson Hexagon ForSight API
pub const CRIMSON_BASE_URL: &str = "https://api.crimsonhexagon.com/api/";

/// API rate limits
pub const DEFAULT_RATE_LIMIT: u32 = 120; // requests per minute
/// Rate limit window in seconds
pub const ONE_MINUTE: u64 = 60;

/// Maximum number of documents accepted by a single upload or train call
pub const UPLOAD_BATCH_SIZE: usize = 1000;

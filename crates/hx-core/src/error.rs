use thiserror::Error;

/// The main error type for hx-* crates
#[derive(Error, Debug)]
pub enum Error {
  /// Environment variable error
  #[error("Environment variable error: {0}")]
  EnvVar(#[from] std::env::VarError),

  /// Configuration error
  #[error("Configuration error: {0}")]
  Config(String),

  /// Authentication / token error
  #[error("Authentication error: {0}")]
  Auth(String),

  /// Serialization/Deserialization error
  #[error("Serialization error")]
  Serde(#[from] serde_json::Error),

  /// Date/Time parsing error
  #[error("Date parsing error")]
  ParseDate(#[from] chrono::ParseError),

  /// Missing required field in response
  #[error("Missing required field: {0}")]
  MissingField(String),

  /// Token file IO error
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  /// HTTP transport error
  #[error("HTTP error: {0}")]
  Http(String),

  /// API error from the ForSight platform, carries the raw response body
  #[error("API error: {0}")]
  Api(String),

  /// Parse error for response decoding
  #[error("Parse error: {0}")]
  Parse(String),
}

/// Result type alias for hx-* crates
pub type Result<T> = std::result::Result<T, Error>;

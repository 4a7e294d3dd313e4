//! Session and token management
//!
//! A [`Session`] is the bearer token plus the API root it was issued for.
//! Tokens come from the authenticate endpoint or from a cached token file
//! (`~/.crimson/token.json` by default) and feed straight into a
//! [`Config`](hx_core::Config) for client construction.

use std::fs;
use std::path::{Path, PathBuf};

use hx_core::{Config, Error, Result};
use hx_models::responses::AuthToken;
use serde_json::json;
use tracing::info;

use crate::transport::Transport;

const TOKEN_DIR: &str = ".crimson";
const TOKEN_FILE: &str = "token.json";

/// An authenticated session against one API root
#[derive(Debug, Clone)]
pub struct Session {
    /// Bearer token passed as the `auth` query parameter on every request
    pub token: String,

    /// API root this token was issued for
    pub base_url: String,
}

impl Session {
    /// Default on-disk location of the cached token
    pub fn default_token_file() -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(TOKEN_DIR).join(TOKEN_FILE)
    }

    /// Create a session from an already-issued token
    pub fn from_token(base_url: &str, token: String) -> Self {
        Self { token, base_url: base_url.to_string() }
    }

    /// Request a token from the authenticate endpoint.
    ///
    /// # Arguments
    ///
    /// * `username` - account username
    /// * `password` - account password
    /// * `no_expiration` - if true, the issued token does not expire in 24 hours
    /// * `force` - if true, forces a token refresh for the requesting user
    pub async fn login(
        base_url: &str,
        username: &str,
        password: &str,
        no_expiration: bool,
        force: bool,
    ) -> Result<Self> {
        let transport = Transport::unauthenticated(base_url)?;
        let params = [
            ("username", username.to_string()),
            ("password", password.to_string()),
            ("noExpiration", no_expiration.to_string()),
            ("force", force.to_string()),
        ];
        let token: AuthToken = transport.get("authenticate", &params).await?;
        Ok(Self::from_token(base_url, token.auth))
    }

    /// Persist the token as `{"auth": "<token>"}` JSON.
    ///
    /// Returns the path written. Defaults to [`Session::default_token_file`].
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_token_file);
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let payload = serde_json::to_string_pretty(&json!({ "auth": self.token }))?;
        fs::write(&path, payload)?;
        Ok(path)
    }

    /// Load a previously saved token file
    pub fn load(base_url: &str, path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_token_file);
        let raw = fs::read_to_string(&path).map_err(|_| {
            Error::Auth(format!(
                "credentials file at '{}' not found. Please log in with username and password",
                path.display()
            ))
        })?;
        let token: AuthToken = serde_json::from_str(&raw)?;
        info!("using cached token from {}", path.display());
        Ok(Self::from_token(base_url, token.auth))
    }

    /// Build a client configuration from this session
    pub fn into_config(self) -> Config {
        let mut config = Config::default_with_token(self.token);
        config.base_url = self.base_url;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let token_path = dir.path().join("nested").join("token.json");

        let session = Session::from_token("https://mock.crimsonhexagon.com/api/", "tok123".to_string());
        let written = session.save(Some(&token_path)).unwrap();
        assert_eq!(written, token_path);

        let loaded = Session::load("https://mock.crimsonhexagon.com/api/", Some(&token_path)).unwrap();
        assert_eq!(loaded.token, "tok123");
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("token.json");
        let err = Session::load("https://mock.crimsonhexagon.com/api/", Some(&missing)).unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
        assert!(err.to_string().contains("token.json"));
    }

    #[tokio::test]
    async fn test_login_requests_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/authenticate"))
            .and(query_param("username", "user@example.com"))
            .and(query_param("noExpiration", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"auth": "fresh-token"})))
            .expect(1)
            .mount(&server)
            .await;

        let session =
            Session::login(&server.uri(), "user@example.com", "hunter2", true, false).await.unwrap();
        assert_eq!(session.token, "fresh-token");
    }

    #[test]
    fn test_into_config_carries_base_url() {
        let session = Session::from_token("https://mock.crimsonhexagon.com/api/", "tok".to_string());
        let config = session.into_config();
        assert_eq!(config.auth_token, "tok");
        assert_eq!(config.base_url, "https://mock.crimsonhexagon.com/api/");
    }
}

//! HTTP transport layer for ForSight API requests

use hx_core::{Config, Error, Result};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTP transport for the ForSight REST API.
///
/// Builds request URLs against the configured API root, appends the `auth`
/// token query parameter to every request, and funnels every response
/// through one uniform handler: a non-success status or a decoded body whose
/// `status` field equals `"error"` becomes an [`Error::Api`] carrying the
/// raw response body; anything else is deserialized into the caller's type.
/// There are no retries.
pub struct Transport {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
    timeout: Duration,
}

impl Transport {
    /// Create a transport from a client configuration
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_token(&config.base_url, Some(config.auth_token.clone()), config.timeout_secs)
    }

    /// Transport without credentials, used only by the authenticate flow
    pub fn unauthenticated(base_url: &str) -> Result<Self> {
        Self::with_token(base_url, None, 30)
    }

    /// Create a transport against an arbitrary API root
    pub fn with_token(
        base_url: &str,
        auth_token: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("hx-client/0.1.0")
            .build()
            .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        Ok(Self { client, base_url, auth_token, timeout: Duration::from_secs(timeout_secs) })
    }

    /// Make a GET request against an endpoint path
    pub async fn get<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request(Method::GET, path, params, None::<&()>).await
    }

    /// Make a POST request with a JSON body
    pub async fn post<T, B>(&self, path: &str, params: &[(&str, String)], body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, params, Some(body)).await
    }

    /// Make a POST request carrying query parameters only
    pub async fn post_params<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, params, None::<&()>).await
    }

    /// Make a DELETE request
    pub async fn delete<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request(Method::DELETE, path, params, None::<&()>).await
    }

    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.build_url(path, params)?;
        debug!("{} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response =
            request.send().await.map_err(|e| Error::Http(format!("request failed: {e}")))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Http(format!("failed to read response body: {e}")))?;

        handle_payload(status, &text)
    }

    /// Build the full URL for a request, auth token included
    fn build_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .and_then(|base| base.join(path))
            .map_err(|e| Error::Http(format!("invalid request URL: {e}")))?;

        {
            let mut query_pairs = url.query_pairs_mut();
            if let Some(token) = &self.auth_token {
                query_pairs.append_pair("auth", token);
            }
            for (key, value) in params {
                query_pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Get the API root being used
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the request timeout duration
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Normalize a completed response into decoded JSON or a uniform error
fn handle_payload<T>(status: StatusCode, body: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    if !matches!(status.as_u16(), 200 | 201 | 202) {
        return Err(Error::Api(format!("request failed with status {status}: {body}")));
    }

    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        let prefix: String = body.chars().take(200).collect();
        Error::Parse(format!("invalid JSON response: {e}. Response: {prefix}"))
    })?;

    if value.get("status").and_then(|s| s.as_str()) == Some("error") {
        return Err(Error::Api(format!("platform reported an error: {body}")));
    }

    serde_json::from_value(value)
        .map_err(|e| Error::Parse(format!("failed to decode response: {e}")))
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn mock_transport() -> Transport {
        Transport::with_token(
            "https://mock.crimsonhexagon.com/api/",
            Some("test_token".to_string()),
            30,
        )
        .expect("transport")
    }

    #[test]
    fn test_build_url_appends_auth_and_params() {
        let transport = mock_transport();
        let url = transport
            .build_url("monitor/detail", &[("id", "123".to_string())])
            .unwrap()
            .to_string();

        assert!(url.starts_with("https://mock.crimsonhexagon.com/api/monitor/detail"));
        assert!(url.contains("auth=test_token"));
        assert!(url.contains("id=123"));
    }

    #[test]
    fn test_base_url_gains_trailing_slash() {
        let transport =
            Transport::with_token("http://127.0.0.1:9999", Some("t".to_string()), 30).unwrap();
        assert_eq!(transport.base_url(), "http://127.0.0.1:9999/");
    }

    #[test]
    fn test_handle_payload_rejects_error_status_field() {
        let body = r#"{"status": "error", "message": "no such monitor"}"#;
        let err = handle_payload::<Value>(StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, Error::Api(_)));
        assert!(err.to_string().contains("no such monitor"));
    }

    #[test]
    fn test_handle_payload_rejects_non_success_status() {
        let err = handle_payload::<Value>(StatusCode::FORBIDDEN, "auth token expired").unwrap_err();
        assert!(matches!(err, Error::Api(_)));
        assert!(err.to_string().contains("auth token expired"));
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn test_handle_payload_rejects_non_json() {
        let err = handle_payload::<Value>(StatusCode::OK, "<html>gateway</html>").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[tokio::test]
    async fn test_get_sends_auth_param_and_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/monitor/detail"))
            .and(query_param("auth", "test_token"))
            .and(query_param("id", "42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42, "name": "m"})))
            .expect(1)
            .mount(&server)
            .await;

        let transport =
            Transport::with_token(&server.uri(), Some("test_token".to_string()), 30).unwrap();
        let value: Value =
            transport.get("monitor/detail", &[("id", "42".to_string())]).await.unwrap();
        assert_eq!(value["name"], "m");
    }

    #[tokio::test]
    async fn test_error_response_surfaces_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/monitor/detail"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let transport = Transport::with_token(&server.uri(), Some("t".to_string()), 30).unwrap();
        let err = transport.get::<Value>("monitor/detail", &[]).await.unwrap_err();
        assert!(err.to_string().contains("upstream exploded"));
    }
}

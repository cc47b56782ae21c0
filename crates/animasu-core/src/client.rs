//! HTTP client for the Animasu site
//!
//! Every request carries the same browser-like header profile so the site
//! serves the regular HTML pages. Failures are reported once; nothing is
//! retried.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use tracing::{debug, warn};

use crate::error::{AnimasuError, Result};

/// Default site root
pub const DEFAULT_BASE_URL: &str = "https://v1.animasu.top";

/// User-Agent mimicking a desktop Chrome
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Configuration for the Animasu HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Site root every request path is appended to (default: `DEFAULT_BASE_URL`)
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// HTTP client that fetches raw page markup from the Animasu site
pub struct AnimasuClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnimasuClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .default_headers(default_headers())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Site root requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the markup of a site path
    ///
    /// # Arguments
    /// * `path` - Path relative to the site root (e.g., "/movie/?halaman=2")
    ///
    /// # Errors
    /// - `AnimasuError::HttpError` - Transport failure or timeout
    /// - `AnimasuError::NotFound` - Server returned 404
    /// - `AnimasuError::RateLimited` - Server returned 429
    /// - `AnimasuError::UnexpectedStatus` - Any other non-success status
    pub async fn fetch(&self, path: &str) -> Result<String> {
        let url = self.url_for(path);
        debug!(url = %url, "fetching page");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.text().await?);
        }

        warn!(url = %url, status = status.as_u16(), "upstream returned non-success status");

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AnimasuError::NotFound(url));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AnimasuError::RateLimited);
        }

        Err(AnimasuError::UnexpectedStatus {
            status: status.as_u16(),
            url,
        })
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AnimasuClient {
        AnimasuClient::with_config(ClientConfig {
            base_url: server.uri(),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_client_creation() {
        assert!(AnimasuClient::new().is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = AnimasuClient::with_config(ClientConfig {
            base_url: "https://example.test/".to_string(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(client.base_url(), "https://example.test");
        assert_eq!(client.url_for("/anime/x"), "https://example.test/anime/x");
        assert_eq!(client.url_for("nonton-x"), "https://example.test/nonton-x");
    }

    #[tokio::test]
    async fn test_fetch_sends_header_profile() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/"))
            .and(header_exists("user-agent"))
            .and(header_exists("accept"))
            .and(header_exists("accept-language"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(1)
            .mount(&server)
            .await;

        let body = client_for(&server).fetch("/movie/").await.unwrap();
        assert_eq!(body, "<html></html>");
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch("/anime/missing").await;
        match result {
            Err(AnimasuError::NotFound(url)) => assert!(url.ends_with("/anime/missing")),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_rate_limited_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).fetch("/movie/").await;
        assert!(matches!(result, Err(AnimasuError::RateLimited)));
    }

    #[tokio::test]
    async fn test_fetch_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).fetch("/movie/").await;
        assert!(matches!(
            result,
            Err(AnimasuError::UnexpectedStatus { status: 502, .. })
        ));
    }
}

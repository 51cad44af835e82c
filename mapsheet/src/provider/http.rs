//! HTTP transport for tile downloads.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, trace, warn};

use super::types::ProviderError;

/// Default request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Tile servers (OpenStreetMap in particular) refuse anonymous clients.
const USER_AGENT: &str = concat!("mapsheet/", env!("CARGO_PKG_VERSION"));

/// Fetches raw tile bytes. Non-2xx responses are errors.
pub trait AsyncHttpClient: Send + Sync {
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;
}

/// [`AsyncHttpClient`] backed by a pooled `reqwest::Client`.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT_SECS)
    }

    /// `timeout_secs` bounds each request from connect to last body byte.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ProviderError> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(8)
            .build()
            .map(|client| Self { client })
            .map_err(|e| ProviderError::HttpError(format!("cannot build HTTP client: {}", e)))
    }
}

impl Default for AsyncReqwestClient {
    /// # Panics
    ///
    /// If the TLS backend cannot be initialised.
    fn default() -> Self {
        Self::new().expect("HTTP client with default settings")
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        trace!(url, "Requesting tile");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(url, error = %e, timeout = e.is_timeout(), "Tile request failed");
            ProviderError::HttpError(format!("request to {} failed: {}", url, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!(url, status = status.as_u16(), "Tile server refused request");
            return Err(ProviderError::HttpError(format!("HTTP {} for {}", status, url)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("truncated body from {}: {}", url, e)))?;
        debug!(url, bytes = body.len(), "Tile downloaded");
        Ok(body.to_vec())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Answers every request with the same canned result and remembers
    /// which URLs were asked for.
    pub struct MockAsyncHttpClient {
        response: Result<Vec<u8>, ProviderError>,
        pub requested: Mutex<Vec<String>>,
    }

    impl MockAsyncHttpClient {
        pub fn ok(body: Vec<u8>) -> Self {
            Self {
                response: Ok(body),
                requested: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                response: Err(ProviderError::HttpError(message.to_string())),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl AsyncHttpClient for MockAsyncHttpClient {
        async fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
            self.requested.lock().push(url.to_string());
            self.response.clone()
        }
    }

    #[tokio::test]
    async fn test_mock_records_requests() {
        let mock = MockAsyncHttpClient::ok(vec![7; 3]);
        assert_eq!(mock.get("https://a.example/1/0/0.png").await.unwrap(), vec![7; 3]);
        assert_eq!(*mock.requested.lock(), vec!["https://a.example/1/0/0.png"]);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockAsyncHttpClient::failing("HTTP 503");
        assert_eq!(
            mock.get("https://a.example/1/0/0.png").await,
            Err(ProviderError::HttpError("HTTP 503".to_string()))
        );
    }

    #[test]
    fn test_client_builds_with_timeout() {
        assert!(AsyncReqwestClient::with_timeout(5).is_ok());
    }
}

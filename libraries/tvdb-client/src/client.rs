//! Main TheTVDB client.

use crate::error::{Result, TvdbError};
use crate::pool::ResourcePool;
use crate::types::{TvdbConfig, Updates};
use crate::updates::{parse_server_time, parse_updates};
use bytes::Bytes;
use reqwest::{Client, Response};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

/// Client for the TheTVDB legacy XML API.
///
/// Every request first takes a slot from the shared [`ResourcePool`] and
/// races the caller's cancellation token. Responses are requested with gzip
/// compression.
///
/// # Example
///
/// ```ignore
/// use tvdb_client::{ResourcePool, TvdbClient, TvdbConfig};
///
/// let pool = ResourcePool::new(2);
/// let client = TvdbClient::new(TvdbConfig::new("API_KEY"), pool.clone())?;
/// let time = client.server_time(&cancel).await?;
/// ```
#[derive(Debug, Clone)]
pub struct TvdbClient {
    pub(crate) http: Client,
    pub(crate) base_url: String,
    pub(crate) api_key: String,
    pub(crate) language: String,
    pub(crate) pool: ResourcePool,
}

impl TvdbClient {
    /// Create a new client with the given configuration and request pool.
    pub fn new(config: TvdbConfig, pool: ResourcePool) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(TvdbError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(TvdbError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        Url::parse(&base_url).map_err(|e| TvdbError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .gzip(true)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(format!("SeriesPrescan/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TvdbError::Request)?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key,
            language: config.language,
            pool,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the provider's current server time.
    pub async fn server_time(&self, cancel: &CancellationToken) -> Result<String> {
        let url = self.updates_url(&[("type", "none")])?;
        debug!(url = %url, "Fetching server time");

        let body = self.get_bytes(url, cancel).await?;
        let time = parse_server_time(&body)?;

        info!(time = %time, "Fetched server time");
        Ok(time)
    }

    /// Fetch the series changed since `time`.
    pub async fn updates_since(&self, time: &str, cancel: &CancellationToken) -> Result<Updates> {
        let url = self.updates_url(&[("type", "all"), ("time", time)])?;
        debug!(url = %url, since = %time, "Fetching updates");

        let body = self.get_bytes(url, cancel).await?;
        let updates = parse_updates(&body)?;

        debug!(
            time = ?updates.time,
            series = updates.series.len(),
            "Fetched updates"
        );

        Ok(updates)
    }

    fn updates_url(&self, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/api/Updates.php", self.base_url))
            .map_err(|e| TvdbError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }

    /// Send a GET request holding a pool slot, returning the successful response.
    pub(crate) async fn send(&self, url: Url, cancel: &CancellationToken) -> Result<Response> {
        let request = async {
            let response = self
                .http
                .get(url.clone())
                .send()
                .await
                .map_err(TvdbError::from_request)?;

            let status = response.status();
            if status.is_success() {
                Ok(response)
            } else {
                let error_text = response.text().await.unwrap_or_default();
                Err(TvdbError::ServerError {
                    status: status.as_u16(),
                    message: error_text,
                })
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TvdbError::Cancelled),
            result = request => result,
        }
    }

    async fn get_bytes(&self, url: Url, cancel: &CancellationToken) -> Result<Bytes> {
        let _permit = self.pool.acquire(cancel).await?;
        let response = self.send(url, cancel).await?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TvdbError::Cancelled),
            body = response.bytes() => body.map_err(TvdbError::from_request),
        }
    }
}

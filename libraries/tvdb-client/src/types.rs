//! Types for TheTVDB requests and responses.

use std::time::Duration;

/// Configuration for connecting to TheTVDB.
#[derive(Debug, Clone)]
pub struct TvdbConfig {
    /// Base URL of the API host (e.g., "https://thetvdb.com")
    pub base_url: String,
    /// API key used in series record paths
    pub api_key: String,
    /// Preferred metadata language (e.g., "en")
    pub language: String,
    /// Total request timeout
    pub timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
    /// Maximum number of requests in flight across the process
    pub max_concurrent_requests: usize,
}

impl TvdbConfig {
    /// Create a config for the public API host with default limits.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://thetvdb.com".to_string(),
            api_key: api_key.into(),
            language: "en".to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_concurrent_requests: 1,
        }
    }

    /// Point the config at a different host (mirrors, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the metadata language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the total request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Parsed `Updates.php` response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Updates {
    /// Server time at which the update list was produced
    pub time: Option<String>,
    /// Series ids that changed, in document order
    pub series: Vec<String>,
}

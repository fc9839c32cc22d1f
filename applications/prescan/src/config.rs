/// Prescan configuration
use crate::error::{PrescanError, Result};
use serde::{Deserialize, Serialize};
use series_sync::SyncConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tvdb_client::TvdbConfig;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "prescan.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PrescanConfig {
    #[serde(default = "default_sync")]
    pub sync: SyncConfig,

    #[serde(default = "default_tvdb")]
    pub tvdb: TvdbSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TvdbSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

impl TvdbSettings {
    /// Client configuration for these settings
    pub fn client_config(&self) -> TvdbConfig {
        let mut config = TvdbConfig::new(self.api_key.clone())
            .with_base_url(self.base_url.clone())
            .with_language(self.language.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs));
        config.connect_timeout = Duration::from_secs(self.connect_timeout_secs);
        config.max_concurrent_requests = self.max_concurrent_requests;
        config
    }
}

impl PrescanConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `prescan.toml` in the
    /// working directory is used when present. Environment variables
    /// prefixed with `PRESCAN_` override file values, using `__` between
    /// section and key (e.g. `PRESCAN_TVDB__API_KEY`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("PRESCAN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.tvdb.api_key.trim().is_empty() {
            return Err(PrescanError::Config(
                "TheTVDB API key is required (set PRESCAN_TVDB__API_KEY)".to_string(),
            ));
        }

        if self.tvdb.max_concurrent_requests == 0 {
            return Err(PrescanError::Config(
                "tvdb.max_concurrent_requests must be at least 1".to_string(),
            ));
        }

        if self.sync.max_concurrent_updates == 0 {
            return Err(PrescanError::Config(
                "sync.max_concurrent_updates must be at least 1".to_string(),
            ));
        }

        if self.tvdb.timeout_secs == 0 {
            return Err(PrescanError::Config(
                "tvdb.timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_sync() -> SyncConfig {
    SyncConfig::new("./data/tvdb")
}

fn default_tvdb() -> TvdbSettings {
    TvdbSettings {
        base_url: default_base_url(),
        api_key: String::new(),
        language: default_language(),
        timeout_secs: default_timeout_secs(),
        connect_timeout_secs: default_connect_timeout_secs(),
        max_concurrent_requests: default_max_concurrent_requests(),
    }
}

fn default_base_url() -> String {
    "https://thetvdb.com".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_concurrent_requests() -> usize {
    1
}

impl Default for PrescanConfig {
    fn default() -> Self {
        Self {
            sync: default_sync(),
            tvdb: default_tvdb(),
        }
    }
}

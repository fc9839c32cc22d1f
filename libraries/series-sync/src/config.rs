/// Sync task configuration
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Minimum time between two checks against the provider.
pub const DEFAULT_STALENESS_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    /// Directory holding one subdirectory per series plus `time.txt`
    pub cache_root: PathBuf,

    #[serde(default = "default_staleness_window_hours")]
    pub staleness_window_hours: u64,

    #[serde(default = "default_max_concurrent_updates")]
    pub max_concurrent_updates: usize,
}

impl SyncConfig {
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
            staleness_window_hours: default_staleness_window_hours(),
            max_concurrent_updates: default_max_concurrent_updates(),
        }
    }

    pub fn staleness_window(&self) -> Duration {
        Duration::from_secs(self.staleness_window_hours.saturating_mul(60 * 60))
    }
}

fn default_staleness_window_hours() -> u64 {
    DEFAULT_STALENESS_WINDOW.as_secs() / 3600
}

fn default_max_concurrent_updates() -> usize {
    1
}

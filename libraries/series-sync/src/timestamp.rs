//! Persisted sync marker (`time.txt`).

use crate::error::Result;
use crate::types::SyncMarker;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;
use tracing::debug;

/// File name of the marker inside the cache root.
pub const MARKER_FILE_NAME: &str = "time.txt";

/// Reads and writes the sync marker of one cache root.
///
/// The file content is the marker; the file's modification time is when the
/// last sync finished. Nothing is cached in memory between calls.
#[derive(Debug, Clone)]
pub struct TimestampStore {
    path: PathBuf,
}

impl TimestampStore {
    pub fn new(cache_root: impl AsRef<Path>) -> Self {
        Self {
            path: cache_root.as_ref().join(MARKER_FILE_NAME),
        }
    }

    /// Location of the marker file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored marker; empty when the file does not exist.
    pub async fn read_marker(&self) -> Result<SyncMarker> {
        match fs::read(&self.path).await {
            Ok(bytes) => {
                let text = String::from_utf8(bytes)
                    .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))?;
                Ok(SyncMarker::new(text))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(SyncMarker::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the stored marker.
    ///
    /// The value goes to a temporary sibling first and is renamed over the
    /// marker file, so readers never see a partial write.
    pub async fn write_marker(&self, marker: &SyncMarker) -> Result<()> {
        let tmp_path = self.path.with_extension("txt.tmp");
        fs::write(&tmp_path, marker.as_str().as_bytes()).await?;

        if let Err(e) = fs::rename(&tmp_path, &self.path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        debug!(path = %self.path.display(), marker = %marker, "Sync marker written");
        Ok(())
    }

    /// Time since the marker was last written; `None` if never written.
    ///
    /// A modification time in the future reads as zero age.
    pub async fn age(&self) -> Result<Option<Duration>> {
        let Some(modified) = self.modified().await? else {
            return Ok(None);
        };

        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        Ok(Some(age))
    }

    /// Wall-clock time of the last completed sync.
    pub async fn last_synced(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.modified().await?.map(DateTime::<Utc>::from))
    }

    async fn modified(&self) -> Result<Option<SystemTime>> {
        match fs::metadata(&self.path).await {
            Ok(metadata) => Ok(Some(metadata.modified()?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::resolver::UpdateFeedResolver;
use crate::snapshot::LocalEntities;
use crate::timestamp::TimestampStore;
use crate::traits::{ContentDownloader, UpdateFeed};
use crate::types::{SyncMarker, SyncMode, SyncOutcome, SyncProgress, SyncSummary};
use crate::updater::EntityUpdater;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::fs;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Entry point of the prescan: decides between a full and an incremental
/// refresh, runs the updates and advances the persisted marker.
///
/// The marker file is written once, at the very end, and only when every
/// scheduled series was either updated or skipped. Any fatal error leaves
/// the previous marker in place so the next run retries the same window.
pub struct SyncCoordinator<F: ?Sized, D: ?Sized> {
    feed: Arc<F>,
    store: TimestampStore,
    resolver: UpdateFeedResolver<F>,
    updater: EntityUpdater<D>,
    staleness_window: Duration,
}

impl<F, D> SyncCoordinator<F, D>
where
    F: UpdateFeed + ?Sized,
    D: ContentDownloader + ?Sized,
{
    pub fn new(config: &SyncConfig, feed: Arc<F>, downloader: Arc<D>) -> Self {
        let updater = EntityUpdater::new(downloader, config.cache_root.clone())
            .with_concurrency(config.max_concurrent_updates);

        Self {
            store: TimestampStore::new(&config.cache_root),
            resolver: UpdateFeedResolver::new(Arc::clone(&feed)),
            feed,
            updater,
            staleness_window: config.staleness_window(),
        }
    }

    /// Receive a [`SyncProgress`] after every processed series.
    pub fn with_progress(mut self, progress: mpsc::Sender<SyncProgress>) -> Self {
        self.updater = self.updater.with_progress(progress);
        self
    }

    pub fn cache_root(&self) -> &Path {
        self.updater.cache_root()
    }

    /// Run one sync pass.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<SyncOutcome> {
        if let Some(age) = self.store.age().await? {
            if age < self.staleness_window {
                debug!(
                    age_secs = age.as_secs(),
                    window_secs = self.staleness_window.as_secs(),
                    "Series cache is fresh, skipping update check"
                );
                return Ok(SyncOutcome::Fresh { age });
            }
        }

        let start_time = Instant::now();
        let previous = self.store.read_marker().await?;

        fs::create_dir_all(self.cache_root()).await?;
        let local = LocalEntities::scan(self.cache_root()).await?;

        let (mode, marker, to_update) = if previous.is_blank() {
            info!(series = local.len(), "No previous sync marker, refreshing all series");
            let marker = self.fetch_server_marker(cancel).await?;
            (SyncMode::Full, marker, local.ids().to_vec())
        } else {
            info!(since = %previous, series = local.len(), "Checking for series updates");
            let (marker, ids) = self.resolver.resolve(&local, &previous, cancel).await?;
            (SyncMode::Incremental, marker, ids)
        };

        let report = self.updater.update_all(&to_update, cancel).await?;

        if cancel.is_cancelled() {
            return Err(SyncError::Cancelled);
        }
        self.store.write_marker(&marker).await?;

        let summary = SyncSummary {
            mode,
            marker,
            scheduled: report.updated.len() + report.skipped.len(),
            updated: report.updated.len(),
            skipped: report.skipped.len(),
            duration: start_time.elapsed(),
        };

        info!(
            mode = ?summary.mode,
            marker = %summary.marker,
            scheduled = summary.scheduled,
            updated = summary.updated,
            skipped = summary.skipped,
            duration_ms = summary.duration.as_millis() as u64,
            "Series sync complete"
        );

        Ok(SyncOutcome::Completed(summary))
    }

    async fn fetch_server_marker(&self, cancel: &CancellationToken) -> Result<SyncMarker> {
        if cancel.is_cancelled() {
            return Err(SyncError::Cancelled);
        }

        let marker = self.feed.server_marker(cancel).await?;
        if marker.is_blank() {
            return Err(SyncError::MissingMarker);
        }
        Ok(marker)
    }
}

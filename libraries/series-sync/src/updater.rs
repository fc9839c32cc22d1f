//! Per-series refresh with skip/abort failure policy.

use crate::error::{EntityUpdateError, RemoteError, Result, SyncError};
use crate::traits::ContentDownloader;
use crate::types::{EntityId, SyncProgress, UpdateReport};
use futures_util::stream::{self, StreamExt};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Refreshes cached series by delegating to a [`ContentDownloader`].
///
/// A timed-out or cancelled download aborts the whole pass. Any other
/// download failure is logged and skipped; the series is picked up again
/// on a later run.
pub struct EntityUpdater<D: ?Sized> {
    downloader: Arc<D>,
    cache_root: PathBuf,
    max_concurrent: usize,
    progress: Option<mpsc::Sender<SyncProgress>>,
}

impl<D: ContentDownloader + ?Sized> EntityUpdater<D> {
    pub fn new(downloader: Arc<D>, cache_root: impl Into<PathBuf>) -> Self {
        Self {
            downloader,
            cache_root: cache_root.into(),
            max_concurrent: 1,
            progress: None,
        }
    }

    /// Allow up to `limit` downloads in flight. Results are still consumed
    /// in input order and the first fatal failure stops the pass.
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrent = limit.max(1);
        self
    }

    /// Report progress after every processed series.
    ///
    /// Updates are offered with `try_send`; a full or closed channel never
    /// stalls the pass.
    pub fn with_progress(mut self, progress: mpsc::Sender<SyncProgress>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Update every id in order, absorbing skippable failures.
    ///
    /// Repeated ids are refreshed once, at their first position, so two
    /// downloads never share a series directory.
    pub async fn update_all(
        &self,
        ids: &[EntityId],
        cancel: &CancellationToken,
    ) -> Result<UpdateReport> {
        let mut seen = HashSet::new();
        let ids: Vec<&EntityId> = ids.iter().filter(|id| seen.insert(*id)).collect();

        let total = ids.len();
        let mut report = UpdateReport::default();

        let mut results = stream::iter(ids)
            .map(|id| async move { (id, self.update_one(id, cancel).await) })
            .buffered(self.max_concurrent);

        let mut processed = 0;
        while let Some((id, result)) = results.next().await {
            processed += 1;

            match result {
                Ok(()) => report.updated.push(id.clone()),
                Err(err) => {
                    let err = classify(id, err)?;
                    warn!(series_id = %id, error = %err, "Series update failed, skipping");
                    report.skipped.push(id.clone());
                }
            }

            self.report_progress(total, processed, id);
        }

        debug!(
            updated = report.updated.len(),
            skipped = report.skipped.len(),
            "Update pass finished"
        );

        Ok(report)
    }

    /// Ensure the series directory exists and download into it.
    pub async fn update_one(
        &self,
        id: &EntityId,
        cancel: &CancellationToken,
    ) -> std::result::Result<(), EntityUpdateError> {
        if cancel.is_cancelled() {
            return Err(RemoteError::Cancelled.into());
        }

        info!(series_id = %id, "Updating series");

        let series_dir = self.cache_root.join(id.as_str());
        fs::create_dir_all(&series_dir).await?;

        self.downloader.download(id, &series_dir, cancel).await?;
        Ok(())
    }

    fn report_progress(&self, total: usize, processed: usize, current: &EntityId) {
        if let Some(tx) = &self.progress {
            let _ = tx.try_send(SyncProgress::new(total, processed, Some(current.clone())));
        }
    }
}

/// Turn a fatal failure into the error that ends the run; hand skippable
/// failures back to the caller.
fn classify(
    id: &EntityId,
    err: EntityUpdateError,
) -> std::result::Result<RemoteError, SyncError> {
    match err {
        EntityUpdateError::Io(e) => Err(SyncError::Io(e)),
        EntityUpdateError::Remote(RemoteError::TimedOut(message)) => Err(SyncError::Timeout {
            id: id.clone(),
            message,
        }),
        EntityUpdateError::Remote(RemoteError::Cancelled) => Err(SyncError::Cancelled),
        EntityUpdateError::Remote(other) => Ok(other),
    }
}

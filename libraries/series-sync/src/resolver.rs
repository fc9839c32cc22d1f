//! Translation of the remote updates feed into a local update set.

use crate::error::{Result, SyncError};
use crate::snapshot::LocalEntities;
use crate::traits::UpdateFeed;
use crate::types::{EntityId, SyncMarker};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Asks the feed what changed and keeps only the series cached locally.
pub struct UpdateFeedResolver<F: ?Sized> {
    feed: Arc<F>,
}

impl<F: UpdateFeed + ?Sized> UpdateFeedResolver<F> {
    pub fn new(feed: Arc<F>) -> Self {
        Self { feed }
    }

    /// Query the feed once and return the new marker with the local ids to refresh.
    ///
    /// Ids are matched case-insensitively after trimming and returned in the
    /// local directory's spelling, in feed order. Blank ids and ids with no
    /// local directory are dropped; duplicates pass through. An empty change
    /// list still yields a marker, but a blank marker is an error.
    pub async fn resolve(
        &self,
        local: &LocalEntities,
        since: &SyncMarker,
        cancel: &CancellationToken,
    ) -> Result<(SyncMarker, Vec<EntityId>)> {
        if cancel.is_cancelled() {
            return Err(SyncError::Cancelled);
        }

        let changes = self.feed.changes_since(since, cancel).await?;

        if changes.marker.is_blank() {
            return Err(SyncError::MissingMarker);
        }

        let reported = changes.changed.len();
        let to_update: Vec<EntityId> = changes
            .changed
            .iter()
            .filter(|id| !id.is_blank())
            .filter_map(|id| local.lookup(id.as_str().trim()).cloned())
            .collect();

        debug!(
            since = %since,
            reported,
            relevant = to_update.len(),
            "Resolved updates feed"
        );
        info!(
            marker = %changes.marker,
            count = to_update.len(),
            "Series changed since last sync"
        );

        Ok((changes.marker, to_update))
    }
}

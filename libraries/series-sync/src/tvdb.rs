//! Binds the sync traits to the TheTVDB client.

use crate::error::RemoteError;
use crate::traits::{ContentDownloader, UpdateFeed};
use crate::types::{ChangeSet, EntityId, SyncMarker};
use async_trait::async_trait;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tvdb_client::{TvdbClient, TvdbError};

impl From<TvdbError> for RemoteError {
    fn from(err: TvdbError) -> Self {
        match err {
            TvdbError::TimedOut(message) => RemoteError::TimedOut(message),
            TvdbError::Cancelled => RemoteError::Cancelled,
            TvdbError::Parse(message) => RemoteError::InvalidResponse(message),
            other => RemoteError::Transport(other.to_string()),
        }
    }
}

#[async_trait]
impl UpdateFeed for TvdbClient {
    async fn server_marker(
        &self,
        cancel: &CancellationToken,
    ) -> std::result::Result<SyncMarker, RemoteError> {
        Ok(SyncMarker::new(self.server_time(cancel).await?))
    }

    async fn changes_since(
        &self,
        since: &SyncMarker,
        cancel: &CancellationToken,
    ) -> std::result::Result<ChangeSet, RemoteError> {
        let updates = self.updates_since(since.as_str(), cancel).await?;

        Ok(ChangeSet {
            marker: SyncMarker::new(updates.time.unwrap_or_default()),
            changed: updates.series.into_iter().map(EntityId::new).collect(),
        })
    }
}

#[async_trait]
impl ContentDownloader for TvdbClient {
    async fn download(
        &self,
        id: &EntityId,
        dest_dir: &Path,
        cancel: &CancellationToken,
    ) -> std::result::Result<(), RemoteError> {
        self.download_series(id.as_str(), dest_dir, cancel)
            .await
            .map_err(RemoteError::from)
    }
}

/// Seams between the sync task and the metadata provider
use crate::error::RemoteError;
use crate::types::{ChangeSet, EntityId, SyncMarker};
use async_trait::async_trait;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Remote source of update markers and change lists.
#[async_trait]
pub trait UpdateFeed: Send + Sync {
    /// Current server marker, used as the starting point of a first sync.
    async fn server_marker(
        &self,
        cancel: &CancellationToken,
    ) -> std::result::Result<SyncMarker, RemoteError>;

    /// Everything that changed since `since`, plus the marker to resume from.
    ///
    /// Implementations report a missing marker as an empty `SyncMarker`
    /// rather than inventing one.
    async fn changes_since(
        &self,
        since: &SyncMarker,
        cancel: &CancellationToken,
    ) -> std::result::Result<ChangeSet, RemoteError>;
}

/// Fetches and unpacks one entity's metadata into its cache directory.
#[async_trait]
pub trait ContentDownloader: Send + Sync {
    /// Download `id` into `dest_dir`, which already exists.
    async fn download(
        &self,
        id: &EntityId,
        dest_dir: &Path,
        cancel: &CancellationToken,
    ) -> std::result::Result<(), RemoteError>;
}

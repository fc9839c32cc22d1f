//! Series Sync
//!
//! Keeps a local series metadata cache in step with a remote provider.
//!
//! The cache root holds one directory per tracked series and a `time.txt`
//! marker. A run does nothing while the marker is younger than the
//! staleness window. Otherwise it refreshes every local series (first run)
//! or only those reported by the provider's updates feed, then advances
//! the marker.
//!
//! # Example
//!
//! ```ignore
//! use series_sync::{SyncConfig, SyncCoordinator};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use tvdb_client::{ResourcePool, TvdbClient, TvdbConfig};
//!
//! let client = Arc::new(TvdbClient::new(TvdbConfig::new("KEY"), ResourcePool::new(1))?);
//! let coordinator = SyncCoordinator::new(
//!     &SyncConfig::new("/var/cache/series"),
//!     Arc::clone(&client),
//!     client,
//! );
//! let outcome = coordinator.run(&CancellationToken::new()).await?;
//! ```

mod config;
mod coordinator;
mod error;
mod resolver;
mod snapshot;
mod timestamp;
mod traits;
mod tvdb;
mod types;
mod updater;

// Public exports
pub use config::{SyncConfig, DEFAULT_STALENESS_WINDOW};
pub use coordinator::SyncCoordinator;
pub use error::{EntityUpdateError, RemoteError, Result, SyncError};
pub use resolver::UpdateFeedResolver;
pub use snapshot::LocalEntities;
pub use timestamp::{TimestampStore, MARKER_FILE_NAME};
pub use traits::{ContentDownloader, UpdateFeed};
pub use types::{
    ChangeSet, EntityId, SyncMarker, SyncMode, SyncOutcome, SyncProgress, SyncSummary,
    UpdateReport,
};
pub use updater::EntityUpdater;

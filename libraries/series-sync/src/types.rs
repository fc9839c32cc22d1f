use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Opaque point in the provider's update history.
///
/// The value is never interpreted beyond being passed back to the updates
/// feed. An empty marker means "never synced".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncMarker(String);

impl SyncMarker {
    /// Create a new marker
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the marker holds nothing usable (empty or whitespace)
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for SyncMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a tracked series; also the name of its cache directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Create a new entity ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for empty or whitespace-only ids
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Raw answer of the remote updates feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Marker to persist once the changes are applied
    pub marker: SyncMarker,
    /// Changed ids as reported by the provider, unfiltered
    pub changed: Vec<EntityId>,
}

/// How the update set of a run was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    Full,        // No prior marker, refresh every local series
    Incremental, // Only series reported by the updates feed
}

/// Summary of a completed sync run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    pub mode: SyncMode,
    pub marker: SyncMarker,
    pub scheduled: usize,
    pub updated: usize,
    pub skipped: usize,
    pub duration: Duration,
}

/// Result of `SyncCoordinator::run`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The last sync is younger than the staleness window; nothing was done
    Fresh { age: Duration },
    /// A sync pass ran to completion and the marker was advanced
    Completed(SyncSummary),
}

/// Per-entity tallies from `EntityUpdater::update_all`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub updated: Vec<EntityId>,
    pub skipped: Vec<EntityId>,
}

/// Progress information for an ongoing update pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncProgress {
    pub total: usize,
    pub processed: usize,
    pub current: Option<EntityId>,
    pub percentage: f32,
}

impl SyncProgress {
    pub(crate) fn new(total: usize, processed: usize, current: Option<EntityId>) -> Self {
        let percentage = if total > 0 {
            (processed as f32 / total as f32) * 100.0
        } else {
            0.0
        };

        Self {
            total,
            processed,
            current,
            percentage,
        }
    }
}

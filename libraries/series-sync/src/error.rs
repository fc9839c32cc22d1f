use crate::types::EntityId;
use thiserror::Error;

/// Failure reported by a remote collaborator.
///
/// The variants carry just enough classification for the sync loop to tell
/// a timed-out transport apart from every other failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Request timed out: {0}")]
    TimedOut(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl RemoteError {
    pub fn is_timed_out(&self) -> bool {
        matches!(self, RemoteError::TimedOut(_))
    }
}

/// Failure of a single entity update, before it is classified.
#[derive(Error, Debug)]
pub enum EntityUpdateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Errors that abort a sync run. The marker is never advanced after one.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Remote query failed: {0}")]
    Remote(RemoteError),

    #[error("Update of {id} timed out: {message}")]
    Timeout { id: EntityId, message: String },

    #[error("Sync was cancelled")]
    Cancelled,

    #[error("Remote response did not contain an update marker")]
    MissingMarker,
}

impl From<RemoteError> for SyncError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Cancelled => SyncError::Cancelled,
            other => SyncError::Remote(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

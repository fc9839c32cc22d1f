//! Shared request pool bounding in-flight TheTVDB requests.

use crate::error::{Result, TvdbError};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

/// Process-wide limit on concurrent requests to the provider.
///
/// Cloning shares the same underlying semaphore, so every client built from
/// the same pool competes for the same permits. The pool is created by the
/// application and passed into each client.
#[derive(Debug, Clone)]
pub struct ResourcePool {
    semaphore: Arc<Semaphore>,
}

/// A held slot in the pool. Released on drop.
#[derive(Debug)]
pub struct PoolPermit {
    _permit: OwnedSemaphorePermit,
}

impl ResourcePool {
    /// Create a pool allowing `permits` concurrent requests (at least one).
    pub fn new(permits: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(permits.max(1))),
        }
    }

    /// Number of permits currently free.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Wait for a free slot, giving up if `cancel` fires first.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<PoolPermit> {
        let semaphore = Arc::clone(&self.semaphore);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TvdbError::Cancelled),
            permit = semaphore.acquire_owned() => {
                // Semaphore closed
                let permit = permit.map_err(|_| TvdbError::Cancelled)?;
                Ok(PoolPermit { _permit: permit })
            }
        }
    }
}

impl Default for ResourcePool {
    fn default() -> Self {
        Self::new(1)
    }
}

//! TheTVDB Client
//!
//! HTTP client for the legacy TheTVDB XML API, used to keep a local series
//! metadata cache in step with the remote provider.
//!
//! # Features
//!
//! - **Server time**: Fetch the provider's clock as an opaque update marker
//! - **Updates feed**: List series changed since a previous marker
//! - **Download**: Fetch a series record into a cache directory
//! - **Resource pool**: Bound in-flight requests across every client clone
//!
//! # Example
//!
//! ```ignore
//! use tokio_util::sync::CancellationToken;
//! use tvdb_client::{ResourcePool, TvdbClient, TvdbConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TvdbConfig::new("API_KEY");
//!     let pool = ResourcePool::new(config.max_concurrent_requests);
//!     let client = TvdbClient::new(config, pool)?;
//!     let cancel = CancellationToken::new();
//!
//!     let time = client.server_time(&cancel).await?;
//!     let updates = client.updates_since(&time, &cancel).await?;
//!     println!("{} series changed since {}", updates.series.len(), time);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod download;
mod error;
mod pool;
mod types;
mod updates;

pub use client::TvdbClient;
pub use error::{Result, TvdbError};
pub use pool::{PoolPermit, ResourcePool};
pub use types::{TvdbConfig, Updates};
pub use updates::{parse_server_time, parse_updates};

//! Fakes for the sync collaborator traits.

#![allow(dead_code)]

use async_trait::async_trait;
use series_sync::{
    ChangeSet, ContentDownloader, EntityId, RemoteError, SyncConfig, SyncMarker, UpdateFeed,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use std::time::{Duration, SystemTime};
use tokio_util::sync::CancellationToken;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Updates feed returning canned answers and counting every call.
pub struct FakeFeed {
    pub server_marker: Result<SyncMarker, RemoteError>,
    pub changes: Result<ChangeSet, RemoteError>,
    pub server_calls: AtomicUsize,
    pub change_calls: AtomicUsize,
    pub queried_since: Mutex<Vec<SyncMarker>>,
}

impl FakeFeed {
    pub fn new(server_marker: &str, changes_marker: &str, changed: &[&str]) -> Self {
        Self {
            server_marker: Ok(SyncMarker::new(server_marker)),
            changes: Ok(ChangeSet {
                marker: SyncMarker::new(changes_marker),
                changed: changed.iter().map(|id| EntityId::new(*id)).collect(),
            }),
            server_calls: AtomicUsize::new(0),
            change_calls: AtomicUsize::new(0),
            queried_since: Mutex::new(Vec::new()),
        }
    }

    pub fn network_calls(&self) -> usize {
        self.server_calls.load(Ordering::SeqCst) + self.change_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpdateFeed for FakeFeed {
    async fn server_marker(&self, _cancel: &CancellationToken) -> Result<SyncMarker, RemoteError> {
        self.server_calls.fetch_add(1, Ordering::SeqCst);
        self.server_marker.clone()
    }

    async fn changes_since(
        &self,
        since: &SyncMarker,
        _cancel: &CancellationToken,
    ) -> Result<ChangeSet, RemoteError> {
        self.change_calls.fetch_add(1, Ordering::SeqCst);
        self.queried_since.lock().unwrap().push(since.clone());
        self.changes.clone()
    }
}

/// Downloader that writes a marker document and records the order of calls.
///
/// Ids listed in `failures` fail with the given error instead. Entries in
/// `delays` override `delay` for a single id. The highest number of
/// simultaneous downloads into one series directory is kept in
/// `max_writers_per_series`.
#[derive(Default)]
pub struct FakeDownloader {
    pub failures: HashMap<String, RemoteError>,
    pub attempted: Mutex<Vec<String>>,
    pub cancel_on: Option<(String, CancellationToken)>,
    pub delay: Option<Duration>,
    pub delays: HashMap<String, Duration>,
    pub in_flight: Mutex<HashMap<String, usize>>,
    pub max_writers_per_series: AtomicUsize,
}

impl FakeDownloader {
    pub fn failing(failures: &[(&str, RemoteError)]) -> Self {
        Self {
            failures: failures
                .iter()
                .map(|(id, err)| (id.to_string(), err.clone()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn with_delays(mut self, delays: &[(&str, u64)]) -> Self {
        self.delays = delays
            .iter()
            .map(|(id, ms)| (id.to_string(), Duration::from_millis(*ms)))
            .collect();
        self
    }

    pub fn attempted(&self) -> Vec<String> {
        self.attempted.lock().unwrap().clone()
    }

    pub fn max_writers_per_series(&self) -> usize {
        self.max_writers_per_series.load(Ordering::SeqCst)
    }

    fn enter(&self, id: &str) {
        let mut in_flight = self.in_flight.lock().unwrap();
        let writers = in_flight.entry(id.to_string()).or_insert(0);
        *writers += 1;
        self.max_writers_per_series.fetch_max(*writers, Ordering::SeqCst);
    }

    fn leave(&self, id: &str) {
        if let Some(writers) = self.in_flight.lock().unwrap().get_mut(id) {
            *writers -= 1;
        }
    }
}

#[async_trait]
impl ContentDownloader for FakeDownloader {
    async fn download(
        &self,
        id: &EntityId,
        dest_dir: &Path,
        _cancel: &CancellationToken,
    ) -> Result<(), RemoteError> {
        self.attempted.lock().unwrap().push(id.as_str().to_string());

        self.enter(id.as_str());
        let delay = self.delays.get(id.as_str()).copied().or(self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.leave(id.as_str());

        if let Some((cancel_id, token)) = &self.cancel_on {
            if cancel_id == id.as_str() {
                token.cancel();
            }
        }

        if let Some(err) = self.failures.get(id.as_str()) {
            return Err(err.clone());
        }

        assert!(dest_dir.is_dir(), "series directory must exist before download");
        tokio::fs::write(dest_dir.join("en.xml"), format!("<Data>{}</Data>", id))
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))
    }
}

/// Cache root with the given series directories and optional marker.
pub struct CacheFixture {
    pub dir: tempfile::TempDir,
}

impl CacheFixture {
    pub fn new(series: &[&str], marker: Option<&str>) -> Self {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        for id in series {
            std::fs::create_dir(dir.path().join(id)).unwrap();
        }
        let fixture = Self { dir };
        if let Some(marker) = marker {
            std::fs::write(fixture.marker_path(), marker).unwrap();
        }
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn marker_path(&self) -> PathBuf {
        self.dir.path().join(series_sync::MARKER_FILE_NAME)
    }

    pub fn marker(&self) -> Option<String> {
        std::fs::read_to_string(self.marker_path()).ok()
    }

    /// Push the marker's modification time into the past.
    pub fn age_marker(&self, by: Duration) {
        std::fs::File::options()
            .write(true)
            .open(self.marker_path())
            .unwrap()
            .set_modified(SystemTime::now() - by)
            .unwrap();
    }

    pub fn config(&self) -> SyncConfig {
        SyncConfig::new(self.root())
    }
}

//! Snapshot of the series already present in the cache root.

use crate::error::Result;
use crate::types::EntityId;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

/// Series known locally at the start of a run, one per cache subdirectory.
///
/// Lookups are case-insensitive and resolve to the directory's own spelling.
#[derive(Debug, Clone, Default)]
pub struct LocalEntities {
    ids: Vec<EntityId>,
    by_folded: HashMap<String, usize>,
}

impl LocalEntities {
    /// Enumerate the subdirectories of `cache_root`.
    ///
    /// Symlinks to directories count. Plain files (such as the marker) are
    /// ignored, as are directory names that are not valid UTF-8. Ids are returned sorted for a stable full
    /// refresh order.
    pub async fn scan(cache_root: &Path) -> Result<Self> {
        let mut ids = Vec::new();
        let mut entries = fs::read_dir(cache_root).await?;

        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            let is_dir = if file_type.is_symlink() {
                fs::metadata(entry.path())
                    .await
                    .map(|m| m.is_dir())
                    .unwrap_or(false)
            } else {
                file_type.is_dir()
            };
            if !is_dir {
                continue;
            }

            match entry.file_name().into_string() {
                Ok(name) => ids.push(EntityId::new(name)),
                Err(name) => {
                    warn!(name = ?name, "Skipping cache directory with non UTF-8 name");
                }
            }
        }

        ids.sort();
        debug!(root = %cache_root.display(), count = ids.len(), "Scanned local series");

        Ok(Self::from_ids(ids))
    }

    /// Build a snapshot from known ids, keeping their order.
    pub fn from_ids(ids: impl IntoIterator<Item = EntityId>) -> Self {
        let ids: Vec<EntityId> = ids.into_iter().collect();
        let mut by_folded = HashMap::with_capacity(ids.len());
        for (index, id) in ids.iter().enumerate() {
            by_folded.entry(fold(id.as_str())).or_insert(index);
        }

        Self { ids, by_folded }
    }

    /// Local spelling of `id`, compared case-insensitively.
    pub fn lookup(&self, id: &str) -> Option<&EntityId> {
        self.by_folded.get(&fold(id)).map(|&index| &self.ids[index])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lookup(id).is_some()
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

fn fold(id: &str) -> String {
    id.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scan_lists_only_directories() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["80348", "121361", "75760"] {
            std::fs::create_dir(dir.path().join(name)).unwrap();
        }
        std::fs::write(dir.path().join("time.txt"), "100").unwrap();

        let local = LocalEntities::scan(dir.path()).await.unwrap();
        let names: Vec<&str> = local.ids().iter().map(EntityId::as_str).collect();

        assert_eq!(names, vec!["121361", "75760", "80348"]);
    }

    #[tokio::test]
    async fn test_scan_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = LocalEntities::scan(&dir.path().join("missing")).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_case_insensitive_lookup_returns_local_spelling() {
        let local = LocalEntities::from_ids(vec![EntityId::new("Abc"), EntityId::new("80348")]);

        assert_eq!(local.lookup("ABC").map(EntityId::as_str), Some("Abc"));
        assert_eq!(local.lookup("abc").map(EntityId::as_str), Some("Abc"));
        assert!(local.contains("80348"));
        assert!(!local.contains("8034"));
        assert_eq!(local.len(), 2);
    }
}

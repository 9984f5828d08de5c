//! # Watermark Store
//!
//! Namespaced key-value store remembering, per search term, the newest post already handled.
//! Buckets are fixed at construction. When a backing file is configured, every successful
//! `set` rewrites the whole store as JSON through a temporary file and a rename.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::error::StoreError;
use crate::domain::types::PostId;

/// Bucket holding the per-term search watermarks.
pub const SEARCH_BUCKET: &str = "search";

type Buckets = BTreeMap<String, BTreeMap<String, PostId>>;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
struct Snapshot {
    buckets: Buckets,
}

#[derive(Debug)]
pub struct WatermarkStore {
    path: Option<PathBuf>,
    declared: BTreeSet<String>,
    data: Snapshot,
}

impl WatermarkStore {
    /// Opens a store, loading `path` when it exists and is non-empty.
    pub fn open<I, S>(buckets: I, path: Option<PathBuf>) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let data = match &path {
            Some(path) => Self::load(path)?,
            None => Snapshot::default(),
        };
        let mut store = Self {
            path,
            declared: BTreeSet::new(),
            data,
        };
        for bucket in buckets {
            let bucket = bucket.into();
            store.data.buckets.entry(bucket.clone()).or_default();
            store.declared.insert(bucket);
        }
        Ok(store)
    }

    /// A store that never touches the disk.
    pub fn in_memory<I, S>(buckets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let declared: BTreeSet<String> = buckets.into_iter().map(Into::into).collect();
        let buckets = declared
            .iter()
            .map(|b| (b.clone(), BTreeMap::new()))
            .collect();
        Self {
            path: None,
            declared,
            data: Snapshot { buckets },
        }
    }

    fn load(path: &Path) -> Result<Snapshot, StoreError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Snapshot::default()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(Snapshot::default());
        }
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Last value recorded under `bucket`/`key`; `None` for unknown buckets too.
    pub fn get(&self, bucket: &str, key: &str) -> Option<&PostId> {
        self.data.buckets.get(bucket)?.get(key)
    }

    pub fn set(&mut self, bucket: &str, key: &str, value: PostId) -> Result<(), StoreError> {
        if !self.declared.contains(bucket) {
            return Err(StoreError::UnknownBucket(bucket.to_string()));
        }
        self.data
            .buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), value);
        self.persist()
    }

    fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };

        let content = serde_json::to_string_pretty(&self.data)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, content).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;
        tracing::debug!("Persisted watermark store to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_at(dir: &TempDir) -> PathBuf {
        dir.path().join("store.json")
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = store_at(&dir);

        let mut store = WatermarkStore::open([SEARCH_BUCKET], Some(path.clone())).unwrap();
        store.set(SEARCH_BUCKET, "widget", PostId::from(102)).unwrap();
        store.set(SEARCH_BUCKET, "gadget", PostId::from("abc")).unwrap();
        store.set(SEARCH_BUCKET, "widget", PostId::from(150)).unwrap();

        let reopened = WatermarkStore::open([SEARCH_BUCKET], Some(path)).unwrap();
        assert_eq!(reopened.get(SEARCH_BUCKET, "widget"), Some(&PostId::from(150)));
        assert_eq!(reopened.get(SEARCH_BUCKET, "gadget"), Some(&PostId::from("abc")));
    }

    #[test]
    fn test_unset_key_is_absent() {
        let store = WatermarkStore::in_memory([SEARCH_BUCKET, "mentions"]);
        assert_eq!(store.get(SEARCH_BUCKET, "widget"), None);
        assert_eq!(store.get("mentions", "widget"), None);
        assert_eq!(store.get("undeclared", "widget"), None);
    }

    #[test]
    fn test_set_on_undeclared_bucket_fails() {
        let dir = TempDir::new().unwrap();
        let path = store_at(&dir);
        fs::write(&path, r#"{"legacy": {"a": 1}, "search": {}}"#).unwrap();

        let mut store = WatermarkStore::open([SEARCH_BUCKET], Some(path.clone())).unwrap();
        store.set(SEARCH_BUCKET, "widget", PostId::from(1)).unwrap();

        for bucket in ["mentions", "legacy", ""] {
            let err = store.set(bucket, "widget", PostId::from(2)).unwrap_err();
            assert!(matches!(err, StoreError::UnknownBucket(b) if b == bucket));
        }
        // Loaded-but-undeclared buckets stay readable and are preserved on rewrite.
        assert_eq!(store.get("legacy", "a"), Some(&PostId::from(1)));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("legacy"));
    }

    #[test]
    fn test_missing_and_empty_files_start_empty() {
        let dir = TempDir::new().unwrap();
        let path = store_at(&dir);

        let store = WatermarkStore::open([SEARCH_BUCKET], Some(path.clone())).unwrap();
        assert_eq!(store.get(SEARCH_BUCKET, "widget"), None);
        assert!(!path.exists());

        fs::write(&path, "").unwrap();
        let store = WatermarkStore::open([SEARCH_BUCKET], Some(path)).unwrap();
        assert_eq!(store.get(SEARCH_BUCKET, "widget"), None);
    }

    #[test]
    fn test_declared_bucket_added_to_loaded_file() {
        let dir = TempDir::new().unwrap();
        let path = store_at(&dir);
        fs::write(&path, r#"{"other": {}}"#).unwrap();

        let mut store = WatermarkStore::open([SEARCH_BUCKET], Some(path)).unwrap();
        assert!(store.set(SEARCH_BUCKET, "widget", PostId::from(7)).is_ok());
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = store_at(&dir);
        fs::write(&path, "not json at all").unwrap();

        let err = WatermarkStore::open([SEARCH_BUCKET], Some(path)).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn test_creates_parent_directory_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut store = WatermarkStore::open([SEARCH_BUCKET], Some(path.clone())).unwrap();
        store.set(SEARCH_BUCKET, "widget", PostId::from(9)).unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("nested").join("store.json.tmp").exists());
        let content = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["search"]["widget"], 9);
    }

    #[test]
    fn test_in_memory_store_writes_nothing() {
        let mut store = WatermarkStore::in_memory([SEARCH_BUCKET]);
        store.set(SEARCH_BUCKET, "widget", PostId::from(1)).unwrap();
        assert_eq!(store.path(), None);
        assert_eq!(store.get(SEARCH_BUCKET, "widget"), Some(&PostId::from(1)));
    }
}

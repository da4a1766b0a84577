//! File-backed store
//!
//! The record lives in `<dir>/<key>.json`. Saves write a temporary sibling
//! and rename it over the record, so a crash leaves either the old or the
//! new mapping.

use super::{decode, encode, PersistenceStore, DEFAULT_STORAGE_KEY};
use crate::error::StoreError;
use async_trait::async_trait;
use capmap_catalog::ImportMapping;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Store backed by a JSON file in a client-local directory
#[derive(Debug, Clone)]
pub struct FileStore {
    key: String,
    path: PathBuf,
}

impl FileStore {
    /// Store under `dir` using [`DEFAULT_STORAGE_KEY`]
    #[inline]
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_key(dir, DEFAULT_STORAGE_KEY)
    }

    /// Store under `dir` using `key`
    #[must_use]
    pub fn with_key(dir: impl AsRef<Path>, key: impl Into<String>) -> Self {
        let key = key.into();
        let path = dir.as_ref().join(format!("{key}.json"));
        Self { key, path }
    }

    /// Path of the record file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

#[async_trait]
impl PersistenceStore for FileStore {
    async fn load(&self) -> Result<Option<ImportMapping>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => decode(&self.key, &text).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io_error(&self.path, e)),
        }
    }

    async fn save(&self, mapping: &ImportMapping) -> Result<(), StoreError> {
        let text = encode(mapping)?;

        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| StoreError::io_error(dir, e))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, text)
            .await
            .map_err(|e| StoreError::io_error(&temp, e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| StoreError::io_error(&self.path, e))?;

        tracing::debug!(path = %self.path.display(), entries = mapping.len(), "saved import mapping");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io_error(&self.path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capmap_catalog::MaturityLevel;

    fn mapping() -> ImportMapping {
        let mut m = ImportMapping::new();
        m.insert("Log analysis", MaturityLevel::new(3).unwrap());
        m
    }

    #[test]
    fn record_path() {
        let store = FileStore::new("/var/lib/capmap");
        assert_eq!(store.path(), Path::new("/var/lib/capmap/capabilityLevels.json"));
    }

    #[tokio::test]
    async fn missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("state"));

        store.save(&mapping()).await.unwrap();
        assert!(store.path().exists());
        assert!(!store.temp_path().exists());
        assert_eq!(store.load().await.unwrap(), Some(mapping()));
    }

    #[tokio::test]
    async fn save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.save(&mapping()).await.unwrap();
        store.save(&ImportMapping::new()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(ImportMapping::new()));
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.clear().await.unwrap();
        store.save(&mapping()).await.unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::with_key(dir.path(), "levels");
        std::fs::write(store.path(), "[1,2,3]").unwrap();
        assert!(matches!(store.load().await, Err(StoreError::Corrupt { .. })));
    }
}

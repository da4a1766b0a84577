//! In-process store
//!
//! Holds the encoded text rather than the mapping so the stored form is the
//! same as on disk.

use super::{decode, encode, PersistenceStore, DEFAULT_STORAGE_KEY};
use crate::error::StoreError;
use async_trait::async_trait;
use capmap_catalog::ImportMapping;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Store backed by a shared in-memory table
///
/// Clones share the same table, so a store handed to a session and one kept
/// by the caller observe the same record.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    key: String,
    table: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create empty store using [`DEFAULT_STORAGE_KEY`]
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_key(DEFAULT_STORAGE_KEY)
    }

    /// Create empty store using `key`
    #[must_use]
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            table: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Raw stored text, if any
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.table.lock().get(&self.key).cloned()
    }

    /// Replace the raw stored text
    ///
    /// Used to simulate a record written by another build.
    pub fn set_raw(&self, text: impl Into<String>) {
        self.table.lock().insert(self.key.clone(), text.into());
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PersistenceStore for MemoryStore {
    async fn load(&self) -> Result<Option<ImportMapping>, StoreError> {
        self.raw().map(|text| decode(&self.key, &text)).transpose()
    }

    async fn save(&self, mapping: &ImportMapping) -> Result<(), StoreError> {
        let text = encode(mapping)?;
        self.table.lock().insert(self.key.clone(), text);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.table.lock().remove(&self.key);
        Ok(())
    }
}

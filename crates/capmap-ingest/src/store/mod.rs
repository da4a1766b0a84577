//! Durable storage of the last accepted import
//!
//! One record, under one fixed key, holding the JSON text of the most
//! recently imported [`ImportMapping`]. Absent until the first successful
//! import and again after a reset.

use crate::error::StoreError;
use async_trait::async_trait;
use capmap_catalog::ImportMapping;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key the browser build used for the record
pub const DEFAULT_STORAGE_KEY: &str = "capabilityLevels";

/// Client-local key-value persistence for the last import
#[async_trait]
pub trait PersistenceStore: Send + Sync + std::fmt::Debug {
    /// Last saved mapping, `None` if never saved or cleared
    async fn load(&self) -> Result<Option<ImportMapping>, StoreError>;

    /// Overwrite the saved mapping
    async fn save(&self, mapping: &ImportMapping) -> Result<(), StoreError>;

    /// Remove the saved mapping; later loads return `None`
    async fn clear(&self) -> Result<(), StoreError>;
}

pub(crate) fn encode(mapping: &ImportMapping) -> Result<String, StoreError> {
    serde_json::to_string(mapping).map_err(StoreError::Encode)
}

pub(crate) fn decode(key: &str, text: &str) -> Result<ImportMapping, StoreError> {
    serde_json::from_str(text).map_err(|source| StoreError::Corrupt {
        key: key.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use capmap_catalog::MaturityLevel;

    #[test]
    fn encode_is_flat_json_object() {
        let mut mapping = ImportMapping::new();
        mapping.insert("IaC", MaturityLevel::MIN);
        assert_eq!(encode(&mapping).unwrap(), r#"{"IaC":1}"#);
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode("capabilityLevels", "not json").unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref key, .. } if key == "capabilityLevels"));
    }

    #[test]
    fn decode_rejects_out_of_range_level() {
        assert!(decode("k", r#"{"IaC":9}"#).is_err());
    }
}

//! Configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! storage_key = "capabilityLevels"
//! store_dir = "/home/me/.capmap"
//! completion_delay_ms = 500
//!
//! [progress]
//! step = 10
//! tick_ms = 100
//! ceiling = 90
//!
//! [[catalog.categories]]
//! label = "Process"
//! items = ["CI/CD", "IaC"]
//! ```

use crate::error::ConfigError;
use capmap_catalog::CatalogDefinition;
use capmap_ingest::{FileStore, MemoryStore, PersistenceStore, DEFAULT_STORAGE_KEY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Synthetic upload progress schedule
///
/// Small local reads finish before real byte progress could be observed, so
/// progress advances on a timer until the content has been parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressSchedule {
    /// Percent added per tick
    pub step: u8,
    /// Milliseconds between ticks
    pub tick_ms: u64,
    /// Highest percent reported before completion
    pub ceiling: u8,
}

impl Default for ProgressSchedule {
    fn default() -> Self {
        Self {
            step: 10,
            tick_ms: 100,
            ceiling: 90,
        }
    }
}

/// Capability map configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapmapConfig {
    /// Key of the persisted record
    pub storage_key: String,
    /// Directory of the file store; in-memory store when unset
    pub store_dir: Option<PathBuf>,
    /// Largest accepted upload in bytes
    pub max_file_size: usize,
    /// Synthetic progress schedule
    pub progress: ProgressSchedule,
    /// How long a finished import stays in `Done` before returning to `Idle`
    pub completion_delay_ms: u64,
    /// Custom catalog layout; the DevOps catalog when unset
    pub catalog: Option<CatalogDefinition>,
}

impl Default for CapmapConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            store_dir: None,
            max_file_size: 10 * 1024 * 1024, // 10MB
            progress: ProgressSchedule::default(),
            completion_delay_ms: 500,
            catalog: None,
        }
    }
}

impl CapmapConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// - `ConfigError::Parse` on malformed TOML
    /// - any error from [`CapmapConfig::validate`]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file
    ///
    /// # Errors
    /// `ConfigError::Io` if the file cannot be read, else as [`CapmapConfig::from_toml_str`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// With file store directory
    #[inline]
    #[must_use]
    pub fn with_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = Some(dir.into());
        self
    }

    /// With storage key
    #[inline]
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// With progress schedule
    #[inline]
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressSchedule) -> Self {
        self.progress = progress;
        self
    }

    /// With completion delay in milliseconds
    #[inline]
    #[must_use]
    pub fn with_completion_delay_ms(mut self, ms: u64) -> Self {
        self.completion_delay_ms = ms;
        self
    }

    /// With maximum upload size in bytes
    #[inline]
    #[must_use]
    pub fn with_max_file_size(mut self, bytes: usize) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// With custom catalog layout
    #[inline]
    #[must_use]
    pub fn with_catalog(mut self, catalog: CatalogDefinition) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Check invariants the session relies on
    ///
    /// # Errors
    /// `ConfigError::Invalid` or `ConfigError::Catalog` describing the first problem
    pub fn validate(&self) -> Result<(), ConfigError> {
        let key_ok = !self.storage_key.is_empty()
            && self
                .storage_key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !key_ok {
            return Err(ConfigError::Invalid(format!(
                "storage_key '{}' must be non-empty and use only [A-Za-z0-9_.-]",
                self.storage_key
            )));
        }
        if self.progress.step == 0 {
            return Err(ConfigError::Invalid("progress.step must be at least 1".into()));
        }
        if self.progress.ceiling >= 100 {
            return Err(ConfigError::Invalid("progress.ceiling must be below 100".into()));
        }
        if self.max_file_size == 0 {
            return Err(ConfigError::Invalid("max_file_size must be positive".into()));
        }
        if let Some(catalog) = &self.catalog {
            catalog.validate()?;
        }
        Ok(())
    }

    /// Catalog layout in effect
    #[must_use]
    pub fn definition(&self) -> CatalogDefinition {
        self.catalog.clone().unwrap_or_else(CatalogDefinition::devops)
    }

    /// Persistence backend described by this configuration
    #[must_use]
    pub fn build_store(&self) -> Arc<dyn PersistenceStore> {
        match &self.store_dir {
            Some(dir) => Arc::new(FileStore::with_key(dir, self.storage_key.clone())),
            None => Arc::new(MemoryStore::with_key(self.storage_key.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = CapmapConfig::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.storage_key, "capabilityLevels");
        assert_eq!(config.progress.ceiling, 90);
        assert_eq!(config.completion_delay_ms, 500);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(CapmapConfig::from_toml_str("").unwrap(), CapmapConfig::default());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = CapmapConfig::from_toml_str("[progress]\nstep = 25\n").unwrap();
        assert_eq!(config.progress.step, 25);
        assert_eq!(config.progress.tick_ms, 100);
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
    }

    #[test]
    fn custom_catalog_from_toml() {
        let text = r#"
            [[catalog.categories]]
            label = "Process"
            items = ["CI/CD", "IaC"]

            [[catalog.categories]]
            label = "Metrics"
            items = ["MTTR"]
        "#;
        let config = CapmapConfig::from_toml_str(text).unwrap();
        let def = config.definition();
        assert_eq!(def.categories.len(), 2);
        assert_eq!(def.item_count(), 3);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            CapmapConfig::from_toml_str("[progress]\nstep = 0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            CapmapConfig::from_toml_str("[progress]\nceiling = 100\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            CapmapConfig::from_toml_str("storage_key = \"../escape\"\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            CapmapConfig::from_toml_str("max_file_size = \"big\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_duplicate_catalog_items() {
        let text = r#"
            [[catalog.categories]]
            label = "Process"
            items = ["IaC", "IaC"]
        "#;
        assert!(matches!(
            CapmapConfig::from_toml_str(text),
            Err(ConfigError::Catalog(_))
        ));
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CapmapConfig::load(dir.path().join("capmap.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn builder_methods() {
        let config = CapmapConfig::new()
            .with_store_dir("/tmp/capmap")
            .with_storage_key("levels")
            .with_completion_delay_ms(0)
            .with_max_file_size(64);
        assert_eq!(config.store_dir.as_deref(), Some(Path::new("/tmp/capmap")));
        assert_eq!(config.storage_key, "levels");
        assert_eq!(config.completion_delay_ms, 0);
        assert_eq!(config.max_file_size, 64);
    }
}

//! Testing utilities for the capmap workspace
//!
//! Shared fixtures, observers and store doubles.

#![allow(missing_docs)]

use async_trait::async_trait;
use capmap_catalog::{Catalog, CatalogDefinition, CategorySpec, ImportMapping};
use capmap_core::{CapmapConfig, ProgressSchedule, SessionObserver};
use capmap_ingest::{ImportSource, MemoryStore, PersistenceStore, StoreError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

pub const SAMPLE_CSV: &str = "capability,level\nCI/CD,2\nIaC,3\nMTTR,1\n";

pub fn small_definition() -> CatalogDefinition {
    CatalogDefinition::new(vec![
        CategorySpec::new("Process", ["CI/CD", "IaC"]),
        CategorySpec::new("Metrics", ["MTTR", "Lead time"]),
    ])
}

/// Fast schedule, no completion delay
pub fn test_config() -> CapmapConfig {
    CapmapConfig::new()
        .with_catalog(small_definition())
        .with_completion_delay_ms(0)
        .with_progress(ProgressSchedule {
            step: 10,
            tick_ms: 1,
            ceiling: 90,
        })
}

pub fn csv_source(content: &str) -> ImportSource {
    ImportSource::from_bytes("scores.csv", content.as_bytes().to_vec())
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Progress(u8),
    Success(Catalog),
    Failure(String),
}

/// Observer that keeps every notification in order
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<SessionEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().clone()
    }

    pub fn progress(&self) -> Vec<u8> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Progress(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    pub fn successes(&self) -> Vec<Catalog> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Success(c) => Some(c.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Failure(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl SessionObserver for RecordingObserver {
    fn on_progress(&self, percent: u8) {
        self.events.lock().push(SessionEvent::Progress(percent));
    }

    fn on_success(&self, catalog: &Catalog) {
        self.events.lock().push(SessionEvent::Success(catalog.clone()));
    }

    fn on_failure(&self, message: &str) {
        self.events.lock().push(SessionEvent::Failure(message.to_string()));
    }
}

/// Memory store whose operations can be switched to fail
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_load: AtomicBool,
    fail_save: AtomicBool,
    fail_clear: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    pub fn fail_load(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }

    pub fn fail_save(&self, fail: bool) {
        self.fail_save.store(fail, Ordering::SeqCst);
    }

    pub fn fail_clear(&self, fail: bool) {
        self.fail_clear.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("quota exceeded".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PersistenceStore for FlakyStore {
    async fn load(&self) -> Result<Option<ImportMapping>, StoreError> {
        Self::check(&self.fail_load)?;
        self.inner.load().await
    }

    async fn save(&self, mapping: &ImportMapping) -> Result<(), StoreError> {
        Self::check(&self.fail_save)?;
        self.inner.save(mapping).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        Self::check(&self.fail_clear)?;
        self.inner.clear().await
    }
}

/// Memory store whose `save` waits until released
///
/// Holds an import in `Applying` so concurrent requests can be observed.
#[derive(Debug, Default)]
pub struct GatedStore {
    inner: MemoryStore,
    entered: Notify,
    release: Notify,
}

impl GatedStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// Wait until a save is blocked on the gate
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    /// Let the blocked save proceed
    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl PersistenceStore for GatedStore {
    async fn load(&self) -> Result<Option<ImportMapping>, StoreError> {
        self.inner.load().await
    }

    async fn save(&self, mapping: &ImportMapping) -> Result<(), StoreError> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.save(mapping).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.inner.clear().await
    }
}

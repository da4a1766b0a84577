//! Import session
//!
//! Drives one user-initiated import end to end:
//!
//! ```text
//! Idle → Reading → Parsing → Applying → Done → Idle
//!            ↘         ↘
//!             Failed → Idle
//! ```
//!
//! At most one import or reset runs at a time; a second request while one is
//! in flight is rejected with [`SessionError::Busy`]. The working catalog is
//! rebuilt from the default catalog plus the imported mapping, exactly as
//! [`ImportSession::restore`] rebuilds it from the persisted one, and only
//! after the read and parse of the same import have completed.

use crate::config::CapmapConfig;
use crate::error::{SessionError, NOT_PERSISTED_NOTICE};
use crate::observer::{Confirmation, NoopObserver, SessionObserver};
use crate::progress::ProgressTicker;
use crate::state::{validate_transition, SessionState};
use capmap_catalog::{reconcile, unmatched_names, Catalog, CatalogDefinition, ImportMapping};
use capmap_ingest::{CsvRecordParser, ImportSource, ParseError, PersistenceStore, RecordParser};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;

/// Prompt passed to the confirmation collaborator before a reset
pub const RESET_PROMPT: &str = "Reset all capability maturity data?";

/// Result of a successful import
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Display name of the imported file
    pub file_name: String,
    /// Working catalog after reconciliation
    pub catalog: Catalog,
    /// Number of entries in the imported mapping
    pub imported: usize,
    /// Whether the mapping reached durable storage
    pub persisted: bool,
}

/// Result of a reset request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// Store cleared and catalog regenerated
    Reset,
    /// User declined; nothing changed
    Declined,
}

/// Owner of the working catalog and its import lifecycle
pub struct ImportSession {
    config: CapmapConfig,
    definition: CatalogDefinition,
    store: Arc<dyn PersistenceStore>,
    parser: Arc<dyn RecordParser>,
    observer: Arc<dyn SessionObserver>,
    state: Mutex<SessionState>,
    catalog: RwLock<Catalog>,
    /// Held for the whole of an import or reset
    exclusive: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for ImportSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportSession")
            .field("state", &*self.state.lock())
            .field("store", &self.store)
            .field("items", &self.catalog.read().item_count())
            .finish_non_exhaustive()
    }
}

impl ImportSession {
    /// Create session with a default catalog, ignoring any persisted state
    ///
    /// # Errors
    /// `SessionError::Config` if `config` fails validation
    pub fn new(
        config: CapmapConfig,
        store: Arc<dyn PersistenceStore>,
        observer: Arc<dyn SessionObserver>,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let definition = config.definition();
        let catalog = definition.generate_default();

        Ok(Self {
            config,
            definition,
            store,
            parser: Arc::new(CsvRecordParser),
            observer,
            state: Mutex::new(SessionState::Idle),
            catalog: RwLock::new(catalog),
            exclusive: tokio::sync::Mutex::new(()),
        })
    }

    /// Create session and rebuild the working catalog from persisted state
    ///
    /// Absent state yields the default catalog. Unreadable state is logged
    /// and treated as absent.
    ///
    /// # Errors
    /// `SessionError::Config` if `config` fails validation
    pub async fn restore(
        config: CapmapConfig,
        store: Arc<dyn PersistenceStore>,
        observer: Arc<dyn SessionObserver>,
    ) -> Result<Self, SessionError> {
        let session = Self::new(config, store, observer)?;

        match session.store.load().await {
            Ok(Some(mapping)) => {
                let restored = reconcile(&session.definition.generate_default(), &mapping);
                *session.catalog.write() = restored;
                tracing::info!(entries = mapping.len(), "restored persisted capability levels");
            }
            Ok(None) => tracing::debug!("no persisted capability levels"),
            Err(e) => tracing::warn!(error = %e, "ignoring unreadable persisted capability levels"),
        }

        Ok(session)
    }

    /// Session with the in-memory store and no observer
    ///
    /// # Errors
    /// `SessionError::Config` if `config` fails validation
    pub fn in_memory(config: CapmapConfig) -> Result<Self, SessionError> {
        let store = config.build_store();
        Self::new(config, store, Arc::new(NoopObserver))
    }

    /// Replace the upload parser
    #[must_use]
    pub fn with_parser(mut self, parser: Arc<dyn RecordParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Current lifecycle state
    #[inline]
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    /// Snapshot of the working catalog
    #[must_use]
    pub fn catalog(&self) -> Catalog {
        self.catalog.read().clone()
    }

    /// Whether new imports should be disabled
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.state().is_active() || self.exclusive.try_lock().is_err()
    }

    /// Configuration in effect
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CapmapConfig {
        &self.config
    }

    /// Catalog layout in effect
    #[inline]
    #[must_use]
    pub fn definition(&self) -> &CatalogDefinition {
        &self.definition
    }

    /// Run one import
    ///
    /// Progress, success and failure are also reported to the observer. A
    /// read or decode failure leaves the catalog and store untouched. A save
    /// failure keeps the in-memory update and is reported with
    /// `persisted = false`.
    ///
    /// # Errors
    /// - `SessionError::Busy` if another import or reset is running
    /// - `SessionError::Parse` if the file cannot be read, is too large, or is not text
    pub async fn start(&self, source: ImportSource) -> Result<ImportOutcome, SessionError> {
        let Ok(_exclusive) = self.exclusive.try_lock() else {
            tracing::debug!(file = source.display_name(), "import rejected, session busy");
            return Err(SessionError::Busy);
        };

        let file_name = source.display_name().to_string();
        self.set_state(SessionState::Reading)?;
        // Dropped before `_exclusive`
        let _idle = IdleOnDrop(&self.state);
        tracing::info!(file = %file_name, "import started");

        let ticker = ProgressTicker::spawn(self.config.progress, Arc::clone(&self.observer));
        let parsed = self.read_and_parse(&source).await;
        ticker.stop().await;

        let mapping = match parsed {
            Ok(mapping) => mapping,
            Err(e) => return Err(self.fail(&file_name, e)),
        };

        self.set_state(SessionState::Applying)?;
        let merged = self.apply(&mapping);
        let persisted = self.persist(&mapping).await;

        self.set_state(SessionState::Done)?;
        self.observer.on_progress(100);
        self.observer.on_success(&merged);
        tracing::info!(file = %file_name, entries = mapping.len(), persisted, "import finished");

        if self.config.completion_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.completion_delay_ms)).await;
        }
        self.set_state(SessionState::Idle)?;

        Ok(ImportOutcome {
            file_name,
            catalog: merged,
            imported: mapping.len(),
            persisted,
        })
    }

    /// Discard all imported levels after explicit confirmation
    ///
    /// Clears the store and replaces the working catalog with the default
    /// one. If clearing fails the in-memory reset still stands.
    ///
    /// # Errors
    /// - `SessionError::Busy` if an import is running
    /// - `SessionError::Persist` if the store could not be cleared
    pub async fn reset_import(&self, confirmation: &dyn Confirmation) -> Result<ResetOutcome, SessionError> {
        let Ok(_exclusive) = self.exclusive.try_lock() else {
            return Err(SessionError::Busy);
        };

        if !confirmation.confirm(RESET_PROMPT) {
            tracing::debug!("reset declined");
            return Ok(ResetOutcome::Declined);
        }

        *self.catalog.write() = self.definition.generate_default();

        if let Err(e) = self.store.clear().await {
            tracing::warn!(error = %e, "reset applied in memory but persisted levels were not cleared");
            return Err(e.into());
        }

        tracing::info!("capability levels reset to defaults");
        Ok(ResetOutcome::Reset)
    }

    async fn read_and_parse(&self, source: &ImportSource) -> Result<ImportMapping, SessionError> {
        let bytes = source.read().await?;

        let max = self.config.max_file_size;
        if bytes.len() > max {
            return Err(ParseError::TooLarge {
                size: bytes.len(),
                max,
            }
            .into());
        }

        if let Some(ext) = source.extension() {
            if !self.parser.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)) {
                tracing::debug!(extension = ext, "unexpected file extension, parsing anyway");
            }
        }

        self.set_state(SessionState::Parsing)?;
        Ok(self.parser.parse_bytes(source.display_name(), &bytes)?)
    }

    fn apply(&self, mapping: &ImportMapping) -> Catalog {
        let merged = reconcile(&self.definition.generate_default(), mapping);

        let unmatched = unmatched_names(&merged, mapping);
        if !unmatched.is_empty() {
            tracing::debug!(?unmatched, "imported names with no catalog item");
        }

        *self.catalog.write() = merged.clone();
        merged
    }

    async fn persist(&self, mapping: &ImportMapping) -> bool {
        match self.store.save(mapping).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "import applied in memory but could not be persisted");
                self.observer.on_failure(NOT_PERSISTED_NOTICE);
                false
            }
        }
    }

    fn fail(&self, file_name: &str, error: SessionError) -> SessionError {
        tracing::error!(file = %file_name, error = %error, "import failed");

        if let Err(e) = self.set_state(SessionState::Failed) {
            tracing::error!(error = %e, "unexpected state on import failure");
        }
        self.observer.on_failure(error.user_message());
        *self.state.lock() = SessionState::Idle;
        error
    }

    fn set_state(&self, to: SessionState) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        let from = *state;
        validate_transition(from, to)?;
        tracing::debug!(%from, %to, "session transition");
        *state = to;
        Ok(())
    }
}

/// Returns the session to `Idle` when an import ends early
///
/// Covers a `start` future dropped mid-import. On normal completion the
/// state is already `Idle` and this does nothing.
struct IdleOnDrop<'a>(&'a Mutex<SessionState>);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        let mut state = self.0.lock();
        if *state != SessionState::Idle {
            tracing::warn!(from = %*state, "import abandoned, session returned to idle");
            *state = SessionState::Idle;
        }
    }
}

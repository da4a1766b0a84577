//! Capability Map Core
//!
//! Orchestrates the capability-data pipeline behind the maturity heat-map:
//! - Restores the working catalog from persisted state at startup
//! - Runs import sessions (read → parse → reconcile → persist)
//! - Resets imported levels after explicit confirmation
//! - Reports progress and outcomes to an injected presentation observer
//!
//! # Example
//!
//! ```rust,ignore
//! use capmap_core::{CapmapConfig, ImportSession, NoopObserver};
//! use capmap_ingest::ImportSource;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CapmapConfig::new().with_store_dir(".capmap");
//! let store = config.build_store();
//! let session = ImportSession::restore(config, store, Arc::new(NoopObserver)).await?;
//!
//! let outcome = session.start(ImportSource::from_path("scores.csv")).await?;
//! println!("imported {} levels", outcome.imported);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod config;
pub mod error;
pub mod observer;
mod progress;
pub mod session;
pub mod state;
pub mod telemetry;

// Re-exports for convenience
pub use config::{CapmapConfig, ProgressSchedule};
pub use error::{ConfigError, SessionError, SessionResult, NOT_PERSISTED_NOTICE};
pub use observer::{Confirmation, NoopObserver, SessionObserver};
pub use session::{ImportOutcome, ImportSession, ResetOutcome, RESET_PROMPT};
pub use state::SessionState;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the capability map core
    pub use crate::{
        CapmapConfig, Confirmation, ImportOutcome, ImportSession, ResetOutcome, SessionError,
        SessionObserver, SessionState,
    };
    pub use capmap_catalog::{Catalog, CatalogDefinition, ImportMapping, MaturityLevel};
    pub use capmap_ingest::{ImportSource, PersistenceStore};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

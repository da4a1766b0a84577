//! Capability Map ingestion layer
//!
//! The trusted boundary between the outside world (uploaded files, durable
//! client storage) and the typed catalog.
//!
//! # Core Operations
//!
//! - **Acquire**: read an [`ImportSource`] into bytes
//! - **Parse**: turn bytes into a validated `ImportMapping` via a [`RecordParser`]
//! - **Persist**: save, load and clear the last mapping through a [`PersistenceStore`]
//!
//! # Architecture
//!
//! ```text
//! ImportSource → bytes → RecordParser → ImportMapping → PersistenceStore
//!                                            ↓
//!                                   capmap_catalog::reconcile
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use capmap_ingest::{CsvRecordParser, ImportSource, MemoryStore, PersistenceStore, RecordParser};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = ImportSource::from_path("scores.csv");
//! let bytes = source.read().await?;
//! let mapping = CsvRecordParser.parse_bytes(source.display_name(), &bytes)?;
//!
//! let store = MemoryStore::new();
//! store.save(&mapping).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod parser;
pub mod source;
pub mod store;

pub use error::{ParseError, StoreError};
pub use parser::{CsvRecordParser, ParseStats, RecordParser};
pub use source::ImportSource;
pub use store::{FileStore, MemoryStore, PersistenceStore, DEFAULT_STORAGE_KEY};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

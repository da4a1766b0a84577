//! Capability catalog
//!
//! Typed domain values for the capability maturity heat-map.
//!
//! # Core Concepts
//!
//! - [`MaturityLevel`]: validated 1–4 score
//! - [`ImportMapping`]: capability name → level, valid by construction
//! - [`CatalogDefinition`]: fixed, ordered categories and item names
//! - [`Catalog`]: scored view of a definition
//! - [`reconcile`]: pure merge of a mapping into a catalog
//!
//! # Example
//!
//! ```rust
//! use capmap_catalog::{reconcile, CatalogDefinition, ImportMapping, MaturityLevel};
//!
//! let catalog = CatalogDefinition::devops().generate_default();
//!
//! let mut mapping = ImportMapping::new();
//! mapping.insert("CI/CD", MaturityLevel::MIN);
//!
//! let merged = reconcile(&catalog, &mapping);
//! assert_eq!(merged.level_of("CI/CD"), Some(MaturityLevel::MIN));
//! ```

#![warn(unreachable_pub)]

mod catalog;
mod error;
mod level;
mod mapping;
mod reconcile;

pub use catalog::{
    CapabilityCategory, CapabilityItem, Catalog, CatalogDefinition, CategorySpec, SAMPLE_HEADER,
};
pub use error::{CatalogError, MappingError};
pub use level::MaturityLevel;
pub use mapping::{is_valid, ImportMapping, RawMapping};
pub use reconcile::{reconcile, unmatched_names};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Error types for the capability map core
//!
//! Provides error handling for:
//! - Import session failures (read, decode, size limit)
//! - Persistence failures (save, clear)
//! - Session state violations and single-flight rejection
//! - Configuration loading

use crate::state::SessionState;
use capmap_catalog::CatalogError;
use capmap_ingest::{ParseError, StoreError};
use std::path::PathBuf;

/// Notice shown when the in-memory update succeeded but could not be saved
pub const NOT_PERSISTED_NOTICE: &str =
    "Capability levels were updated for this session only; they could not be saved on this device.";

/// Main session error type
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Another import or reset is in flight
    #[error("an import is already in progress")]
    Busy,

    /// Upload could not be read or decoded
    #[error("import failed: {0}")]
    Parse(#[from] ParseError),

    /// Durable storage failed
    #[error("persistence failed: {0}")]
    Persist(#[from] StoreError),

    /// State machine violation
    #[error("illegal session transition: {from} -> {to}")]
    IllegalTransition { from: SessionState, to: SessionState },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SessionError {
    /// Fixed human-readable notice for the presentation layer
    ///
    /// Never includes paths or internal error detail.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Busy => "An import is already in progress. Please wait for it to finish.",
            Self::Parse(ParseError::TooLarge { .. }) => "The capability file is too large to import.",
            Self::Parse(_) => "Failed to read the capability file.",
            Self::Persist(_) => "Capability levels could not be saved on this device.",
            Self::IllegalTransition { .. } => "The import could not be completed.",
            Self::Config(_) => "The capability map is misconfigured.",
        }
    }

    /// Whether the caller may simply try again later
    #[inline]
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Value out of bounds
    #[error("invalid value: {0}")]
    Invalid(String),

    /// Custom catalog layout rejected
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;

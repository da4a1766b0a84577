//! Error types for the ingestion layer
//!
//! Provides error handling for:
//! - Read/decode of uploaded content (file → text)
//! - Persistence of accepted imports (mapping ↔ durable storage)

use std::path::PathBuf;

/// Errors turning an uploaded file into text
///
/// Individual malformed rows are never errors; they are skipped by the parser.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Content is not valid UTF-8
    #[error("content of '{name}' is not valid UTF-8: {source}")]
    Decode {
        /// Display name of the upload
        name: String,
        /// Position of the first invalid byte
        #[source]
        source: std::str::Utf8Error,
    },

    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Content exceeds the configured size limit
    #[error("file too large: {size} bytes (max: {max})")]
    TooLarge {
        /// Actual size in bytes
        size: usize,
        /// Configured limit in bytes
        max: usize,
    },
}

impl ParseError {
    /// Create decode error for a named source
    pub fn decode(name: impl Into<String>, source: std::str::Utf8Error) -> Self {
        Self::Decode {
            name: name.into(),
            source,
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors in durable storage of the last import
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backend could not be read or written
    #[error("io error on {path}: {source}")]
    Io {
        /// Record or temp file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Mapping could not be encoded
    #[error("failed to encode mapping: {0}")]
    Encode(#[source] serde_json::Error),

    /// Stored value is not a valid mapping
    #[error("stored value under '{key}' is corrupt: {source}")]
    Corrupt {
        /// Storage key of the record
        key: String,
        /// Decode failure
        #[source]
        source: serde_json::Error,
    },

    /// Backend refused the operation (quota, disabled storage, ...)
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large_display() {
        let err = ParseError::TooLarge { size: 20, max: 10 };
        assert_eq!(err.to_string(), "file too large: 20 bytes (max: 10)");
    }

    #[test]
    fn unavailable_display() {
        let err = StoreError::Unavailable("quota exceeded".to_string());
        assert_eq!(err.to_string(), "storage unavailable: quota exceeded");
    }
}

//! File acquisition
//!
//! An [`ImportSource`] is whatever the presentation layer handed over: a
//! path on disk or bytes it already holds. Reading it is the only await
//! point of an import.

use crate::error::ParseError;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
enum Origin {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// Uploaded file awaiting import
#[derive(Debug, Clone)]
pub struct ImportSource {
    display_name: String,
    origin: Origin,
}

impl ImportSource {
    /// Source backed by a file on disk
    ///
    /// The display name is the final path component.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self {
            display_name,
            origin: Origin::Path(path),
        }
    }

    /// Source whose content is already in memory
    #[must_use]
    pub fn from_bytes(display_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            display_name: display_name.into(),
            origin: Origin::Bytes(bytes.into()),
        }
    }

    /// User-visible file name
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Extension of the display name, if any
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.display_name)
            .extension()
            .and_then(|e| e.to_str())
    }

    /// Read the whole content
    ///
    /// # Errors
    /// `ParseError::Io` if the file cannot be read
    pub async fn read(&self) -> Result<Vec<u8>, ParseError> {
        match &self.origin {
            Origin::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| ParseError::io_error(path, e)),
            Origin::Bytes(bytes) => Ok(bytes.clone()),
        }
    }
}

//! Error types for document I/O.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by [`crate::DocumentStore`].
#[derive(Error, Debug)]
pub enum FilesError {
    /// The document does not exist.
    #[error("Document not found: {}", path.display())]
    NotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The relative path escapes the project root or is absolute.
    #[error("Invalid document path: {}", path.display())]
    InvalidPath {
        /// Rejected path
        path: PathBuf,
    },

    /// The document is not valid UTF-8.
    #[error("Document is not valid UTF-8: {}", path.display())]
    NotUtf8 {
        /// Path of the undecodable document
        path: PathBuf,
    },

    /// Any other I/O failure.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path involved in the failed operation
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: io::Error,
    },
}

impl FilesError {
    /// Returns `true` if the document does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound { path }
            | Self::InvalidPath { path }
            | Self::NotUtf8 { path }
            | Self::Io { path, .. } => path,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::InvalidData => Self::NotUtf8 { path },
            _ => Self::Io { path, source },
        }
    }
}

impl From<FilesError> for raglib_core::Error {
    fn from(error: FilesError) -> Self {
        Self::WriteError {
            path: error.path().display().to_string(),
            source: Box::new(error),
        }
    }
}

/// Result type for document I/O.
pub type Result<T> = std::result::Result<T, FilesError>;

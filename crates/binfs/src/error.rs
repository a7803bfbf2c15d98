//! Error types for the embedded filesystem.
//!
//! Lookup errors ([`VfsError::InvalidPath`], [`VfsError::NotFound`],
//! [`VfsError::InvalidOperation`]) are returned to the caller and never
//! logged. Corruption errors can only occur while the filesystem is being
//! constructed and mean the embedded data cannot be trusted.
//!
//! # Examples
//!
//! ```
//! use binfs::{FileSystem, VfsError};
//!
//! let fs = FileSystem::new();
//! let err = fs.open("/missing.txt").unwrap_err();
//!
//! assert!(err.is_not_found());
//! assert!(matches!(err, VfsError::NotFound { .. }));
//! ```

use crate::codec::CodecError;
use std::io;
use thiserror::Error;

/// Errors that can occur while building or querying a [`FileSystem`](crate::FileSystem).
#[derive(Error, Debug)]
pub enum VfsError {
    /// The request path is malformed or unsafe.
    #[error("Invalid path: {path:?} ({reason})")]
    InvalidPath {
        /// The rejected path
        path: String,
        /// Why the path was rejected
        reason: &'static str,
    },

    /// The path is well formed but nothing was embedded there.
    #[error("File not found: {path}")]
    NotFound {
        /// Canonical path that was looked up
        path: String,
    },

    /// A directory-only operation was invoked on a file, or the reverse.
    #[error("Invalid operation '{operation}' on {path}")]
    InvalidOperation {
        /// Path of the entry the operation was invoked on
        path: String,
        /// Name of the rejected operation
        operation: &'static str,
    },

    /// An encoded field of an embedded entry could not be decoded.
    #[error("Corrupt embedded data for {path}")]
    CorruptData {
        /// Path of the entry being constructed
        path: String,
        /// Underlying decode failure
        #[source]
        source: CodecError,
    },

    /// The decoded fields of an embedded entry contradict each other.
    #[error("Inconsistent embedded entry {path}: {reason}")]
    InconsistentEntry {
        /// Path of the entry being constructed
        path: String,
        /// Description of the inconsistency
        reason: String,
    },
}

impl VfsError {
    /// Returns `true` if the request path was rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use binfs::FileSystem;
    ///
    /// let fs = FileSystem::new();
    /// assert!(fs.open("/a\0b").unwrap_err().is_invalid_path());
    /// ```
    #[must_use]
    pub const fn is_invalid_path(&self) -> bool {
        matches!(self, Self::InvalidPath { .. })
    }

    /// Returns `true` if nothing exists at the requested path.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if an operation was invoked on the wrong kind of entry.
    #[must_use]
    pub const fn is_invalid_operation(&self) -> bool {
        matches!(self, Self::InvalidOperation { .. })
    }

    /// Returns `true` if the embedded data is corrupt.
    ///
    /// These errors only surface during construction and should abort
    /// startup: a partially built tree would serve wrong or missing content.
    #[must_use]
    pub const fn is_corrupt(&self) -> bool {
        matches!(
            self,
            Self::CorruptData { .. } | Self::InconsistentEntry { .. }
        )
    }
}

impl From<VfsError> for io::Error {
    fn from(err: VfsError) -> Self {
        let kind = match &err {
            VfsError::InvalidPath { .. } => io::ErrorKind::InvalidInput,
            VfsError::NotFound { .. } => io::ErrorKind::NotFound,
            VfsError::InvalidOperation { .. } => io::ErrorKind::Unsupported,
            VfsError::CorruptData { .. } | VfsError::InconsistentEntry { .. } => {
                io::ErrorKind::InvalidData
            }
        };
        Self::new(kind, err)
    }
}

/// Type alias for filesystem operation results.
pub type Result<T> = std::result::Result<T, VfsError>;

//! Error types for snapshotting and source generation.

use binfs::{CodecError, VfsError};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while capturing a directory or emitting source.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// The snapshot root is missing or is not a directory.
    #[error("Not a directory: {}", path.display())]
    NotADirectory {
        /// The rejected root
        path: PathBuf,
    },

    /// Reading a file or its metadata failed.
    #[error("I/O error at {}", path.display())]
    Io {
        /// Path being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Directory traversal failed.
    #[error("Directory walk failed")]
    Walk(#[from] walkdir::Error),

    /// A path below the root cannot be represented as UTF-8.
    #[error("Path is not valid UTF-8: {}", path.display())]
    NonUtf8Path {
        /// The offending path
        path: PathBuf,
    },

    /// An entry could not be encoded.
    #[error("Failed to encode {path}")]
    Encode {
        /// Canonical path of the entry
        path: String,
        /// Underlying codec error
        #[source]
        source: CodecError,
    },

    /// Building the in-memory filesystem failed.
    #[error(transparent)]
    Vfs(#[from] VfsError),

    /// A configured name is not usable in Rust source.
    #[error("Invalid {kind} {value:?}: {reason}")]
    InvalidIdentifier {
        /// What the value names
        kind: &'static str,
        /// The rejected value
        value: String,
        /// Parser message
        reason: String,
    },

    /// Template registration or rendering failed.
    #[error("Template error: {message}")]
    Template {
        /// Description of the failure
        message: String,
    },

    /// The rendered source does not parse as a Rust file.
    #[error("Generated source does not parse: {message}")]
    InvalidOutput {
        /// Parser message
        message: String,
    },
}

impl CodegenError {
    /// Returns `true` for filesystem access failures.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(
            self,
            Self::NotADirectory { .. } | Self::Io { .. } | Self::Walk(_) | Self::NonUtf8Path { .. }
        )
    }

    /// Returns `true` if the generator configuration was rejected.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidIdentifier { .. })
    }
}

/// Result type for code generation.
pub type Result<T> = std::result::Result<T, CodegenError>;

//! Encoded entry records exchanged between the source emitter and the loader.
//!
//! Generated source contains one [`EncodedEntry`] literal per embedded file
//! or directory. Decoding a record performs every consistency check; a
//! record that fails them is corrupt and must abort construction.

use crate::codec;
use crate::entry::{Entry, FileMode};
use crate::error::{Result, VfsError};
use crate::path;
use tracing::debug;

/// One embedded file or directory in its text-safe form.
///
/// # Examples
///
/// ```
/// use binfs::{EncodedEntry, FileSystem};
///
/// let mut fs = FileSystem::new();
/// fs.add(EncodedEntry {
///     path: "/",
///     name: ".",
///     size: 0,
///     mode: 0o40755,
///     mod_time: "010000000e7791f70000000000ffff",
///     is_dir: true,
///     content: "",
/// })?;
///
/// assert!(fs.open("/")?.stat().is_dir());
/// # Ok::<(), binfs::VfsError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedEntry<'a> {
    /// Canonical path of the entry
    pub path: &'a str,
    /// Base name of the entry
    pub name: &'a str,
    /// Uncompressed content length in bytes
    pub size: u64,
    /// Unix mode bits
    pub mode: u32,
    /// Modification time encoded with [`codec::time`]
    pub mod_time: &'a str,
    /// Directory tag
    pub is_dir: bool,
    /// Content encoded with [`codec::content`], empty for directories
    pub content: &'a str,
}

impl EncodedEntry<'_> {
    /// Decodes and validates the record.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::InvalidPath`] if the path is unsafe,
    /// [`VfsError::CorruptData`] if a field cannot be decoded, or
    /// [`VfsError::InconsistentEntry`] if a file's size does not match its
    /// content, a directory carries content, or a file sits at the root.
    pub fn decode(&self) -> Result<Entry> {
        let path = path::resolve(self.path)?;

        let modified = codec::time::decode(self.mod_time).map_err(|source| {
            VfsError::CorruptData {
                path: path.clone(),
                source,
            }
        })?;
        let content =
            codec::content::decode(self.content).map_err(|source| VfsError::CorruptData {
                path: path.clone(),
                source,
            })?;
        let mode = FileMode::new(self.mode);

        let entry = if self.is_dir {
            if !content.is_empty() {
                return Err(VfsError::InconsistentEntry {
                    path,
                    reason: format!("directory carries {} bytes of content", content.len()),
                });
            }
            if self.size != 0 {
                debug!(path = %path, size = self.size, "ignoring size of directory");
            }
            Entry::directory(path, mode, modified)
        } else {
            if content.len() as u64 != self.size {
                return Err(VfsError::InconsistentEntry {
                    path,
                    reason: format!(
                        "declared size {} does not match decoded length {}",
                        self.size,
                        content.len()
                    ),
                });
            }
            Entry::file(path, mode, modified, content)
        };

        let entry = entry.with_name(self.name);
        entry.check_root()?;
        Ok(entry)
    }
}

/// Owned counterpart of [`EncodedEntry`], produced by [`Entry::encode`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OwnedEncodedEntry {
    /// Canonical path of the entry
    pub path: String,
    /// Base name of the entry
    pub name: String,
    /// Uncompressed content length in bytes
    pub size: u64,
    /// Unix mode bits
    pub mode: u32,
    /// Modification time encoded with [`codec::time`]
    pub mod_time: String,
    /// Directory tag
    pub is_dir: bool,
    /// Content encoded with [`codec::content`], empty for directories
    pub content: String,
}

impl OwnedEncodedEntry {
    /// Borrows this record as an [`EncodedEntry`].
    #[must_use]
    pub fn as_encoded(&self) -> EncodedEntry<'_> {
        EncodedEntry {
            path: &self.path,
            name: &self.name,
            size: self.size,
            mode: self.mode,
            mod_time: &self.mod_time,
            is_dir: self.is_dir,
            content: &self.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPOCH: &str = "010000000e7791f70000000000ffff";

    fn file(size: u64, content: &str) -> OwnedEncodedEntry {
        OwnedEncodedEntry {
            path: "/a.txt".to_string(),
            name: "a.txt".to_string(),
            size,
            mode: 0o100_644,
            mod_time: EPOCH.to_string(),
            is_dir: false,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_decode_file() {
        let content = codec::content::encode(b"hello").unwrap();
        let entry = file(5, &content).as_encoded().decode().unwrap();
        assert_eq!(entry.path(), "/a.txt");
        assert_eq!(entry.name(), "a.txt");
        assert_eq!(entry.content(), b"hello");
        assert_eq!(entry.modified().timestamp(), 0);
    }

    #[test]
    fn test_decode_canonicalizes_path() {
        let mut record = file(0, "");
        record.path = "a/./b/../a.txt".to_string();
        let entry = record.as_encoded().decode().unwrap();
        assert_eq!(entry.path(), "/a/a.txt");
    }

    #[test]
    fn test_decode_size_mismatch() {
        let content = codec::content::encode(b"hello").unwrap();
        let err = file(4, &content).as_encoded().decode().unwrap_err();
        assert!(matches!(err, VfsError::InconsistentEntry { .. }));
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_decode_corrupt_content() {
        let err = file(5, "00112233").as_encoded().decode().unwrap_err();
        assert!(matches!(err, VfsError::CorruptData { ref path, .. } if path == "/a.txt"));
    }

    #[test]
    fn test_decode_corrupt_time() {
        let mut record = file(0, "");
        record.mod_time = "01".to_string();
        let err = record.as_encoded().decode().unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_decode_directory_with_content() {
        let mut record = file(0, &codec::content::encode(b"x").unwrap());
        record.is_dir = true;
        let err = record.as_encoded().decode().unwrap_err();
        assert!(matches!(err, VfsError::InconsistentEntry { .. }));
    }

    #[test]
    fn test_decode_directory_accepts_empty_gzip() {
        let mut record = file(4096, &codec::content::encode(b"").unwrap());
        record.is_dir = true;
        let entry = record.as_encoded().decode().unwrap();
        assert!(entry.is_dir());
        assert_eq!(entry.size(), 0);
    }

    #[test]
    fn test_decode_rejects_file_at_root() {
        let mut record = file(0, "");
        record.path = "/".to_string();
        let err = record.as_encoded().decode().unwrap_err();
        assert!(matches!(err, VfsError::InconsistentEntry { ref path, .. } if path == "/"));
    }

    #[test]
    fn test_decode_rejects_nul_path() {
        let mut record = file(0, "");
        record.path = "/a\0".to_string();
        assert!(record.as_encoded().decode().unwrap_err().is_invalid_path());
    }
}

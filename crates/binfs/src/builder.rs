//! Order-independent construction of a [`FileSystem`].
//!
//! [`FileSystem::add`] links an entry under its parent only if the parent
//! already exists. The builder instead inserts every entry first and links
//! them afterwards, so a child listed before its directory is not lost.
//!
//! # Examples
//!
//! ```
//! use binfs::{Entry, FileMode, FileSystemBuilder};
//! use chrono::DateTime;
//!
//! let t = DateTime::from_timestamp(0, 0).unwrap().fixed_offset();
//! let mut builder = FileSystemBuilder::new();
//! builder
//!     .insert(Entry::file("/d/f", FileMode::regular(0o644), t, Vec::new()))
//!     .insert(Entry::directory("/d", FileMode::directory(0o755), t));
//! let fs = builder.build()?;
//!
//! let listing = fs.open("/d")?.readdir(-1)?.unwrap();
//! assert_eq!(listing[0].name(), "f");
//! # Ok::<(), binfs::VfsError>(())
//! ```

use crate::entry::Entry;
use crate::error::{Result, VfsError};
use crate::path;
use crate::record::EncodedEntry;
use crate::vfs::FileSystem;
use std::collections::HashSet;
use tracing::debug;

/// Builder that links entries only after all of them are known.
///
/// Records are decoded as they are added. The first failure is kept, later
/// records are ignored, and [`build`](Self::build) returns that failure.
#[derive(Debug, Default)]
pub struct FileSystemBuilder {
    entries: Vec<Entry>,
    error: Option<VfsError>,
}

impl FileSystemBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            error: None,
        }
    }

    /// Decodes and queues an embedded record.
    ///
    /// A decode failure is reported by [`build`](Self::build).
    pub fn add(&mut self, record: EncodedEntry<'_>) -> &mut Self {
        if self.error.is_none() {
            match record.decode() {
                Ok(entry) => self.entries.push(entry),
                Err(e) => self.error = Some(e),
            }
        }
        self
    }

    /// Queues a decoded entry.
    ///
    /// An unsafe path, or a file at the root, is reported by
    /// [`build`](Self::build).
    pub fn insert(&mut self, entry: Entry) -> &mut Self {
        if self.error.is_none() {
            match entry.canonicalize() {
                Ok(entry) => self.entries.push(entry),
                Err(e) => self.error = Some(e),
            }
        }
        self
    }

    /// Returns the number of queued entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts every queued entry, then links each one under its parent.
    ///
    /// Children are listed in the order they were first queued. A later
    /// entry at the same path replaces the earlier one.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded by [`add`](Self::add) or
    /// [`insert`](Self::insert).
    pub fn build(self) -> Result<FileSystem> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut fs = FileSystem::new();
        let mut seen = HashSet::with_capacity(self.entries.len());
        let mut order = Vec::with_capacity(self.entries.len());
        for entry in self.entries {
            if seen.insert(entry.path.clone()) {
                order.push(entry.path.clone());
            }
            fs.store_unlinked(entry);
        }

        let mut unlinked = 0usize;
        for child in &order {
            if !fs.link(child, false) && child != path::ROOT {
                debug!(path = %child, "no parent directory to link under");
                unlinked += 1;
            }
        }

        debug!(entries = fs.len(), unlinked, "built filesystem");
        Ok(fs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Timestamp;
    use crate::codec;
    use crate::entry::FileMode;
    use chrono::DateTime;

    fn epoch() -> Timestamp {
        DateTime::from_timestamp(0, 0).unwrap().fixed_offset()
    }

    fn dir(path: &str) -> Entry {
        Entry::directory(path, FileMode::directory(0o755), epoch())
    }

    fn file(path: &str) -> Entry {
        Entry::file(path, FileMode::regular(0o644), epoch(), Vec::new())
    }

    fn listing(fs: &FileSystem, path: &str) -> Vec<String> {
        fs.open(path)
            .unwrap()
            .readdir(-1)
            .unwrap()
            .unwrap()
            .iter()
            .map(|e| e.name().to_string())
            .collect()
    }

    #[test]
    fn test_build_empty() {
        let fs = FileSystemBuilder::new().build().unwrap();
        assert!(fs.is_empty());
    }

    #[test]
    fn test_links_regardless_of_order() {
        let mut builder = FileSystemBuilder::new();
        builder
            .insert(file("/d/f"))
            .insert(file("/d/g"))
            .insert(dir("/d"))
            .insert(dir("/"));
        let fs = builder.build().unwrap();

        assert_eq!(listing(&fs, "/d"), vec!["f", "g"]);
        assert_eq!(listing(&fs, "/"), vec!["d"]);
    }

    #[test]
    fn test_duplicate_keeps_first_position_and_last_content() {
        let mut builder = FileSystemBuilder::new();
        builder
            .insert(dir("/"))
            .insert(Entry::file("/a", FileMode::regular(0o644), epoch(), b"1".to_vec()))
            .insert(file("/b"))
            .insert(Entry::file("/a", FileMode::regular(0o644), epoch(), b"2".to_vec()));
        let fs = builder.build().unwrap();

        assert_eq!(listing(&fs, "/"), vec!["a", "b"]);
        assert_eq!(fs.get("/a").unwrap().content(), b"2");
    }

    #[test]
    fn test_missing_parent_is_skipped() {
        let mut builder = FileSystemBuilder::new();
        builder.insert(dir("/")).insert(file("/x/y"));
        let fs = builder.build().unwrap();

        assert!(fs.exists("/x/y"));
        assert!(listing(&fs, "/").is_empty());
    }

    #[test]
    fn test_insert_uses_resolved_names() {
        let mut builder = FileSystemBuilder::new();
        builder.insert(file("/d/f/")).insert(dir("/d//")).insert(dir("/"));
        let fs = builder.build().unwrap();

        assert_eq!(listing(&fs, "/"), vec!["d"]);
        assert_eq!(listing(&fs, "/d"), vec!["f"]);
    }

    #[test]
    fn test_file_at_root_fails_build() {
        let mut builder = FileSystemBuilder::new();
        builder.insert(dir("/")).insert(file("/a/.."));
        assert!(builder.build().unwrap_err().is_corrupt());
    }

    #[test]
    fn test_first_error_is_returned() {
        let mut builder = FileSystemBuilder::new();
        builder
            .add(EncodedEntry {
                path: "/bad",
                name: "bad",
                size: 0,
                mode: 0o100_644,
                mod_time: "nothex",
                is_dir: false,
                content: "",
            })
            .insert(file("/a\0"));
        let err = builder.build().unwrap_err();

        assert!(matches!(err, VfsError::CorruptData { ref path, .. } if path == "/bad"));
    }

    #[test]
    fn test_add_records() {
        let time = codec::time::encode(&epoch()).unwrap();
        let body = codec::content::encode(b"hi").unwrap();
        let mut builder = FileSystemBuilder::new();
        builder
            .add(EncodedEntry {
                path: "/x.txt",
                name: "x.txt",
                size: 2,
                mode: 0o100_644,
                mod_time: &time,
                is_dir: false,
                content: &body,
            })
            .add(EncodedEntry {
                path: "/",
                name: ".",
                size: 0,
                mode: 0o40755,
                mod_time: &time,
                is_dir: true,
                content: "",
            });
        assert_eq!(builder.len(), 2);

        let fs = builder.build().unwrap();
        assert_eq!(listing(&fs, "/"), vec!["x.txt"]);
        assert_eq!(fs.open("/x.txt").unwrap().content(), b"hi");
    }
}

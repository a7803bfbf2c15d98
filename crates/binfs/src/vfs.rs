//! The embedded filesystem.
//!
//! Entries are stored in a flat map keyed by canonical path. Directory
//! listings are reconstructed by linking each entry into its parent's child
//! list when it is inserted.
//!
//! # Examples
//!
//! ```
//! use binfs::{Entry, FileMode, FileSystem};
//! use chrono::DateTime;
//! use std::io::Read;
//!
//! let t = DateTime::from_timestamp(1_600_000_000, 0).unwrap().fixed_offset();
//! let mut fs = FileSystem::new();
//! fs.insert(Entry::directory("/", FileMode::directory(0o755), t))?;
//! fs.insert(Entry::file("/a.txt", FileMode::regular(0o644), t, b"hello".to_vec()))?;
//!
//! let mut body = String::new();
//! fs.open("/a.txt")?.read_to_string(&mut body)?;
//! assert_eq!(body, "hello");
//!
//! let listing = fs.open("/")?.readdir(-1)?.unwrap();
//! assert_eq!(listing[0].name(), "a.txt");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::entry::Entry;
use crate::error::{Result, VfsError};
use crate::handle::File;
use crate::path;
use crate::record::EncodedEntry;
use std::collections::HashMap;
use tracing::debug;

/// A read-only filesystem reconstructed from embedded entries.
///
/// Construction happens once, through [`add`](Self::add),
/// [`insert`](Self::insert) or a [`FileSystemBuilder`](crate::FileSystemBuilder).
/// Afterwards the filesystem is only read, and every [`open`](Self::open)
/// returns an independent handle.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`. Handles borrow it immutably, so any
/// number of threads can serve from one instance.
#[derive(Debug, Clone, Default)]
pub struct FileSystem {
    entries: HashMap<String, Entry>,
}

impl FileSystem {
    /// Creates an empty filesystem.
    ///
    /// # Examples
    ///
    /// ```
    /// use binfs::FileSystem;
    ///
    /// let fs = FileSystem::new();
    /// assert!(fs.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Decodes an embedded record and inserts it.
    ///
    /// The entry is linked under its parent only if the parent directory has
    /// already been added; otherwise it stays reachable by path but is never
    /// listed. Use [`FileSystemBuilder`](crate::FileSystemBuilder) when
    /// records may arrive in any order.
    ///
    /// # Errors
    ///
    /// Returns a corruption error if the record cannot be decoded. Such an
    /// error must abort construction.
    pub fn add(&mut self, record: EncodedEntry<'_>) -> Result<()> {
        let entry = record.decode()?;
        self.store(entry);
        Ok(())
    }

    /// Inserts a decoded entry under the canonical form of its path.
    ///
    /// An existing entry at the same path is replaced. Linking follows the
    /// same rule as [`add`](Self::add).
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::InvalidPath`] if the entry's path is unsafe, or
    /// [`VfsError::InconsistentEntry`] if a file would replace the root.
    pub fn insert(&mut self, entry: Entry) -> Result<()> {
        let entry = entry.canonicalize()?;
        self.store(entry);
        Ok(())
    }

    fn store(&mut self, entry: Entry) {
        let key = entry.path.clone();
        let replaced = self.store_unlinked(entry);
        let linked = self.link(&key, replaced);
        debug!(path = %key, replaced, linked, "stored entry");
    }

    /// Inserts without linking. Returns `true` if an entry was replaced.
    pub(crate) fn store_unlinked(&mut self, entry: Entry) -> bool {
        self.entries.insert(entry.path.clone(), entry).is_some()
    }

    /// Links `child` into its parent's children.
    ///
    /// Returns `false` for the root, or if the parent is missing or is not a
    /// directory.
    pub(crate) fn link(&mut self, child: &str, dedupe: bool) -> bool {
        path::parent(child)
            .and_then(|parent| self.entries.get_mut(parent))
            .is_some_and(|parent| parent.link_child(child, dedupe))
    }

    /// Opens the entry at `request`.
    ///
    /// The returned handle has its own read position and listing cursor.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::InvalidPath`] if the path is unsafe, or
    /// [`VfsError::NotFound`] if nothing was embedded at it.
    ///
    /// # Examples
    ///
    /// ```
    /// use binfs::FileSystem;
    ///
    /// let fs = FileSystem::new();
    /// assert!(fs.open("/missing").unwrap_err().is_not_found());
    /// ```
    pub fn open(&self, request: &str) -> Result<File<'_>> {
        let key = path::resolve(request)?;
        let entry = self
            .entries
            .get(&key)
            .ok_or(VfsError::NotFound { path: key })?;
        Ok(File::new(self, entry))
    }

    /// Returns the entry at `request`, or `None` if the path is invalid or
    /// absent.
    #[must_use]
    pub fn get(&self, request: &str) -> Option<&Entry> {
        path::resolve(request)
            .ok()
            .and_then(|key| self.entries.get(&key))
    }

    /// Returns `true` if an entry exists at `request`.
    #[must_use]
    pub fn exists(&self, request: &str) -> bool {
        self.get(request).is_some()
    }

    /// Looks up a canonical key without resolving it.
    pub(crate) fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Returns the linked children of a directory entry.
    pub(crate) fn children_of<'fs>(&'fs self, entry: &'fs Entry) -> Vec<&'fs Entry> {
        entry
            .children()
            .unwrap_or_default()
            .iter()
            .filter_map(|child| self.entries.get(child))
            .collect()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns all canonical paths in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use binfs::{Entry, FileMode, FileSystem};
    /// use chrono::DateTime;
    ///
    /// let t = DateTime::from_timestamp(0, 0).unwrap().fixed_offset();
    /// let mut fs = FileSystem::new();
    /// fs.insert(Entry::file("/b", FileMode::regular(0o644), t, Vec::new()))?;
    /// fs.insert(Entry::file("/a", FileMode::regular(0o644), t, Vec::new()))?;
    ///
    /// assert_eq!(fs.paths(), vec!["/a", "/b"]);
    /// # Ok::<(), binfs::VfsError>(())
    /// ```
    #[must_use]
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<_> = self.entries.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    /// Iterates over all entries in unspecified order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Returns every entry reachable from the root through directory
    /// listings, depth first, in link order.
    ///
    /// Entries that were never linked under their parent are not visited.
    #[must_use]
    pub fn walk(&self) -> Vec<&Entry> {
        let mut visited = Vec::new();
        let mut stack: Vec<&Entry> = self.entries.get(path::ROOT).into_iter().collect();
        while let Some(entry) = stack.pop() {
            visited.push(entry);
            stack.extend(self.children_of(entry).into_iter().rev());
        }
        visited
    }
}

//! Open handles.
//!
//! Every [`FileSystem::open`](crate::FileSystem::open) call returns a fresh
//! [`File`] with its own read offset and directory cursor, so independent
//! callers never observe each other's progress. The entry itself is shared
//! and never mutated.

use crate::entry::Entry;
use crate::error::{Result, VfsError};
use crate::vfs::FileSystem;
use std::io::{self, Read, Seek, SeekFrom};

/// A handle to an open file or directory.
///
/// Files support [`Read`], [`Seek`] and positional [`read_at`](Self::read_at).
/// Directories support [`readdir`](Self::readdir); reading a directory
/// yields zero bytes.
///
/// # Examples
///
/// ```
/// use binfs::{Entry, FileMode, FileSystem};
/// use chrono::DateTime;
/// use std::io::{Read, Seek, SeekFrom};
///
/// let t = DateTime::from_timestamp(0, 0).unwrap().fixed_offset();
/// let mut fs = FileSystem::new();
/// fs.insert(Entry::file("/a.txt", FileMode::regular(0o644), t, b"hello world".to_vec()))?;
///
/// let mut file = fs.open("/a.txt")?;
/// file.seek(SeekFrom::Start(6))?;
/// let mut rest = String::new();
/// file.read_to_string(&mut rest)?;
/// assert_eq!(rest, "world");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct File<'fs> {
    fs: &'fs FileSystem,
    entry: &'fs Entry,
    position: u64,
    cursor: usize,
}

impl<'fs> File<'fs> {
    pub(crate) const fn new(fs: &'fs FileSystem, entry: &'fs Entry) -> Self {
        Self {
            fs,
            entry,
            position: 0,
            cursor: 0,
        }
    }

    /// Returns the metadata of the open entry.
    #[must_use]
    pub const fn stat(&self) -> &'fs Entry {
        self.entry
    }

    /// Returns the whole content without copying.
    #[must_use]
    pub fn content(&self) -> &'fs [u8] {
        self.entry.content()
    }

    /// Returns the next `n` children of a directory.
    ///
    /// `n <= 0`, or `n` larger than the number of remaining children, returns
    /// all remaining children. Children come back in link order and the
    /// cursor advances past them.
    ///
    /// `Ok(None)` signals that a non-empty directory has been fully listed
    /// and `n > 0` was requested. An empty directory never signals the end;
    /// it returns an empty batch.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::InvalidOperation`] if the entry is a file.
    ///
    /// # Examples
    ///
    /// ```
    /// use binfs::{Entry, FileMode, FileSystem};
    /// use chrono::DateTime;
    ///
    /// let t = DateTime::from_timestamp(0, 0).unwrap().fixed_offset();
    /// let mut fs = FileSystem::new();
    /// fs.insert(Entry::directory("/", FileMode::directory(0o755), t))?;
    /// for name in ["a", "b", "c"] {
    ///     fs.insert(Entry::file(format!("/{name}"), FileMode::regular(0o644), t, Vec::new()))?;
    /// }
    ///
    /// let mut root = fs.open("/")?;
    /// let names = |batch: Vec<&Entry>| batch.iter().map(|e| e.name().to_string()).collect::<Vec<_>>();
    /// assert_eq!(names(root.readdir(2)?.unwrap()), ["a", "b"]);
    /// assert_eq!(names(root.readdir(-1)?.unwrap()), ["c"]);
    /// assert!(root.readdir(1)?.is_none());
    /// # Ok::<(), binfs::VfsError>(())
    /// ```
    pub fn readdir(&mut self, n: isize) -> Result<Option<Vec<&'fs Entry>>> {
        let children = self
            .entry
            .children()
            .ok_or_else(|| VfsError::InvalidOperation {
                path: self.entry.path().to_string(),
                operation: "readdir",
            })?;

        let start = self.cursor.min(children.len());
        let remaining = children.len() - start;
        if remaining == 0 && !children.is_empty() && n > 0 {
            return Ok(None);
        }

        let count = usize::try_from(n)
            .ok()
            .filter(|&n| n > 0)
            .map_or(remaining, |n| n.min(remaining));

        let batch = children[start..start + count]
            .iter()
            .filter_map(|child| self.fs.entry(child))
            .collect();
        self.cursor = start + count;
        Ok(Some(batch))
    }

    /// Reads into `buf` starting at `offset`, without moving the handle's
    /// position.
    ///
    /// Returns the number of bytes read, `0` at or past the end.
    ///
    /// # Errors
    ///
    /// Never fails; the `Result` mirrors positional reads on real files.
    pub fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        let content = self.content();
        let Ok(start) = usize::try_from(offset) else {
            return Ok(0);
        };
        if start >= content.len() {
            return Ok(0);
        }
        let n = buf.len().min(content.len() - start);
        buf[..n].copy_from_slice(&content[start..start + n]);
        Ok(n)
    }

    /// Closes the handle. Nothing is released; embedded data lives as long
    /// as the filesystem.
    ///
    /// # Errors
    ///
    /// Never fails.
    pub const fn close(self) -> Result<()> {
        Ok(())
    }
}

impl Read for File<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.read_at(buf, self.position)?;
        self.position += n as u64;
        Ok(n)
    }
}

impl Seek for File<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => (self.content().len() as u64).checked_add_signed(delta),
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta),
        };

        let position = target.ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )
        })?;
        self.position = position;
        Ok(position)
    }
}

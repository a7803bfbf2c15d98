//! Files and directories of the embedded tree.
//!
//! An [`Entry`] is immutable once it has been inserted into a
//! [`FileSystem`](crate::FileSystem); positional state such as read offsets
//! and listing cursors lives in the [`File`](crate::File) handle returned by
//! `open`.

use crate::Timestamp;
use crate::codec::{self, CodecError};
use crate::error::{Result, VfsError};
use crate::path;
use crate::record::OwnedEncodedEntry;
use std::fmt;

/// Unix permission and file type bits.
///
/// The kind of an [`Entry`] is decided by its explicit directory tag, not by
/// these bits; the type bits are carried along for callers that display or
/// forward them.
///
/// # Examples
///
/// ```
/// use binfs::FileMode;
///
/// let mode = FileMode::directory(0o755);
/// assert!(mode.is_dir());
/// assert_eq!(mode.permissions(), 0o755);
/// assert_eq!(mode.to_string(), "drwxr-xr-x");
/// assert_eq!(format!("{mode:o}"), "40755");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FileMode(u32);

impl FileMode {
    /// Mask selecting the file type bits.
    pub const TYPE_MASK: u32 = 0o170_000;
    /// File type bits of a directory.
    pub const DIRECTORY: u32 = 0o040_000;
    /// File type bits of a regular file.
    pub const REGULAR: u32 = 0o100_000;
    /// Mask selecting permission bits, including setuid, setgid and sticky.
    pub const PERMISSION_MASK: u32 = 0o7777;

    /// Wraps raw mode bits.
    #[must_use]
    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    /// Mode of a directory with the given permission bits.
    #[must_use]
    pub const fn directory(permissions: u32) -> Self {
        Self(Self::DIRECTORY | (permissions & Self::PERMISSION_MASK))
    }

    /// Mode of a regular file with the given permission bits.
    #[must_use]
    pub const fn regular(permissions: u32) -> Self {
        Self(Self::REGULAR | (permissions & Self::PERMISSION_MASK))
    }

    /// Returns the raw mode bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns the permission bits.
    #[must_use]
    pub const fn permissions(self) -> u32 {
        self.0 & Self::PERMISSION_MASK
    }

    /// Returns `true` if the type bits describe a directory.
    #[must_use]
    pub const fn is_dir(self) -> bool {
        self.0 & Self::TYPE_MASK == Self::DIRECTORY
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const RWX: [char; 3] = ['r', 'w', 'x'];

        f.write_str(if self.is_dir() { "d" } else { "-" })?;
        for shift in [6u32, 3, 0] {
            let triplet = (self.0 >> shift) & 0o7;
            for (i, symbol) in RWX.iter().enumerate() {
                if triplet & (0o4 >> i) == 0 {
                    f.write_str("-")?;
                } else {
                    write!(f, "{symbol}")?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Octal for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Octal::fmt(&self.0, f)
    }
}

impl From<u32> for FileMode {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    File { content: Vec<u8> },
    /// Canonical paths of the children, in link order.
    Directory { children: Vec<String> },
}

/// One file or directory of the embedded tree.
///
/// # Examples
///
/// ```
/// use binfs::{Entry, FileMode};
/// use chrono::DateTime;
///
/// let modified = DateTime::from_timestamp(1_700_000_000, 0).unwrap().fixed_offset();
/// let entry = Entry::file("/robots.txt", FileMode::regular(0o644), modified, b"User-agent: *".to_vec());
///
/// assert_eq!(entry.name(), "robots.txt");
/// assert_eq!(entry.size(), 13);
/// assert!(entry.is_file());
/// assert!(entry.children().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub(crate) path: String,
    name: String,
    size: u64,
    mode: FileMode,
    modified: Timestamp,
    kind: Kind,
}

impl Entry {
    /// Creates a file entry. The name is the last segment of `path`.
    #[must_use]
    pub fn file(
        path: impl Into<String>,
        mode: FileMode,
        modified: Timestamp,
        content: Vec<u8>,
    ) -> Self {
        let path = path.into();
        Self {
            name: path::base_name(&path).to_string(),
            size: content.len() as u64,
            path,
            mode,
            modified,
            kind: Kind::File { content },
        }
    }

    /// Creates a directory entry with no children.
    #[must_use]
    pub fn directory(path: impl Into<String>, mode: FileMode, modified: Timestamp) -> Self {
        let path = path.into();
        Self {
            name: path::base_name(&path).to_string(),
            size: 0,
            path,
            mode,
            modified,
            kind: Kind::Directory {
                children: Vec::new(),
            },
        }
    }

    /// Replaces the base name derived from the path.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Canonical path of this entry.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Base name of this entry.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length of the uncompressed content in bytes, `0` for directories.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Permission and type bits.
    #[must_use]
    pub const fn mode(&self) -> FileMode {
        self.mode
    }

    /// Last modification time.
    #[must_use]
    pub const fn modified(&self) -> Timestamp {
        self.modified
    }

    /// Returns `true` for directories.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self.kind, Kind::Directory { .. })
    }

    /// Returns `true` for files.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self.kind, Kind::File { .. })
    }

    /// File content; empty for directories.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        match &self.kind {
            Kind::File { content } => content,
            Kind::Directory { .. } => &[],
        }
    }

    /// Canonical paths of the linked children, or `None` for files.
    #[must_use]
    pub fn children(&self) -> Option<&[String]> {
        match &self.kind {
            Kind::Directory { children } => Some(children),
            Kind::File { .. } => None,
        }
    }

    /// Resolves the path to its canonical form.
    ///
    /// A name that was derived from the raw path is derived again from the
    /// resolved one; a name set with [`with_name`](Self::with_name) is kept.
    pub(crate) fn canonicalize(mut self) -> Result<Self> {
        let resolved = path::resolve(&self.path)?;
        if self.name == path::base_name(&self.path) {
            self.name = path::base_name(&resolved).to_string();
        }
        self.path = resolved;
        self.check_root()?;
        Ok(self)
    }

    /// The root can only be a directory.
    pub(crate) fn check_root(&self) -> Result<()> {
        if self.path == path::ROOT && !self.is_dir() {
            return Err(VfsError::InconsistentEntry {
                path: self.path.clone(),
                reason: "root must be a directory".to_string(),
            });
        }
        Ok(())
    }

    /// Appends `child` to the children of a directory.
    ///
    /// Returns `false` if this entry is a file. A child that is already
    /// listed is not listed twice when `dedupe` is set.
    pub(crate) fn link_child(&mut self, child: &str, dedupe: bool) -> bool {
        match &mut self.kind {
            Kind::Directory { children } => {
                if !(dedupe && children.iter().any(|c| c == child)) {
                    children.push(child.to_string());
                }
                true
            }
            Kind::File { .. } => false,
        }
    }

    /// Encodes this entry into the fields written by the source emitter.
    ///
    /// Directories are emitted with empty content and size `0`.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] if the timestamp or content cannot be encoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use binfs::{Entry, FileMode, FileSystem};
    /// use chrono::DateTime;
    ///
    /// let modified = DateTime::from_timestamp(0, 0).unwrap().fixed_offset();
    /// let entry = Entry::file("/a.txt", FileMode::regular(0o644), modified, b"hello".to_vec());
    /// let fields = entry.encode()?;
    ///
    /// let mut fs = FileSystem::new();
    /// fs.add(fields.as_encoded()).unwrap();
    /// assert_eq!(fs.get("/a.txt"), Some(&entry));
    /// # Ok::<(), binfs::CodecError>(())
    /// ```
    pub fn encode(&self) -> std::result::Result<OwnedEncodedEntry, CodecError> {
        let content = match &self.kind {
            Kind::File { content } => codec::content::encode(content)?,
            Kind::Directory { .. } => String::new(),
        };

        Ok(OwnedEncodedEntry {
            path: self.path.clone(),
            name: self.name.clone(),
            size: self.size,
            mode: self.mode.bits(),
            mod_time: codec::time::encode(&self.modified)?,
            is_dir: self.is_dir(),
            content,
        })
    }
}

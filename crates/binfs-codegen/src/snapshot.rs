//! Capturing a directory tree from disk.
//!
//! The snapshot lists the root first, then every directory before its
//! children, with siblings sorted by file name. Replaying it in order
//! through [`FileSystem::add`](binfs::FileSystem::add) therefore links every
//! entry, and the generated loader is byte-for-byte reproducible for an
//! unchanged tree.
//!
//! # Examples
//!
//! ```no_run
//! use binfs_codegen::Snapshot;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let snapshot = Snapshot::capture("./public")?;
//! let fs = snapshot.to_filesystem()?;
//! println!("{} entries", fs.len());
//! # Ok(())
//! # }
//! ```

use crate::error::{CodegenError, Result};
use binfs::{Entry, FileMode, FileSystem, FileSystemBuilder, OwnedEncodedEntry, Timestamp};
use chrono::{DateTime, Local, Utc};
use std::fs::{self, Metadata};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Ordered entries captured from a directory.
#[derive(Debug, Clone)]
pub struct Snapshot {
    root: PathBuf,
    entries: Vec<Entry>,
}

impl Snapshot {
    /// Walks `root` and reads every directory and regular file below it.
    ///
    /// Symbolic links and special files are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::NotADirectory`] if `root` is not a directory,
    /// and an I/O error if any entry cannot be read.
    pub fn capture(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let metadata = fs::metadata(root).map_err(|source| CodegenError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(CodegenError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let mut entries = Vec::new();
        for item in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let item = item?;
            let file_type = item.file_type();
            if !file_type.is_dir() && !file_type.is_file() {
                warn!(path = %item.path().display(), "skipping symlink or special file");
                continue;
            }

            let relative = item
                .path()
                .strip_prefix(root)
                .unwrap_or_else(|_| item.path());
            let path = canonical_path(relative).ok_or_else(|| CodegenError::NonUtf8Path {
                path: item.path().to_path_buf(),
            })?;

            let metadata = item.metadata()?;
            let modified = modified_time(item.path(), &metadata)?;
            let permissions = permission_bits(&metadata);

            let entry = if file_type.is_dir() {
                Entry::directory(path, FileMode::directory(permissions), modified)
            } else {
                let content = fs::read(item.path()).map_err(|source| CodegenError::Io {
                    path: item.path().to_path_buf(),
                    source,
                })?;
                Entry::file(path, FileMode::regular(permissions), modified, content)
            };
            debug!(path = %entry.path(), size = entry.size(), "captured entry");
            entries.push(entry);
        }

        let snapshot = Self {
            root: root.to_path_buf(),
            entries,
        };
        info!(
            root = %root.display(),
            entries = snapshot.len(),
            bytes = snapshot.total_bytes(),
            "captured directory"
        );
        Ok(snapshot)
    }

    /// Directory the snapshot was taken from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Captured entries in walk order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of captured entries, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all file sizes.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.entries.iter().map(Entry::size).sum()
    }

    /// Encodes every entry into the record form embedded in source.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::Encode`] naming the first entry that fails.
    pub fn encode(&self) -> Result<Vec<OwnedEncodedEntry>> {
        self.entries
            .iter()
            .map(|entry| {
                entry.encode().map_err(|source| CodegenError::Encode {
                    path: entry.path().to_string(),
                    source,
                })
            })
            .collect()
    }

    /// Builds the runtime filesystem directly, without generating source.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry is rejected by the builder.
    pub fn to_filesystem(&self) -> Result<FileSystem> {
        let mut builder = FileSystemBuilder::new();
        for entry in &self.entries {
            builder.insert(entry.clone());
        }
        Ok(builder.build()?)
    }
}

/// Maps a path relative to the snapshot root onto its rooted, slash
/// separated form. Returns `None` for non UTF-8 segments.
fn canonical_path(relative: &Path) -> Option<String> {
    let mut out = String::new();
    for component in relative.components() {
        if let Component::Normal(segment) = component {
            out.push('/');
            out.push_str(segment.to_str()?);
        }
    }
    if out.is_empty() {
        out.push('/');
    }
    Some(out)
}

fn modified_time(path: &Path, metadata: &Metadata) -> Result<Timestamp> {
    let modified = metadata.modified().map_err(|source| CodegenError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(encodable(DateTime::<Local>::from(modified).fixed_offset()))
}

/// Keeps the local offset when the time codec can store it, otherwise
/// moves the instant to UTC.
///
/// Historical local mean time zones have offsets in whole seconds, and one
/// minute west of UTC collides with the codec's UTC marker.
fn encodable(modified: Timestamp) -> Timestamp {
    let offset = modified.offset().local_minus_utc();
    if offset % 60 == 0 && offset != -60 {
        return modified;
    }
    debug!(offset, "local offset not encodable, using UTC");
    modified.with_timezone(&Utc).fixed_offset()
}

#[cfg(unix)]
fn permission_bits(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & FileMode::PERMISSION_MASK
}

#[cfg(not(unix))]
fn permission_bits(metadata: &Metadata) -> u32 {
    match (metadata.is_dir(), metadata.permissions().readonly()) {
        (true, _) => 0o755,
        (false, true) => 0o444,
        (false, false) => 0o644,
    }
}

//! Read-only in-memory filesystem for assets embedded at build time.
//!
//! A build step snapshots a directory and emits Rust source that feeds one
//! [`EncodedEntry`] per file or directory into a [`FileSystemBuilder`]. At
//! runtime the generated loader returns a [`FileSystem`] that answers
//! open, stat, read and directory listing requests without touching disk.
//!
//! # Features
//!
//! - **Text-safe encoding**: content is gzip-compressed and hex encoded,
//!   timestamps use a fixed-width binary record, see [`codec`]
//! - **Path safety**: every lookup is lexically cleaned and rooted, see [`path`]
//! - **Independent handles**: every [`FileSystem::open`] returns a [`File`]
//!   with its own read offset and listing cursor
//! - **Fail fast**: corrupt embedded data aborts construction
//! - **Thread-safe**: a built [`FileSystem`] is `Send + Sync`
//!
//! # Examples
//!
//! ```
//! use binfs::{EncodedEntry, FileSystem, codec};
//! use chrono::DateTime;
//! use std::io::Read;
//!
//! let t = codec::time::encode(&DateTime::from_timestamp(0, 0).unwrap().fixed_offset())?;
//! let hello = codec::content::encode(b"hello")?;
//!
//! let mut fs = FileSystem::new();
//! fs.add(EncodedEntry { path: "/", name: ".", size: 0, mode: 0o40755, mod_time: &t, is_dir: true, content: "" })?;
//! fs.add(EncodedEntry { path: "/a.txt", name: "a.txt", size: 5, mode: 0o100644, mod_time: &t, is_dir: false, content: &hello })?;
//!
//! let mut file = fs.open("/a.txt")?;
//! assert_eq!(file.stat().size(), 5);
//! let mut body = String::new();
//! file.read_to_string(&mut body)?;
//! assert_eq!(body, "hello");
//!
//! let listing = fs.open("/")?.readdir(-1)?.unwrap();
//! assert_eq!(listing.len(), 1);
//! assert_eq!(listing[0].name(), "a.txt");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod builder;
pub mod codec;
pub mod entry;
pub mod error;
pub mod handle;
pub mod path;
pub mod record;
pub mod vfs;

pub use builder::FileSystemBuilder;
pub use codec::CodecError;
pub use entry::{Entry, FileMode};
pub use error::{Result, VfsError};
pub use handle::File;
pub use record::{EncodedEntry, OwnedEncodedEntry};
pub use vfs::FileSystem;

/// Modification timestamp of an embedded entry.
pub type Timestamp = chrono::DateTime<chrono::FixedOffset>;

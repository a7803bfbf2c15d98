//! `binfs inspect`: load a directory into memory and look at one entry.
//!
//! Runs the same path as a generated loader without compiling anything:
//! the directory is captured, built into a [`FileSystem`], and the
//! requested path is opened and listed through a handle.

use crate::cli::{ExitCode, OutputFormat};
use crate::formatters::format_output;
use anyhow::{Context, Result};
use binfs::{Entry, FileSystem, VfsError};
use binfs_codegen::{CodegenError, Snapshot};
use chrono::SecondsFormat;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Stat fields of one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryInfo {
    /// Canonical path
    pub path: String,
    /// Base name
    pub name: String,
    /// Content size in bytes
    pub size: u64,
    /// `ls`-style mode string
    pub mode: String,
    /// Modification time, RFC 3339
    pub modified: String,
    /// Directory tag
    pub is_dir: bool,
}

impl From<&Entry> for EntryInfo {
    fn from(entry: &Entry) -> Self {
        Self {
            path: entry.path().to_string(),
            name: entry.name().to_string(),
            size: entry.size(),
            mode: entry.mode().to_string(),
            modified: entry
                .modified()
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            is_dir: entry.is_dir(),
        }
    }
}

/// Result of inspecting one path.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    /// Number of entries loaded from the directory
    pub total_entries: usize,
    /// The opened entry
    pub entry: EntryInfo,
    /// Directory listing, one inner list per `readdir` batch
    pub pages: Vec<Vec<EntryInfo>>,
}

/// Builds the in-memory filesystem for `dir`.
///
/// # Errors
///
/// Returns an error if the directory cannot be captured.
pub fn load(dir: &Path) -> std::result::Result<FileSystem, CodegenError> {
    Snapshot::capture(dir)?.to_filesystem()
}

/// Opens `path` in `fs` and lists it in batches of `limit`.
///
/// `None` lists everything in one batch.
///
/// # Errors
///
/// Returns the [`VfsError`] from `open` or `readdir`.
pub fn inspect(
    fs: &FileSystem,
    path: &str,
    limit: Option<usize>,
) -> std::result::Result<InspectReport, VfsError> {
    let mut handle = fs.open(path)?;
    let entry = EntryInfo::from(handle.stat());

    let mut pages = Vec::new();
    if handle.stat().is_dir() {
        let n = limit.map_or(-1, |n| isize::try_from(n).unwrap_or(isize::MAX));
        while let Some(batch) = handle.readdir(n)? {
            if batch.is_empty() {
                break;
            }
            debug!(batch = batch.len(), "listed batch");
            pages.push(batch.into_iter().map(EntryInfo::from).collect());
            if n <= 0 {
                break;
            }
        }
    }
    handle.close()?;

    Ok(InspectReport {
        total_entries: fs.len(),
        entry,
        pages,
    })
}

/// Runs the `inspect` command.
///
/// A rejected or missing path exits with [`ExitCode::INVALID_INPUT`].
pub fn run(
    dir: &Path,
    path: &str,
    limit: Option<usize>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    info!(dir = %dir.display(), path, "inspecting");

    let fs = load(dir).with_context(|| format!("failed to load {}", dir.display()))?;
    let report = match inspect(&fs, path, limit) {
        Ok(report) => report,
        Err(e) if e.is_not_found() || e.is_invalid_path() => {
            eprintln!("{e}");
            return Ok(ExitCode::INVALID_INPUT);
        }
        Err(e) => return Err(e).context("failed to inspect entry"),
    };

    println!("{}", format_output(&report, output_format)?);
    Ok(ExitCode::SUCCESS)
}

//! Lookup path resolution.
//!
//! Every request path is turned into a canonical store key: rooted at `/`,
//! `/`-separated, with `.`, `..` and repeated separators collapsed
//! lexically. `..` never climbs above the root, so no request can name a
//! key outside the embedded tree.
//!
//! # Examples
//!
//! ```
//! use binfs::path;
//!
//! assert_eq!(path::resolve("css/../js//app.js")?, "/js/app.js");
//! assert_eq!(path::resolve("/../../etc/passwd")?, "/etc/passwd");
//! assert_eq!(path::resolve("")?, "/");
//! # Ok::<(), binfs::VfsError>(())
//! ```

use crate::error::{Result, VfsError};
use std::path::MAIN_SEPARATOR;

/// Canonical path of the root directory.
pub const ROOT: &str = "/";

/// Resolves a request path into a canonical store key.
///
/// # Errors
///
/// Returns [`VfsError::InvalidPath`] if the path contains a NUL byte, or the
/// platform directory separator on platforms where it is not `/`.
///
/// # Examples
///
/// ```
/// use binfs::path;
///
/// assert_eq!(path::resolve("./a/./b/")?, "/a/b");
/// assert!(path::resolve("a\0b").unwrap_err().is_invalid_path());
/// # Ok::<(), binfs::VfsError>(())
/// ```
pub fn resolve(request: &str) -> Result<String> {
    if request.contains('\0') {
        return Err(VfsError::InvalidPath {
            path: request.to_string(),
            reason: "contains NUL byte",
        });
    }

    if MAIN_SEPARATOR != '/' && request.contains(MAIN_SEPARATOR) {
        return Err(VfsError::InvalidPath {
            path: request.to_string(),
            reason: "contains platform directory separator",
        });
    }

    Ok(clean(request))
}

/// Lexically cleans `path` as if it were rooted at `/`.
fn clean(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => segments.push(name),
        }
    }

    if segments.is_empty() {
        return ROOT.to_string();
    }

    let mut cleaned = String::with_capacity(path.len() + 1);
    for segment in segments {
        cleaned.push('/');
        cleaned.push_str(segment);
    }
    cleaned
}

/// Returns the parent of a canonical path, or `None` for the root.
///
/// # Examples
///
/// ```
/// use binfs::path;
///
/// assert_eq!(path::parent("/css/site.css"), Some("/css"));
/// assert_eq!(path::parent("/index.html"), Some("/"));
/// assert_eq!(path::parent("/"), None);
/// ```
#[must_use]
pub fn parent(path: &str) -> Option<&str> {
    if path == ROOT {
        return None;
    }
    path.rfind('/').map(|pos| if pos == 0 { ROOT } else { &path[..pos] })
}

/// Returns the last segment of a canonical path, or `.` for the root.
#[must_use]
pub fn base_name(path: &str) -> &str {
    if path == ROOT {
        return ".";
    }
    path.rfind('/').map_or(path, |pos| &path[pos + 1..])
}

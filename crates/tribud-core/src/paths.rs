//! Absolute-path decomposition used to rebuild a source hierarchy under a
//! backup root.

use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Split a path into its segments from just below the root to the leaf.
///
/// Drive and volume prefixes and the root itself are dropped, so `C:\a\b`
/// and `/a/b` both yield `["a", "b"]`. The root and the empty path yield an
/// empty list. `.` components are skipped; `..` is kept as a segment, use
/// [`normalize`] first when it must not appear.
#[must_use]
pub fn decompose(path: &Path) -> Vec<OsString> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_os_string()),
            Component::ParentDir => Some(OsString::from("..")),
            Component::Prefix(_) | Component::RootDir | Component::CurDir => None,
        })
        .collect()
}

/// Lexically remove `.` and `..` components without touching the filesystem.
///
/// `..` never climbs above the root of an absolute path.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                None | Some(Component::ParentDir) => normalized.push(".."),
                Some(_) => {}
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Make `path` absolute against the current directory and normalise it.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    Ok(normalize(&std::path::absolute(path)?))
}

/// Destination of `source` when its hierarchy is mirrored under `root`.
///
/// With `keep_leaf` the last segment of `source` is part of the result (a
/// directory keeps its own name); without it the result is the mirrored
/// parent directory.
#[must_use]
pub fn mirrored(root: &Path, source: &Path, keep_leaf: bool) -> PathBuf {
    let mut segments = decompose(source);
    if !keep_leaf {
        segments.pop();
    }
    let mut target = root.to_path_buf();
    target.extend(segments);
    target
}

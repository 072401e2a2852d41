//! Copy primitives: single entries with a collision policy, and bulk subtrees

use std::fs::{self, FileType, Metadata};
use std::io;
use std::path::{Path, PathBuf};

use filetime::{FileTime, set_file_times, set_symlink_file_times};
use walkdir::WalkDir;

use super::{Collector, FailureReason};

/// Sockets, FIFOs and device nodes
pub(crate) fn is_special(file_type: FileType) -> bool {
    !file_type.is_file() && !file_type.is_dir() && !file_type.is_symlink()
}

enum CopyError {
    /// Something already sits at the destination
    DestinationExists,
    Io(io::Error),
}

/// Copy a regular file or a symlink to `dest`.
///
/// When the destination is already taken, the stale entry is removed and
/// the copy is attempted exactly once more.
pub(crate) fn copy_entry(
    source: &Path,
    dest: &Path,
    file_type: FileType,
) -> Result<(), FailureReason> {
    match attempt(source, dest, file_type) {
        Ok(()) => Ok(()),
        Err(CopyError::Io(err)) => Err(FailureReason::Copy(err)),
        Err(CopyError::DestinationExists) => {
            if same_location(source, dest) {
                return Err(FailureReason::SameFile);
            }
            remove_entry(dest).map_err(FailureReason::Copy)?;
            attempt(source, dest, file_type).map_err(|err| match err {
                CopyError::Io(err) => FailureReason::Copy(err),
                CopyError::DestinationExists => FailureReason::Copy(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "destination still exists after removal",
                )),
            })
        }
    }
}

fn attempt(source: &Path, dest: &Path, file_type: FileType) -> Result<(), CopyError> {
    let existing = fs::symlink_metadata(dest).ok();
    if let Some(existing) = &existing {
        // Links cannot be created over anything, and files only over files
        if file_type.is_symlink() || !existing.is_file() || same_file(source, dest, existing) {
            return Err(CopyError::DestinationExists);
        }
    }

    let result = if file_type.is_symlink() {
        copy_symlink(source, dest)
    } else {
        copy_file(source, dest)
    };

    result.map_err(|err| match err.kind() {
        io::ErrorKind::AlreadyExists => CopyError::DestinationExists,
        io::ErrorKind::PermissionDenied if existing.is_some() => CopyError::DestinationExists,
        _ => CopyError::Io(err),
    })
}

fn copy_file(source: &Path, dest: &Path) -> io::Result<()> {
    fs::copy(source, dest)?;
    let metadata = fs::metadata(source)?;
    set_file_times(dest, atime(&metadata), mtime(&metadata))
}

fn copy_symlink(source: &Path, dest: &Path) -> io::Result<()> {
    let target = fs::read_link(source)?;
    create_symlink(source, &target, dest)?;
    let metadata = fs::symlink_metadata(source)?;
    set_symlink_file_times(dest, atime(&metadata), mtime(&metadata))
}

#[cfg(unix)]
fn create_symlink(_source: &Path, target: &Path, dest: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, dest)
}

#[cfg(windows)]
fn create_symlink(source: &Path, target: &Path, dest: &Path) -> io::Result<()> {
    if fs::metadata(source).is_ok_and(|m| m.is_dir()) {
        std::os::windows::fs::symlink_dir(target, dest)
    } else {
        std::os::windows::fs::symlink_file(target, dest)
    }
}

#[cfg(not(any(unix, windows)))]
fn create_symlink(_source: &Path, _target: &Path, _dest: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are not supported on this platform",
    ))
}

fn atime(metadata: &Metadata) -> FileTime {
    FileTime::from_last_access_time(metadata)
}

fn mtime(metadata: &Metadata) -> FileTime {
    FileTime::from_last_modification_time(metadata)
}

/// Remove whatever sits at `path`, without following a final symlink
pub(crate) fn remove_entry(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

#[cfg(unix)]
fn same_file(source: &Path, _dest: &Path, existing: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;

    fs::symlink_metadata(source)
        .is_ok_and(|m| m.dev() == existing.dev() && m.ino() == existing.ino())
}

#[cfg(not(unix))]
fn same_file(source: &Path, dest: &Path, _existing: &Metadata) -> bool {
    match (fs::canonicalize(source), fs::canonicalize(dest)) {
        (Ok(s), Ok(d)) => s == d,
        _ => false,
    }
}

/// Whether `source` and `dest` name the same directory entry once parent
/// directories are resolved
fn same_location(source: &Path, dest: &Path) -> bool {
    match (resolved_entry(source), resolved_entry(dest)) {
        (Some(s), Some(d)) => s == d,
        _ => false,
    }
}

fn resolved_entry(path: &Path) -> Option<PathBuf> {
    let parent = fs::canonicalize(path.parent()?).ok()?;
    Some(parent.join(path.file_name()?))
}

#[cfg(unix)]
type DirIdentity = (u64, u64);

#[cfg(not(unix))]
type DirIdentity = PathBuf;

#[cfg(unix)]
fn dir_identity(path: &Path) -> Option<DirIdentity> {
    use std::os::unix::fs::MetadataExt;

    fs::metadata(path).ok().map(|m| (m.dev(), m.ino()))
}

#[cfg(not(unix))]
fn dir_identity(path: &Path) -> Option<DirIdentity> {
    fs::canonicalize(path).ok()
}

/// Recognises the backup root among source directories, so a root placed
/// inside a source is never mirrored into itself
pub(crate) struct RootGuard {
    root: Option<DirIdentity>,
}

impl RootGuard {
    pub(crate) fn new(root: &Path) -> Self {
        Self {
            root: dir_identity(root),
        }
    }

    pub(crate) fn is_root(&self, dir: &Path) -> bool {
        self.root
            .as_ref()
            .is_some_and(|root| dir_identity(dir).as_ref() == Some(root))
    }
}

/// Copy the subtree at `source` to `dest`, which must not exist yet.
///
/// Symlinks are copied as links. Failures are collected per entry, with the
/// source path of the entry, and never abort the rest of the subtree. The
/// directory `guard` recognises is skipped along with everything below it.
pub(crate) fn copy_tree(
    source: &Path,
    dest: &Path,
    guard: &RootGuard,
    collector: &mut Collector<'_>,
) {
    let mut directories = Vec::new();
    let mut walker = WalkDir::new(source).follow_links(false).into_iter();

    while let Some(item) = walker.next() {
        let entry = match item {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().map_or_else(|| source.to_path_buf(), Path::to_path_buf);
                collector.fail(path, FailureReason::Unreadable(err.into()));
                continue;
            }
        };

        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let target = if relative.as_os_str().is_empty() {
            dest.to_path_buf()
        } else {
            dest.join(relative)
        };
        let file_type = entry.file_type();

        if file_type.is_dir() {
            if guard.is_root(entry.path()) {
                walker.skip_current_dir();
                continue;
            }
            match fs::create_dir(&target) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists && target.is_dir() => {}
                Err(err) => {
                    collector.fail(entry.path(), FailureReason::CreateDir(err));
                    walker.skip_current_dir();
                    continue;
                }
            }
            directories.push((entry.into_path(), target));
        } else if is_special(file_type) {
            collector.fail(target, FailureReason::SpecialFile);
        } else {
            match copy_entry(entry.path(), &target, file_type) {
                Ok(()) => collector.copied(entry.path(), &target),
                Err(reason) => collector.fail(entry.path(), reason),
            }
        }
    }

    // Deepest first, once contents are written
    for (source_dir, target_dir) in directories.iter().rev() {
        if let Err(err) = copy_directory_metadata(source_dir, target_dir) {
            collector.fail(source_dir.as_path(), FailureReason::Copy(err));
        }
    }
}

fn copy_directory_metadata(source: &Path, dest: &Path) -> io::Result<()> {
    let metadata = fs::metadata(source)?;
    fs::set_permissions(dest, metadata.permissions())?;
    set_file_times(dest, atime(&metadata), mtime(&metadata))
}

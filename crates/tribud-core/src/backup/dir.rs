//! Backup into a directory of the local filesystem

use std::fs::{self, FileType};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::copy::{RootGuard, copy_entry, copy_tree, is_special, remove_entry};
use super::{Collector, Destination, FailedEntry, FailureReason};
use crate::paths;
use crate::report::{Event, Reporter, TracingReporter};

/// Mirrors sources, with their full absolute hierarchy, under a root
/// directory.
///
/// `/home/me/notes.txt` backed up into `/mnt/bck` lands at
/// `/mnt/bck/home/me/notes.txt`; the directory `/etc/ssh` lands at
/// `/mnt/bck/etc/ssh`.
pub struct DirDestination {
    root: PathBuf,
    reporter: Arc<dyn Reporter>,
}

impl DirDestination {
    /// A destination rooted at `root`, which must be absolute to connect
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            reporter: Arc::new(TracingReporter),
        }
    }

    /// Report events to `reporter` instead of `tracing`
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Backup root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root and its missing ancestors.
    ///
    /// Returns `false` without touching the filesystem when the root is not
    /// absolute, and `false` when it cannot be created. Calling it again on
    /// an existing root is harmless.
    pub fn connect(&self) -> bool {
        if !self.root.is_absolute() {
            self.reject("not an absolute path");
            return false;
        }
        if let Err(err) = fs::create_dir_all(&self.root) {
            self.reject(&err.to_string());
            return false;
        }
        self.reporter.report(&Event::DestinationReady { root: &self.root });
        true
    }

    /// Whether this process may write into the root
    #[must_use]
    pub fn is_connected(&self) -> bool {
        writable(&self.root)
    }

    /// Mirror `source` under the root.
    ///
    /// Returns the entries that could not be backed up; an empty list means
    /// everything was copied.
    pub fn add(&self, source: &Path) -> Vec<FailedEntry> {
        let mut collector = Collector::new(self.reporter.as_ref());

        let source = match paths::absolutize(source) {
            Ok(source) => source,
            Err(err) => {
                collector.fail(source, FailureReason::Unreadable(err));
                return collector.into_failures();
            }
        };
        let file_type = match fs::symlink_metadata(&source) {
            Ok(metadata) => metadata.file_type(),
            Err(err) => {
                collector.fail(source, FailureReason::Unreadable(err));
                return collector.into_failures();
            }
        };

        if file_type.is_dir() {
            let dest = paths::mirrored(&self.root, &source, true);
            let guard = RootGuard::new(&self.root);
            Self::mirror_directory(&source, &dest, &guard, &mut collector);
        } else {
            let mut dest = paths::mirrored(&self.root, &source, false);
            if let Some(name) = source.file_name() {
                dest.push(name);
            }
            Self::mirror_leaf(&source, &dest, file_type, &mut collector);
        }

        collector.into_failures()
    }

    fn reject(&self, reason: &str) {
        self.reporter.report(&Event::DestinationRejected {
            root: &self.root,
            reason,
        });
    }

    /// File, symlink or special file at the top of an `add`
    fn mirror_leaf(
        source: &Path,
        dest: &Path,
        file_type: FileType,
        collector: &mut Collector<'_>,
    ) {
        if is_special(file_type) {
            collector.fail(dest, FailureReason::SpecialFile);
            return;
        }
        if let Some(parent) = dest.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                collector.fail(parent, FailureReason::CreateDir(err));
                return;
            }
        }
        Self::copy_into_place(source, dest, file_type, collector);
    }

    fn copy_into_place(
        source: &Path,
        dest: &Path,
        file_type: FileType,
        collector: &mut Collector<'_>,
    ) {
        match copy_entry(source, dest, file_type) {
            Ok(()) => collector.copied(source, dest),
            Err(reason) => collector.fail(dest, reason),
        }
    }

    fn mirror_directory(
        source: &Path,
        dest: &Path,
        guard: &RootGuard,
        collector: &mut Collector<'_>,
    ) {
        if guard.is_root(source) {
            return;
        }
        match fs::symlink_metadata(dest) {
            Ok(existing) if existing.is_dir() => {
                Self::merge_directory(source, dest, guard, collector);
            }
            Ok(_) => {
                // A file or link sits where the directory goes
                if let Err(err) = remove_entry(dest) {
                    collector.fail(dest, FailureReason::Copy(err));
                    return;
                }
                copy_tree(source, dest, guard, collector);
            }
            Err(_) => {
                if let Some(parent) = dest.parent() {
                    if let Err(err) = fs::create_dir_all(parent) {
                        collector.fail(parent, FailureReason::CreateDir(err));
                        return;
                    }
                }
                copy_tree(source, dest, guard, collector);
            }
        }
    }

    /// Copy the children of `source` into the existing directory `dest`
    fn merge_directory(
        source: &Path,
        dest: &Path,
        guard: &RootGuard,
        collector: &mut Collector<'_>,
    ) {
        let children = match fs::read_dir(source) {
            Ok(children) => children,
            Err(err) => {
                collector.fail(source, FailureReason::Unreadable(err));
                return;
            }
        };

        for child in children {
            let child = match child {
                Ok(child) => child,
                Err(err) => {
                    collector.fail(source, FailureReason::Unreadable(err));
                    continue;
                }
            };
            let child_source = child.path();
            let child_dest = dest.join(child.file_name());
            let file_type = match child.file_type() {
                Ok(file_type) => file_type,
                Err(err) => {
                    collector.fail(child_source, FailureReason::Unreadable(err));
                    continue;
                }
            };

            if file_type.is_dir() {
                Self::mirror_directory(&child_source, &child_dest, guard, collector);
            } else if is_special(file_type) {
                collector.fail(child_dest, FailureReason::SpecialFile);
            } else {
                Self::copy_into_place(&child_source, &child_dest, file_type, collector);
            }
        }
    }
}

impl Destination for DirDestination {
    fn connect(&self) -> bool {
        Self::connect(self)
    }

    fn is_ready(&self) -> bool {
        self.is_connected()
    }

    fn add(&self, source: &Path) -> Vec<FailedEntry> {
        Self::add(self, source)
    }
}

#[cfg(unix)]
fn writable(path: &Path) -> bool {
    rustix::fs::access(path, rustix::fs::Access::WRITE_OK).is_ok()
}

#[cfg(not(unix))]
fn writable(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|metadata| !metadata.permissions().readonly())
}

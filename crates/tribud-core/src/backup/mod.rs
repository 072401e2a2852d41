//! Backup destinations and the copy engine
//!
//! A [`Destination`] is anything that can be connected to and receive
//! source paths. [`DirDestination`] mirrors sources into a local directory;
//! [`BackupCoordinator`] drives any destination through the same interface.

mod copy;
mod dir;
mod reporting;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use dir::DirDestination;
pub use reporting::{BackupReport, BackupReporter, InputOutcome};

use crate::report::{Event, Reporter};

/// Why an entry could not be backed up
#[derive(Debug, Error)]
pub enum FailureReason {
    /// Sockets, FIFOs and device nodes are never copied
    #[error("special file is never copied")]
    SpecialFile,
    /// The source entry could not be read
    #[error("source can not be read: {0}")]
    Unreadable(#[source] io::Error),
    /// A destination directory could not be created
    #[error("directory can not be created: {0}")]
    CreateDir(#[source] io::Error),
    /// Writing the destination entry failed
    #[error("copy failed: {0}")]
    Copy(#[source] io::Error),
    /// The destination resolves to the source itself
    #[error("destination is the source itself")]
    SameFile,
}

/// An entry that could not be backed up
#[derive(Debug, Error)]
#[error("{}: {reason}", path.display())]
pub struct FailedEntry {
    /// Path of the entry
    pub path: PathBuf,
    /// What went wrong
    pub reason: FailureReason,
}

/// A place backups can be written to
pub trait Destination {
    /// Make sure the destination exists, `true` when it can be used
    fn connect(&self) -> bool;

    /// Whether data can currently be written to the destination
    fn is_ready(&self) -> bool;

    /// Back up `source`, returning every entry that could not be backed up
    fn add(&self, source: &Path) -> Vec<FailedEntry>;
}

/// Drives a [`Destination`]
pub struct BackupCoordinator<D> {
    destination: D,
}

impl<D: Destination> BackupCoordinator<D> {
    /// Wrap `destination`
    pub const fn new(destination: D) -> Self {
        Self { destination }
    }

    /// The wrapped destination
    pub const fn destination(&self) -> &D {
        &self.destination
    }

    /// See [`Destination::connect`]
    pub fn connect(&self) -> bool {
        self.destination.connect()
    }

    /// See [`Destination::is_ready`]
    pub fn is_ready(&self) -> bool {
        self.destination.is_ready()
    }

    /// See [`Destination::add`]
    pub fn add(&self, source: &Path) -> Vec<FailedEntry> {
        self.destination.add(source)
    }

    /// Add every input in order; a failing input never stops the others
    pub fn backup_all<I, P>(&self, inputs: I) -> BackupReport
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut report = BackupReport::default();
        for input in inputs {
            let source = input.as_ref();
            let failures = self.add(source);
            report.push(source.to_path_buf(), failures);
        }
        report
    }
}

/// Failure list of one `add` call, mirrored to the reporter as it grows
pub(crate) struct Collector<'a> {
    failures: Vec<FailedEntry>,
    reporter: &'a dyn Reporter,
}

impl<'a> Collector<'a> {
    pub(crate) fn new(reporter: &'a dyn Reporter) -> Self {
        Self {
            failures: Vec::new(),
            reporter,
        }
    }

    pub(crate) fn fail(&mut self, path: impl Into<PathBuf>, reason: FailureReason) {
        let entry = FailedEntry {
            path: path.into(),
            reason,
        };
        self.reporter.report(&Event::Failed { entry: &entry });
        self.failures.push(entry);
    }

    pub(crate) fn copied(&self, source: &Path, dest: &Path) {
        self.reporter.report(&Event::Copied { source, dest });
    }

    pub(crate) fn into_failures(self) -> Vec<FailedEntry> {
        self.failures
    }
}

//! Reporting collaborator handed to the validator and the copy engine

use std::path::Path;

use crate::backup::FailedEntry;
use crate::config::{CheckOutcome, KeyPath};

/// Something worth telling the user about while validating or backing up
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    /// A key looked up with `item_search` is not in the configuration
    KeyMissing {
        /// The key that could not be found
        key: &'a str,
    },
    /// A mandatory key declared by the schema is absent
    MandatoryMissing {
        /// Declared full path of the key
        path: &'a KeyPath,
    },
    /// An option failed its rule or is not covered by any rule
    NonCompliant {
        /// Full path of the option
        path: &'a KeyPath,
        /// Check outcome, `None` when no rule covers the option
        outcome: Option<CheckOutcome>,
    },
    /// The backup root exists and can be used
    DestinationReady {
        /// Backup root
        root: &'a Path,
    },
    /// The backup root cannot be used
    DestinationRejected {
        /// Backup root
        root: &'a Path,
        /// Why the root was rejected
        reason: &'a str,
    },
    /// An entry was written to the backup
    Copied {
        /// Source entry
        source: &'a Path,
        /// Destination entry
        dest: &'a Path,
    },
    /// An entry could not be backed up
    Failed {
        /// The failed entry
        entry: &'a FailedEntry,
    },
}

/// Receives events from tribud components
pub trait Reporter: Send + Sync {
    /// Handle one event
    fn report(&self, event: &Event<'_>);
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &Event<'_>) {
        match *event {
            Event::KeyMissing { key } => {
                tracing::warn!("{key} key not present in the config file");
            }
            Event::MandatoryMissing { path } => {
                tracing::warn!("Mandatory option is missing: {path}");
            }
            Event::NonCompliant {
                path,
                outcome: Some(outcome),
            } => {
                tracing::warn!("Option is not compliant ({outcome}): {path}");
            }
            Event::NonCompliant {
                path,
                outcome: None,
            } => {
                tracing::warn!("Option is not checked by the schema: {path}");
            }
            Event::DestinationReady { root } => {
                tracing::info!("The backup directory is: {}", root.display());
            }
            Event::DestinationRejected { root, reason } => {
                tracing::warn!("{} can not be used: {reason}", root.display());
            }
            Event::Copied { source, dest } => {
                tracing::debug!("{} -> {}", source.display(), dest.display());
            }
            Event::Failed { entry } => {
                tracing::warn!(
                    "The following entry can not be backed up: {} ({})",
                    entry.path.display(),
                    entry.reason
                );
            }
        }
    }
}

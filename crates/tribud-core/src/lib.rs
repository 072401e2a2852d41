//! # tribud-core
//!
//! Core library for the tribud backup tool.
//!
//! This library validates a backup configuration against a declared schema
//! and mirrors the configured sources, with their full absolute-path
//! hierarchy, into a backup directory.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Path decomposition and normalisation
pub mod paths;

/// Reporting collaborator passed into components
pub mod report;

/// Configuration loading, flattening and schema validation
pub mod config;

/// Backup destinations and the copy engine
pub mod backup;

pub use backup::{
    BackupCoordinator, BackupReport, BackupReporter, Destination, DirDestination, FailedEntry,
    FailureReason,
};
pub use config::{
    BackupSettings, CheckOutcome, ComplianceReport, ConfigDiscovery, ConfigOption, ConfigValidator,
    ConfigValue, KeyPath, LoadError, Schema, SchemaRule, SettingsError, ValueType,
};
pub use report::{Event, Reporter, TracingReporter};

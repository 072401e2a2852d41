//! Configuration loading, flattening and schema validation
//!
//! This module handles:
//! - Config file discovery and JSON loading
//! - Tagging values as string, string list, mapping or other
//! - Flattening nested mappings into leaf options
//! - Checking options against a declared schema
//! - Resolving the settings a backup run needs

mod discovery;
mod flatten;
mod loader;
mod option;
mod schema;
mod settings;
mod validator;
mod value;

pub use discovery::{APP_NAME, CONFIG_FILE, ConfigDiscovery};
pub use flatten::{FlatEntry, flatten};
pub use loader::{LoadError, load_file};
pub use option::{CheckOutcome, ConfigOption};
pub use schema::{
    KeyPath, Schema, SchemaRule, ValueCheck, backup_schema, log_level_check, path_check,
};
pub use settings::{BackupSettings, SettingsError};
pub use validator::{ComplianceReport, ConfigValidator, NonCompliance, Violation};
pub use value::{ConfigValue, ValueType};

//! Values the backup run needs, read from a validated configuration

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use super::schema::KeyPath;
use super::validator::ConfigValidator;
use super::value::{ConfigValue, ValueType};

/// Why [`BackupSettings`] could not be resolved
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// A required key is absent
    #[error("Required option is missing: {path}")]
    Missing {
        /// Full path of the key
        path: KeyPath,
    },
    /// A key holds a value of another shape
    #[error("Option {path} must be a {expected}")]
    WrongType {
        /// Full path of the key
        path: KeyPath,
        /// Shape the run needs
        expected: ValueType,
    },
}

/// Resolved backup settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupSettings {
    /// Sources to back up, in configured order
    pub inputs: Vec<PathBuf>,
    /// Backup root
    pub output: PathBuf,
    /// Log level name, if configured
    pub log_level: Option<String>,
}

impl BackupSettings {
    /// Full path of the input list
    #[must_use]
    pub fn input_key() -> KeyPath {
        KeyPath::from(["archive", "input"])
    }

    /// Full path of the backup root
    #[must_use]
    pub fn output_key() -> KeyPath {
        KeyPath::from(["archive", "output"])
    }

    /// Full path of the log level
    #[must_use]
    pub fn log_key() -> KeyPath {
        KeyPath::from(["log"])
    }

    /// Read the settings from `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the input list or the backup root is missing or
    /// has the wrong shape.
    pub fn resolve(config: &ConfigValidator) -> Result<Self, SettingsError> {
        let inputs = required(config, Self::input_key(), ValueType::StringList, |v| {
            v.as_string_list().map(|items| items.iter().map(PathBuf::from).collect())
        })?;
        let output = required(config, Self::output_key(), ValueType::String, |v| {
            v.as_str().map(PathBuf::from)
        })?;
        let log_level = config
            .lookup(&Self::log_key())
            .and_then(|option| option.value().as_str())
            .map(str::to_string);

        Ok(Self {
            inputs,
            output,
            log_level,
        })
    }
}

fn required<T>(
    config: &ConfigValidator,
    path: KeyPath,
    expected: ValueType,
    extract: impl FnOnce(&ConfigValue) -> Option<T>,
) -> Result<T, SettingsError> {
    let Some(option) = config.lookup(&path) else {
        return Err(SettingsError::Missing { path });
    };
    extract(option.value()).ok_or(SettingsError::WrongType { path, expected })
}

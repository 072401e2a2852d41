//! Reading configuration documents from disk

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::value::ConfigValue;

/// Why a configuration document could not be loaded
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read
    #[error("Config file can not be read: {}", path.display())]
    Io {
        /// Configuration file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON
    #[error("Config file format not JSON compliant: {}", path.display())]
    Parse {
        /// Configuration file
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },
    /// The document root is not an object
    #[error("Config file root is not a mapping: {}", path.display())]
    NotAMapping {
        /// Configuration file
        path: PathBuf,
    },
}

/// Read and parse the JSON document at `path`.
///
/// # Errors
///
/// Returns [`LoadError::Io`] when the file cannot be read,
/// [`LoadError::Parse`] when it is not JSON and [`LoadError::NotAMapping`]
/// when the document root is not an object.
pub fn load_file(path: &Path) -> Result<Vec<(String, ConfigValue)>, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&content).map_err(|err| match err {
        DocumentError::Parse(source) => LoadError::Parse {
            path: path.to_path_buf(),
            source,
        },
        DocumentError::NotAMapping => LoadError::NotAMapping {
            path: path.to_path_buf(),
        },
    })
}

enum DocumentError {
    Parse(serde_json::Error),
    NotAMapping,
}

fn parse_document(content: &str) -> Result<Vec<(String, ConfigValue)>, DocumentError> {
    let raw: serde_json::Value = serde_json::from_str(content).map_err(DocumentError::Parse)?;
    match ConfigValue::from(raw) {
        ConfigValue::Mapping(entries) => Ok(entries),
        _ => Err(DocumentError::NotAMapping),
    }
}

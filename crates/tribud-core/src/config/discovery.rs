//! Configuration file discovery

use std::path::{Path, PathBuf};

/// Name of the configuration file inside the application config directory
pub const CONFIG_FILE: &str = "config.json";

/// Application directory name
pub const APP_NAME: &str = "tribud";

/// Config file discovery
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Pick the configuration file to load.
    ///
    /// An explicit path always wins, even when it does not exist, so that
    /// loading reports the missing file. Otherwise the file in the user
    /// configuration directory is used.
    #[must_use]
    pub fn discover(cli_path: Option<&Path>) -> Option<PathBuf> {
        cli_path
            .map(Path::to_path_buf)
            .or_else(Self::global_config)
    }

    /// `<config dir>/tribud/config.json`
    #[must_use]
    pub fn global_config() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join(APP_NAME).join(CONFIG_FILE))
    }
}

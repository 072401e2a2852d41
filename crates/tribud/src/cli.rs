use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Trivial backup tool
///
/// Copy the configured files and directories, with their full path, into a backup directory
#[derive(Parser, Debug)]
#[command(name = "tribud")]
#[command(long_about = None, version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Use specific config file (default: <config dir>/tribud/config.json)
    #[arg(long, global = true, value_name = "PATH", env = "TRIBUD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Back up every configured input (default)
    Backup {
        /// Refuse to back up when the configuration is not fully compliant
        #[arg(long)]
        strict: bool,
    },

    /// Validate the configuration without copying anything
    Check,

    /// Show the configuration file and its options
    Config,
}

impl Default for Commands {
    fn default() -> Self {
        Self::Backup { strict: false }
    }
}
